use parlor_core::domain::inventory::StockChange;
use parlor_core::{DomainError, Intent};

use crate::messages;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardrailDecision {
    Allow,
    Deny { reason_code: &'static str, user_message: String, fallback_path: &'static str },
}

impl GuardrailDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Checks stock-changing intents before any call reaches the data service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardrailPolicy {
    pub orders_enabled: bool,
    pub restocking_enabled: bool,
}

impl Default for GuardrailPolicy {
    fn default() -> Self {
        Self { orders_enabled: true, restocking_enabled: true }
    }
}

impl GuardrailPolicy {
    pub fn evaluate(&self, intent: &Intent) -> GuardrailDecision {
        match intent {
            Intent::OrderPlacement { .. } if !self.orders_enabled => GuardrailDecision::Deny {
                reason_code: "orders_disabled",
                user_message: messages::UNRECOGNIZED.to_string(),
                fallback_path: "request_rephrase",
            },
            Intent::Restocking { .. } if !self.restocking_enabled => GuardrailDecision::Deny {
                reason_code: "restocking_disabled",
                user_message: messages::UNRECOGNIZED.to_string(),
                fallback_path: "request_rephrase",
            },
            Intent::OrderPlacement { item, quantity } | Intent::Restocking { item, quantity } => {
                match StockChange::new(item.clone(), *quantity).validate() {
                    Ok(()) => GuardrailDecision::Allow,
                    Err(error) => GuardrailDecision::Deny {
                        reason_code: reason_code(&error),
                        user_message: messages::UNRECOGNIZED.to_string(),
                        fallback_path: "request_rephrase",
                    },
                }
            }
            _ => GuardrailDecision::Allow,
        }
    }
}

fn reason_code(error: &DomainError) -> &'static str {
    match error {
        DomainError::EmptyFlavor => "empty_flavor",
        DomainError::InvalidQuantity { .. } => "non_positive_quantity",
        DomainError::StockLimitExceeded { .. } => "stock_limit_exceeded",
    }
}
