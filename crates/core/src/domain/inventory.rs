use serde::{Deserialize, Serialize};

use super::flavor::Flavor;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    #[serde(rename = "item")]
    pub flavor: Flavor,
    pub quantity: i64,
}

impl InventoryEntry {
    pub fn covers(&self, flavor: &Flavor, quantity: i64) -> bool {
        &self.flavor == flavor && self.quantity >= quantity
    }
}

/// A requested change in stock for one flavor (order or restock).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChange {
    pub item: Flavor,
    pub quantity: i64,
}

impl StockChange {
    pub fn new(item: impl Into<Flavor>, quantity: i64) -> Self {
        Self { item: item.into(), quantity }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.item.is_empty() {
            return Err(DomainError::EmptyFlavor);
        }
        if self.quantity <= 0 {
            return Err(DomainError::InvalidQuantity { quantity: self.quantity });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub comment: String,
    pub rating: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub feedback_summary: String,
    pub average_rating: i64,
}
