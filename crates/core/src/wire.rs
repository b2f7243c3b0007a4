//! JSON bodies exchanged between the data gateway and the data service.

use serde::{Deserialize, Serialize};

use crate::domain::flavor::Flavor;
use crate::domain::inventory::{FeedbackEntry, InventoryEntry, ReportEntry};

pub const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuResponse {
    pub flavors: Vec<Flavor>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryResponse {
    pub items: Vec<InventoryEntry>,
}

/// Result of the conditional decrement. `admitted` is the store's decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub item: Flavor,
    pub quantity: i64,
    pub admitted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockResponse {
    pub item: Flavor,
    pub quantity: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackListResponse {
    pub feedback: Vec<FeedbackEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportListResponse {
    pub report: Vec<ReportEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub correlation_id: String,
}
