//! The fixed vocabulary of requests the parlor assistant understands.
//!
//! Every free-text message is resolved to exactly one [`Intent`]. Payload
//! fields are always populated; the classifier applies the declared defaults
//! (`""` for text, `0` for numbers) when the model leaves them out.

use serde::{Deserialize, Serialize};

use super::flavor::Flavor;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum Intent {
    MenuRetrieval,
    InventoryRetrieval,
    OrderPlacement { item: Flavor, quantity: i64 },
    Restocking { item: Flavor, quantity: i64 },
    FeedbackSubmission { comment: String, rating: i64 },
    FeedbackRetrieval,
    ReportSubmission { feedback_summary: String, average_rating: i64 },
    ReportRetrieval,
    Inquiry { question: String, answer: String },
    Unrecognized,
}

impl Intent {
    /// Wire tag used by the classifier prompt and in structured logs.
    pub fn request_kind(&self) -> &'static str {
        match self {
            Self::MenuRetrieval => "menu_retrieval",
            Self::InventoryRetrieval => "inventory_retrieval",
            Self::OrderPlacement { .. } => "order_placement",
            Self::Restocking { .. } => "restocking",
            Self::FeedbackSubmission { .. } => "feedback_submission",
            Self::FeedbackRetrieval => "feedback_retrieval",
            Self::ReportSubmission { .. } => "report_submission",
            Self::ReportRetrieval => "report_retrieval",
            Self::Inquiry { .. } => "inquiry",
            Self::Unrecognized => "unrecognized",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }

    /// Whether dispatching this intent writes to the data service.
    pub fn mutates_state(&self) -> bool {
        matches!(
            self,
            Self::OrderPlacement { .. }
                | Self::Restocking { .. }
                | Self::FeedbackSubmission { .. }
                | Self::ReportSubmission { .. }
        )
    }
}
