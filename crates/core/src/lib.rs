pub mod config;
pub mod domain;
pub mod errors;
pub mod wire;

pub use domain::flavor::Flavor;
pub use domain::intent::Intent;
pub use domain::inventory::{FeedbackEntry, InventoryEntry, ReportEntry, StockChange};
pub use errors::{ApplicationError, DomainError, InterfaceError};
