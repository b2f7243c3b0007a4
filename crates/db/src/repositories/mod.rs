use async_trait::async_trait;
use thiserror::Error;

use parlor_core::domain::flavor::Flavor;
use parlor_core::domain::inventory::{FeedbackEntry, InventoryEntry, ReportEntry};
use parlor_core::ApplicationError;

pub mod feedback;
pub mod inventory;
pub mod report;

pub use feedback::SqlFeedbackRepository;
pub use inventory::SqlInventoryRepository;
pub use report::SqlReportRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        ApplicationError::Persistence(error.to_string())
    }
}

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Every stocked flavor ordered by name, including sold-out ones.
    async fn list(&self) -> Result<Vec<InventoryEntry>, RepositoryError>;

    /// Flavors with positive stock ordered by name.
    async fn available_flavors(&self) -> Result<Vec<Flavor>, RepositoryError>;

    /// Adds `quantity` to the flavor, creating the row on first restock.
    /// Returns the new total, or `None` when the sum would not fit in an
    /// `i64`; the stored quantity is then left unchanged.
    async fn restock(&self, flavor: &Flavor, quantity: i64)
        -> Result<Option<i64>, RepositoryError>;

    /// Removes `quantity` only if at least that much is on hand. Returns
    /// whether the decrement was applied.
    async fn decrement_if_available(
        &self,
        flavor: &Flavor,
        quantity: i64,
    ) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<FeedbackEntry>, RepositoryError>;
    async fn append(&self, entry: FeedbackEntry) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<ReportEntry>, RepositoryError>;
    async fn append(&self, entry: ReportEntry) -> Result<(), RepositoryError>;
}
