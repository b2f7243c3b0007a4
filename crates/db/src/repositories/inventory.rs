use sqlx::Row;

use parlor_core::domain::flavor::Flavor;
use parlor_core::domain::inventory::InventoryEntry;

use super::{InventoryRepository, RepositoryError};
use crate::DbPool;

pub struct SqlInventoryRepository {
    pool: DbPool,
}

impl SqlInventoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<InventoryEntry, RepositoryError> {
    let flavor: String =
        row.try_get("flavor").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let quantity: i64 =
        row.try_get("quantity").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(InventoryEntry { flavor: Flavor::new(flavor), quantity })
}

#[async_trait::async_trait]
impl InventoryRepository for SqlInventoryRepository {
    async fn list(&self) -> Result<Vec<InventoryEntry>, RepositoryError> {
        let rows = sqlx::query("SELECT flavor, quantity FROM inventory ORDER BY flavor ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_entry).collect()
    }

    async fn available_flavors(&self) -> Result<Vec<Flavor>, RepositoryError> {
        let rows =
            sqlx::query("SELECT flavor FROM inventory WHERE quantity > 0 ORDER BY flavor ASC")
                .fetch_all(&self.pool)
                .await?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("flavor")
                    .map(Flavor::new)
                    .map_err(|e| RepositoryError::Decode(e.to_string()))
            })
            .collect()
    }

    async fn restock(
        &self,
        flavor: &Flavor,
        quantity: i64,
    ) -> Result<Option<i64>, RepositoryError> {
        let total: Option<i64> = sqlx::query_scalar(
            "INSERT INTO inventory (flavor, quantity, updated_at)
             VALUES (?, ?, strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
             ON CONFLICT(flavor) DO UPDATE SET
                 quantity = inventory.quantity + excluded.quantity,
                 updated_at = excluded.updated_at
             WHERE inventory.quantity <= 9223372036854775807 - excluded.quantity
             RETURNING quantity",
        )
        .bind(flavor.as_str())
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        match total {
            Some(total) => tracing::debug!(
                event_name = "db.inventory.restocked",
                flavor = flavor.as_str(),
                added = quantity,
                total,
                "inventory restocked"
            ),
            None => tracing::warn!(
                event_name = "db.inventory.restock_overflow",
                flavor = flavor.as_str(),
                added = quantity,
                "restock refused, total would overflow"
            ),
        }

        Ok(total)
    }

    async fn decrement_if_available(
        &self,
        flavor: &Flavor,
        quantity: i64,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE inventory
             SET quantity = quantity - ?,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
             WHERE flavor = ? AND quantity >= ?",
        )
        .bind(quantity)
        .bind(flavor.as_str())
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        let admitted = result.rows_affected() == 1;
        tracing::debug!(
            event_name = "db.inventory.decrement",
            flavor = flavor.as_str(),
            requested = quantity,
            admitted,
            "conditional decrement evaluated"
        );

        Ok(admitted)
    }
}
