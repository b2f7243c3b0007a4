use sqlx::Row;

use parlor_core::domain::inventory::ReportEntry;

use super::{ReportRepository, RepositoryError};
use crate::DbPool;

pub struct SqlReportRepository {
    pool: DbPool,
}

impl SqlReportRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_report(row: &sqlx::sqlite::SqliteRow) -> Result<ReportEntry, RepositoryError> {
    let feedback_summary: String =
        row.try_get("feedback_summary").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let average_rating: i64 =
        row.try_get("average_rating").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(ReportEntry { feedback_summary, average_rating })
}

#[async_trait::async_trait]
impl ReportRepository for SqlReportRepository {
    async fn list(&self) -> Result<Vec<ReportEntry>, RepositoryError> {
        let rows =
            sqlx::query("SELECT feedback_summary, average_rating FROM report ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(row_to_report).collect()
    }

    async fn append(&self, entry: ReportEntry) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO report (feedback_summary, average_rating) VALUES (?, ?)")
            .bind(&entry.feedback_summary)
            .bind(entry.average_rating)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use parlor_core::domain::inventory::ReportEntry;

    use super::SqlReportRepository;
    use crate::repositories::ReportRepository;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn appended_reports_round_trip() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let repo = SqlReportRepository::new(pool);

        assert!(repo.list().await.expect("empty list").is_empty());

        repo.append(ReportEntry {
            feedback_summary: "Customers love the new waffle cones".to_string(),
            average_rating: 4,
        })
        .await
        .expect("append");

        let reports = repo.list().await.expect("list");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].feedback_summary, "Customers love the new waffle cones");
        assert_eq!(reports[0].average_rating, 4);
    }

    #[tokio::test]
    async fn append_fails_when_table_is_missing() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        let repo = SqlReportRepository::new(pool);

        let result =
            repo.append(ReportEntry { feedback_summary: "x".to_string(), average_rating: 1 }).await;

        assert!(result.is_err());
    }
}
