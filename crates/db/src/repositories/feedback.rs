use sqlx::Row;

use parlor_core::domain::inventory::FeedbackEntry;

use super::{FeedbackRepository, RepositoryError};
use crate::DbPool;

pub struct SqlFeedbackRepository {
    pool: DbPool,
}

impl SqlFeedbackRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_feedback(row: &sqlx::sqlite::SqliteRow) -> Result<FeedbackEntry, RepositoryError> {
    let comment: String =
        row.try_get("comment").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let rating: i64 = row.try_get("rating").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(FeedbackEntry { comment, rating })
}

#[async_trait::async_trait]
impl FeedbackRepository for SqlFeedbackRepository {
    async fn list(&self) -> Result<Vec<FeedbackEntry>, RepositoryError> {
        let rows = sqlx::query("SELECT comment, rating FROM feedback ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_feedback).collect()
    }

    async fn append(&self, entry: FeedbackEntry) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO feedback (comment, rating) VALUES (?, ?)")
            .bind(&entry.comment)
            .bind(entry.rating)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use parlor_core::domain::inventory::FeedbackEntry;

    use super::SqlFeedbackRepository;
    use crate::repositories::FeedbackRepository;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn feedback_is_listed_in_submission_order() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let repo = SqlFeedbackRepository::new(pool);

        repo.append(FeedbackEntry { comment: "Great mint".to_string(), rating: 5 })
            .await
            .expect("first");
        repo.append(FeedbackEntry { comment: "Too sweet, don't you think?".to_string(), rating: 2 })
            .await
            .expect("second");

        let entries = repo.list().await.expect("list");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].comment, "Great mint");
        assert_eq!(entries[1].comment, "Too sweet, don't you think?");
        assert_eq!(entries[1].rating, 2);
    }
}
