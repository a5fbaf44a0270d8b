//! PostgreSQL implementation of ActivityRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use whisper_core::traits::{ActivityRepository, RepoResult};
use whisper_core::value_objects::AccountId;

use super::error::map_db_error;

/// PostgreSQL implementation of ActivityRepository
#[derive(Clone)]
pub struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    /// Create a new PgActivityRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for PgActivityRepository {
    #[instrument(skip(self, body))]
    async fn record_message(
        &self,
        sender: AccountId,
        receiver: AccountId,
        body: Option<&str>,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO message_log (sender_id, receiver_id, body)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(sender.into_inner())
        .bind(receiver.into_inner())
        .bind(body)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_between(&self, a: AccountId, b: AccountId) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM message_log
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ",
        )
        .bind(a.into_inner())
        .bind(b.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn last_activity(&self, id: AccountId) -> RepoResult<Option<DateTime<Utc>>> {
        let result = sqlx::query_scalar::<_, DateTime<Utc>>(
            r"
            SELECT sent_at FROM message_log
            WHERE sender_id = $1
            ORDER BY sent_at DESC
            LIMIT 1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, details))]
    async fn record_admin_action(
        &self,
        admin_id: AccountId,
        action: &str,
        details: Option<&str>,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO audit_log (admin_id, action, details)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(admin_id.into_inner())
        .bind(action)
        .bind(details)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
