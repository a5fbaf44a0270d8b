//! PostgreSQL implementation of ModerationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, instrument};

use whisper_core::entities::{Ban, BannedAccount};
use whisper_core::traits::{ModerationRepository, RepoResult};
use whisper_core::value_objects::AccountId;

use crate::models::{BanModel, BannedRowModel};

use super::error::map_db_error;

/// PostgreSQL implementation of ModerationRepository
#[derive(Clone)]
pub struct PgModerationRepository {
    pool: PgPool,
}

impl PgModerationRepository {
    /// Create a new PgModerationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModerationRepository for PgModerationRepository {
    #[instrument(skip(self))]
    async fn check_ban(&self, id: AccountId) -> RepoResult<Option<DateTime<Utc>>> {
        let row = sqlx::query_as::<_, BanModel>(
            r"
            SELECT account_id, muted_until, reason, created_at
            FROM muted_accounts
            WHERE account_id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .map(Ban::from);

        match row {
            Some(ban) if !ban.is_expired(Utc::now()) => Ok(Some(ban.muted_until)),
            Some(_) => {
                // Lazy reap. The muted_until guard keeps a concurrent re-ban
                // from being deleted out from under the moderator.
                sqlx::query(
                    r"
                    DELETE FROM muted_accounts
                    WHERE account_id = $1 AND muted_until <= now()
                    ",
                )
                .bind(id.into_inner())
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn ban(
        &self,
        id: AccountId,
        until: DateTime<Utc>,
        reason: Option<&str>,
    ) -> RepoResult<()> {
        // Upsert: a new ban replaces the old one outright, durations never stack.
        sqlx::query(
            r"
            INSERT INTO muted_accounts (account_id, muted_until, reason)
            VALUES ($1, $2, $3)
            ON CONFLICT (account_id)
            DO UPDATE SET muted_until = $2, reason = $3, created_at = now()
            ",
        )
        .bind(id.into_inner())
        .bind(until)
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        info!(account_id = %id, until = %until, "account banned");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn unban(&self, id: AccountId) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM muted_accounts WHERE account_id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn banned(&self) -> RepoResult<Vec<BannedAccount>> {
        let rows = sqlx::query_as::<_, BannedRowModel>(
            r"
            SELECT mu.account_id, mu.muted_until, mu.reason, mu.created_at,
                   a.display_name, a.handle
            FROM muted_accounts mu
            LEFT JOIN accounts a ON mu.account_id = a.id
            WHERE mu.muted_until > now()
            ORDER BY mu.muted_until DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(BannedAccount::from).collect())
    }

    #[instrument(skip(self))]
    async fn banned_count(&self) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM muted_accounts WHERE muted_until > now()
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}
