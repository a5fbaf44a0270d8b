//! PostgreSQL implementation of SubscriptionRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument};

use whisper_core::entities::{Plan, Subscription};
use whisper_core::traits::{RepoResult, SubscriptionRepository};
use whisper_core::value_objects::AccountId;

use crate::models::SubscriptionModel;

use super::error::{account_not_found, map_db_error};

const SUBSCRIPTION_COLUMNS: &str =
    "id, account_id, plan::text AS plan, start_date, end_date, is_active, created_at";

/// PostgreSQL implementation of SubscriptionRepository
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    /// Create a new PgSubscriptionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    #[instrument(skip(self))]
    async fn activate_or_extend(&self, id: AccountId, plan: Plan) -> RepoResult<i64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row-level lock on the account serializes concurrent purchases for
        // the same buyer: the second one blocks here and then reads the end
        // date the first one wrote, so no extension is lost.
        let locked = sqlx::query_scalar::<_, i64>(
            r"
            SELECT id FROM accounts WHERE id = $1 FOR UPDATE
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if locked.is_none() {
            return Err(account_not_found(id));
        }

        let current = sqlx::query_as::<_, (i64, chrono::DateTime<Utc>)>(
            r"
            SELECT id, end_date
            FROM subscriptions
            WHERE account_id = $1 AND is_active = TRUE
            ORDER BY end_date DESC
            LIMIT 1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let now = Utc::now();
        let subscription_id = if let Some((sub_id, end_date)) = current {
            // A still-open window extends contiguously from its end; a lapsed
            // one restarts from now. Either way the row is reused in place.
            let (start_date, new_end) = if end_date > now {
                (end_date, end_date + plan.duration())
            } else {
                (now, now + plan.duration())
            };

            sqlx::query(
                r"
                UPDATE subscriptions
                SET plan = $2::plan_type, start_date = $3, end_date = $4
                WHERE id = $1
                ",
            )
            .bind(sub_id)
            .bind(plan.as_str())
            .bind(start_date)
            .bind(new_end)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            sub_id
        } else {
            sqlx::query_scalar::<_, i64>(
                r"
                INSERT INTO subscriptions (account_id, plan, start_date, end_date, is_active)
                VALUES ($1, $2::plan_type, $3, $4, TRUE)
                RETURNING id
                ",
            )
            .bind(id.into_inner())
            .bind(plan.as_str())
            .bind(now)
            .bind(now + plan.duration())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?
        };

        // Unconditional; nothing ever clears this flag when a window lapses,
        // readers derive entitlement from the window.
        sqlx::query(
            r"
            UPDATE accounts SET is_premium = TRUE WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        info!(account_id = %id, %plan, subscription_id, "subscription activated");
        Ok(subscription_id)
    }

    #[instrument(skip(self))]
    async fn active_subscription(&self, id: AccountId) -> RepoResult<Option<Subscription>> {
        let row = sqlx::query_as::<_, SubscriptionModel>(&format!(
            r"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM subscriptions
            WHERE account_id = $1 AND is_active = TRUE
            ORDER BY end_date DESC
            LIMIT 1
            "
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Subscription::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgSubscriptionRepository>();
    }
}
