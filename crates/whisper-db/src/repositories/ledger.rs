//! PostgreSQL implementation of LedgerRepository

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument};

use whisper_core::entities::{Payment, PaymentStatus};
use whisper_core::error::DomainError;
use whisper_core::traits::{LedgerRepository, NewPayment, RepoResult};
use whisper_core::value_objects::AccountId;

use crate::models::PaymentModel;

use super::error::{account_not_found, map_db_error, map_unique_violation};

const PAYMENT_COLUMNS: &str = "id, account_id, amount, method::text AS method, \
     status::text AS status, transaction_id, merchant_data, created_at";

/// PostgreSQL implementation of LedgerRepository
#[derive(Clone)]
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    /// Create a new PgLedgerRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    #[instrument(skip(self))]
    async fn credit(
        &self,
        id: AccountId,
        amount: Decimal,
        also_increment_total: bool,
    ) -> RepoResult<()> {
        // Relative updates compose under concurrency; two credits landing
        // together both apply, no read-modify-write window.
        let result = if also_increment_total {
            sqlx::query(
                r"
                UPDATE accounts
                SET balance = balance + $2, total_deposited = total_deposited + $2
                WHERE id = $1
                ",
            )
            .bind(id.into_inner())
            .bind(amount)
            .execute(&self.pool)
            .await
        } else {
            sqlx::query(
                r"
                UPDATE accounts SET balance = balance + $2 WHERE id = $1
                ",
            )
            .bind(id.into_inner())
            .bind(amount)
            .execute(&self.pool)
            .await
        }
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(account_not_found(id));
        }

        info!(account_id = %id, %amount, also_increment_total, "balance updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn balance(&self, id: AccountId) -> RepoResult<Option<(Decimal, Decimal)>> {
        let result = sqlx::query_as::<_, (Decimal, Decimal)>(
            r"
            SELECT balance, total_deposited FROM accounts WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, payment))]
    async fn create_payment(&self, payment: &NewPayment<'_>) -> RepoResult<i64> {
        // Only the internal balance method is accepted for new rows; the
        // gateway methods exist solely so historical data still decodes.
        if !payment.method.accepts_new_payments() {
            return Err(DomainError::PaymentMethodNotAllowed(
                payment.method.as_str().to_string(),
            ));
        }

        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO payments (account_id, amount, method, status, transaction_id, merchant_data)
            VALUES ($1, $2, $3::payment_method, 'pending', $4, $5)
            RETURNING id
            ",
        )
        .bind(payment.account_id.into_inner())
        .bind(payment.amount)
        .bind(payment.method.as_str())
        .bind(payment.transaction_id)
        .bind(payment.merchant_data)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::DuplicateTransaction(
                    payment.transaction_id.unwrap_or_default().to_string(),
                )
            })
        })?;

        Ok(id)
    }

    #[instrument(skip(self, transaction_id))]
    async fn transaction_exists(&self, transaction_id: &str) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM payments WHERE transaction_id = $1)
            ",
        )
        .bind(transaction_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self, transaction_id))]
    async fn update_payment_status(
        &self,
        payment_id: i64,
        status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> RepoResult<()> {
        let result = if let Some(txn) = transaction_id {
            sqlx::query(
                r"
                UPDATE payments
                SET status = $2::payment_status, transaction_id = $3
                WHERE id = $1
                ",
            )
            .bind(payment_id)
            .bind(status.as_str())
            .bind(txn)
            .execute(&self.pool)
            .await
        } else {
            sqlx::query(
                r"
                UPDATE payments SET status = $2::payment_status WHERE id = $1
                ",
            )
            .bind(payment_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
        }
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::DuplicateTransaction(
                    transaction_id.unwrap_or_default().to_string(),
                )
            })
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PaymentNotFound(payment_id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn payment_history(&self, id: AccountId, limit: i64) -> RepoResult<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentModel>(&format!(
            r"
            SELECT {PAYMENT_COLUMNS}
            FROM payments
            WHERE account_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "
        ))
        .bind(id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Payment::try_from).collect()
    }
}
