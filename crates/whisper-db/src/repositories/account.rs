//! PostgreSQL implementation of AccountRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

use whisper_core::entities::Account;
use whisper_core::error::DomainError;
use whisper_core::traits::{AccountRepository, CodeClaim, RepoResult};
use whisper_core::value_objects::{generate_link_token, AccountId};

use crate::models::AccountModel;

use super::error::{account_not_found, is_unique_violation, map_db_error};

/// How many token candidates to try before giving up. The token space is
/// 62^8, so a second attempt is already vanishingly rare.
const MAX_TOKEN_ATTEMPTS: usize = 4;

const ACCOUNT_COLUMNS: &str = "id, display_name, handle, token, is_admin, is_superuser, \
     is_premium, is_hidden, balance, total_deposited, referral_code, referred_by, created_at";

/// PostgreSQL implementation of AccountRepository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new PgAccountRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self))]
    async fn get_or_create(
        &self,
        id: AccountId,
        display_name: &str,
        handle: &str,
    ) -> RepoResult<(String, bool)> {
        // Existing account: refresh display fields if they changed and hand
        // back the stored token.
        let existing = sqlx::query_as::<_, (String, String, String)>(
            r"
            SELECT token, display_name, handle FROM accounts WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        if let Some((token, stored_name, stored_handle)) = existing {
            if stored_name != display_name || stored_handle != handle {
                self.update_display_fields(id, display_name, handle).await?;
            }
            return Ok((token, false));
        }

        // New account. The primary key arbitrates a same-id insert race via
        // ON CONFLICT DO NOTHING; a unique violation can then only be the
        // token column, so regenerate and retry.
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = generate_link_token();
            let inserted = sqlx::query_scalar::<_, String>(
                r"
                INSERT INTO accounts (id, display_name, handle, token)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO NOTHING
                RETURNING token
                ",
            )
            .bind(id.into_inner())
            .bind(display_name)
            .bind(handle)
            .bind(&token)
            .fetch_optional(&self.pool)
            .await;

            match inserted {
                Ok(Some(token)) => {
                    info!(account_id = %id, "account created");
                    return Ok((token, true));
                }
                Ok(None) => {
                    // Lost the insert race; the winner's token is authoritative.
                    let token = sqlx::query_scalar::<_, String>(
                        r"
                        SELECT token FROM accounts WHERE id = $1
                        ",
                    )
                    .bind(id.into_inner())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_db_error)?;
                    return Ok((token, false));
                }
                Err(e) if is_unique_violation(&e) => continue,
                Err(e) => return Err(map_db_error(e)),
            }
        }

        Err(DomainError::InternalError(
            "could not mint a unique link token".to_string(),
        ))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: AccountId) -> RepoResult<Option<Account>> {
        let result = sqlx::query_as::<_, AccountModel>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Account::from))
    }

    #[instrument(skip(self, token))]
    async fn resolve_token(&self, token: &str) -> RepoResult<Option<AccountId>> {
        let result = sqlx::query_scalar::<_, i64>(
            r"
            SELECT id FROM accounts WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(AccountId::new))
    }

    #[instrument(skip(self))]
    async fn update_display_fields(
        &self,
        id: AccountId,
        display_name: &str,
        handle: &str,
    ) -> RepoResult<()> {
        // The WHERE clause skips the write entirely when nothing changed.
        sqlx::query(
            r"
            UPDATE accounts
            SET display_name = $2, handle = $3
            WHERE id = $1
              AND (display_name IS DISTINCT FROM $2 OR handle IS DISTINCT FROM $3)
            ",
        )
        .bind(id.into_inner())
        .bind(display_name)
        .bind(handle)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_hidden(&self, id: AccountId) -> RepoResult<bool> {
        // The premium gate and the write are one statement.
        let result = sqlx::query(
            r"
            UPDATE accounts SET is_hidden = TRUE WHERE id = $1 AND is_premium
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }

        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)
            ",
        )
        .bind(id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        if exists {
            Ok(false)
        } else {
            Err(account_not_found(id))
        }
    }

    #[instrument(skip(self))]
    async fn is_admin(&self, id: AccountId) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT is_admin FROM accounts WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.unwrap_or(false))
    }

    #[instrument(skip(self))]
    async fn is_premium(&self, id: AccountId) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT is_premium FROM accounts WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.unwrap_or(false))
    }

    #[instrument(skip(self))]
    async fn admin_ids(&self) -> RepoResult<Vec<AccountId>> {
        let rows = sqlx::query_scalar::<_, i64>(
            r"
            SELECT id FROM accounts WHERE is_admin = TRUE
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(AccountId::new).collect())
    }

    #[instrument(skip(self, code))]
    async fn find_by_referral_code(&self, code: &str) -> RepoResult<Option<Account>> {
        let result = sqlx::query_as::<_, AccountModel>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE referral_code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Account::from))
    }

    #[instrument(skip(self))]
    async fn referral_code(&self, id: AccountId) -> RepoResult<Option<String>> {
        let result = sqlx::query_scalar::<_, Option<String>>(
            r"
            SELECT referral_code FROM accounts WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.flatten())
    }

    #[instrument(skip(self, code))]
    async fn try_claim_referral_code(&self, id: AccountId, code: &str) -> RepoResult<CodeClaim> {
        let result = sqlx::query(
            r"
            UPDATE accounts SET referral_code = $2
            WHERE id = $1 AND referral_code IS NULL
            ",
        )
        .bind(id.into_inner())
        .bind(code)
        .execute(&self.pool)
        .await;

        match result {
            Ok(r) if r.rows_affected() == 1 => Ok(CodeClaim::Claimed),
            Ok(_) => {
                // Nothing written: either a code already exists (possibly set
                // by a concurrent call) or the account is missing.
                let existing = sqlx::query_scalar::<_, Option<String>>(
                    r"
                    SELECT referral_code FROM accounts WHERE id = $1
                    ",
                )
                .bind(id.into_inner())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

                match existing {
                    Some(Some(code)) => Ok(CodeClaim::AlreadySet(code)),
                    Some(None) => Ok(CodeClaim::CodeTaken),
                    None => Err(account_not_found(id)),
                }
            }
            Err(e) if is_unique_violation(&e) => Ok(CodeClaim::CodeTaken),
            Err(e) => Err(map_db_error(e)),
        }
    }

    #[instrument(skip(self))]
    async fn set_referrer_if_unset(
        &self,
        id: AccountId,
        referrer: AccountId,
    ) -> RepoResult<bool> {
        // Conditional write is the one-shot guard: a retried attribution
        // finds referred_by already set and writes nothing.
        let result = sqlx::query(
            r"
            UPDATE accounts SET referred_by = $2
            WHERE id = $1 AND referred_by IS NULL
            ",
        )
        .bind(id.into_inner())
        .bind(referrer.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn referral_count(&self, id: AccountId) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM accounts WHERE referred_by = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}
