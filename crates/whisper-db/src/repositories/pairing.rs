//! PostgreSQL implementation of PairingRepository
//!
//! The queue is a shared contended resource: any number of accounts can call
//! `match_partner` against the same waiter pool at once. Every mutation here
//! is either a single guarded statement or one transaction whose row locks
//! make the check and the write indivisible.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

use whisper_core::entities::{ActiveChat, ChatSession};
use whisper_core::error::DomainError;
use whisper_core::traits::{PairingRepository, RepoResult};
use whisper_core::value_objects::AccountId;

use crate::models::{ActiveChatModel, SessionModel};

use super::error::map_db_error;

/// PostgreSQL implementation of PairingRepository
#[derive(Clone)]
pub struct PgPairingRepository {
    pool: PgPool,
}

impl PgPairingRepository {
    /// Create a new PgPairingRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn in_session(&self, id: AccountId) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM chat_sessions WHERE first_id = $1 OR second_id = $1
            )
            ",
        )
        .bind(id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

#[async_trait]
impl PairingRepository for PgPairingRepository {
    #[instrument(skip(self))]
    async fn join_queue(&self, id: AccountId) -> RepoResult<()> {
        // Session check and insert are one statement; the queue primary key
        // rejects a concurrent duplicate join.
        let result = sqlx::query(
            r"
            INSERT INTO chat_queue (account_id)
            SELECT $1
            WHERE NOT EXISTS (
                SELECT 1 FROM chat_sessions WHERE first_id = $1 OR second_id = $1
            )
            ON CONFLICT (account_id) DO NOTHING
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        // Nothing inserted; report which rule blocked it.
        if self.in_session(id).await? {
            Err(DomainError::AlreadyInChat)
        } else {
            Err(DomainError::AlreadyInQueue)
        }
    }

    #[instrument(skip(self))]
    async fn match_partner(&self, id: AccountId) -> RepoResult<Option<AccountId>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Lock our own queue entry first. A concurrent matcher's SKIP LOCKED
        // scan will pass over us while we hold it, so we cannot be claimed as
        // someone else's partner mid-match. No row means we either never
        // joined or were just matched away.
        let own_entry = sqlx::query_scalar::<_, i64>(
            r"
            SELECT account_id FROM chat_queue WHERE account_id = $1 FOR UPDATE
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if own_entry.is_none() {
            return Err(DomainError::NotQueued);
        }

        // Pop one uniformly random other waiter. SKIP LOCKED both avoids
        // deadlock and guarantees a waiter can only be popped once.
        let partner = sqlx::query_scalar::<_, i64>(
            r"
            DELETE FROM chat_queue
            WHERE account_id = (
                SELECT account_id FROM chat_queue
                WHERE account_id <> $1
                ORDER BY random()
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING account_id
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some(partner_id) = partner else {
            // No waiter available: roll back so our own entry stays queued.
            tx.rollback().await.map_err(map_db_error)?;
            return Ok(None);
        };

        sqlx::query(
            r"
            DELETE FROM chat_queue WHERE account_id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // Guarded insert: refuses to create the session if either party
        // somehow already has one. The UNIQUE columns are the backstop.
        let session_id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO chat_sessions (first_id, second_id)
            SELECT $1, $2
            WHERE NOT EXISTS (
                SELECT 1 FROM chat_sessions
                WHERE first_id IN ($1, $2) OR second_id IN ($1, $2)
            )
            RETURNING id
            ",
        )
        .bind(id.into_inner())
        .bind(partner_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if session_id.is_none() {
            tx.rollback().await.map_err(map_db_error)?;
            return Err(DomainError::AlreadyInChat);
        }

        tx.commit().await.map_err(map_db_error)?;

        info!(account_id = %id, partner_id, "chat paired");
        Ok(Some(AccountId::new(partner_id)))
    }

    #[instrument(skip(self))]
    async fn get_partner(&self, id: AccountId) -> RepoResult<Option<AccountId>> {
        let result = sqlx::query_as::<_, SessionModel>(
            r"
            SELECT id, first_id, second_id, created_at
            FROM chat_sessions
            WHERE first_id = $1 OR second_id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result
            .map(ChatSession::from)
            .and_then(|session| session.partner_of(id)))
    }

    #[instrument(skip(self))]
    async fn end_chat(&self, id: AccountId) -> RepoResult<Option<AccountId>> {
        let result = sqlx::query_as::<_, (i64, i64)>(
            r"
            DELETE FROM chat_sessions
            WHERE first_id = $1 OR second_id = $1
            RETURNING first_id, second_id
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(|(first, second)| {
            let partner = if first == id.into_inner() { second } else { first };
            info!(account_id = %id, partner_id = partner, "chat ended");
            AccountId::new(partner)
        }))
    }

    #[instrument(skip(self))]
    async fn leave_queue(&self, id: AccountId) -> RepoResult<()> {
        sqlx::query(
            r"
            DELETE FROM chat_queue WHERE account_id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn active_chats(&self) -> RepoResult<Vec<ActiveChat>> {
        let rows = sqlx::query_as::<_, ActiveChatModel>(
            r"
            SELECT cs.id, cs.first_id, cs.second_id, cs.created_at,
                   a1.display_name AS first_name,
                   a2.display_name AS second_name
            FROM chat_sessions cs
            LEFT JOIN accounts a1 ON cs.first_id = a1.id
            LEFT JOIN accounts a2 ON cs.second_id = a2.id
            ORDER BY cs.created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(ActiveChat::from).collect())
    }

    #[instrument(skip(self))]
    async fn end_by_id(&self, session_id: i64) -> RepoResult<Option<(AccountId, AccountId)>> {
        let result = sqlx::query_as::<_, (i64, i64)>(
            r"
            DELETE FROM chat_sessions WHERE id = $1
            RETURNING first_id, second_id
            ",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(|(first, second)| (AccountId::new(first), AccountId::new(second))))
    }
}
