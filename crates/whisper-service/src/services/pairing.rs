//! Pairing service
//!
//! The anonymous-chat state machine: IDLE -> QUEUED -> PAIRED -> IDLE.
//! All exclusivity guarantees live in the repository's atomic statements;
//! this layer sequences them and handles notification.

use tracing::{info, instrument};

use whisper_core::value_objects::AccountId;

use crate::dto::ChatMonitorEntry;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Pairing service
pub struct PairingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PairingService<'a> {
    /// Create a new PairingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Enter the waiting queue.
    ///
    /// Propagates `AlreadyInChat` / `AlreadyInQueue` rejections as-is; the
    /// adapter turns them into user messaging.
    #[instrument(skip(self))]
    pub async fn join(&self, id: AccountId) -> ServiceResult<()> {
        self.ctx.pairing_repo().join_queue(id).await.map_err(Into::into)
    }

    /// Try to pair with a random waiter. `None` means keep waiting.
    #[instrument(skip(self))]
    pub async fn find_partner(&self, id: AccountId) -> ServiceResult<Option<AccountId>> {
        let partner = self.ctx.pairing_repo().match_partner(id).await?;

        if let Some(partner_id) = partner {
            // The waiting side has no request in flight to learn about the
            // match; push them a wake-up. Best effort.
            self.ctx
                .notifier()
                .notify(partner_id, "A partner was found. Say hi!")
                .await
                .ok();
        }

        Ok(partner)
    }

    /// The account's current chat partner, if any
    #[instrument(skip(self))]
    pub async fn partner_of(&self, id: AccountId) -> ServiceResult<Option<AccountId>> {
        self.ctx.pairing_repo().get_partner(id).await.map_err(Into::into)
    }

    /// Relay bookkeeping for one delivered message: resolves the partner and
    /// appends to the message log. The adapter performs the actual delivery.
    #[instrument(skip(self, body))]
    pub async fn relay(&self, id: AccountId, body: Option<&str>) -> ServiceResult<AccountId> {
        let partner = self
            .ctx
            .pairing_repo()
            .get_partner(id)
            .await?
            .ok_or(ServiceError::Domain(
                whisper_core::DomainError::SessionNotFound,
            ))?;

        self.ctx.activity_repo().record_message(id, partner, body).await?;
        Ok(partner)
    }

    /// End the account's chat. Idempotent; returns the former partner when a
    /// session existed, after notifying them.
    #[instrument(skip(self))]
    pub async fn end(&self, id: AccountId) -> ServiceResult<Option<AccountId>> {
        let partner = self.ctx.pairing_repo().end_chat(id).await?;

        if let Some(partner_id) = partner {
            self.ctx
                .notifier()
                .notify(partner_id, "Your partner left the chat.")
                .await
                .ok();
        }

        Ok(partner)
    }

    /// Leave the waiting queue; no error if not queued
    #[instrument(skip(self))]
    pub async fn leave(&self, id: AccountId) -> ServiceResult<()> {
        self.ctx.pairing_repo().leave_queue(id).await.map_err(Into::into)
    }

    /// Live chats with message counts, for the operator monitor
    #[instrument(skip(self))]
    pub async fn monitor(&self) -> ServiceResult<Vec<ChatMonitorEntry>> {
        let chats = self.ctx.pairing_repo().active_chats().await?;

        let mut entries = Vec::with_capacity(chats.len());
        for chat in chats {
            let message_count = self
                .ctx
                .activity_repo()
                .count_between(chat.first, chat.second)
                .await?;

            entries.push(ChatMonitorEntry {
                session_id: chat.session_id,
                first: chat.first,
                second: chat.second,
                first_name: chat.first_name,
                second_name: chat.second_name,
                started_at: chat.created_at,
                message_count,
            });
        }

        Ok(entries)
    }

    /// Operator kill-switch: tear down a session by id, notifying both sides.
    #[instrument(skip(self))]
    pub async fn force_end(
        &self,
        moderator: AccountId,
        session_id: i64,
    ) -> ServiceResult<Option<(AccountId, AccountId)>> {
        let parties = self.ctx.pairing_repo().end_by_id(session_id).await?;

        if let Some((first, second)) = parties {
            info!(session_id, %first, %second, "chat ended by operator");

            self.ctx
                .activity_repo()
                .record_admin_action(
                    moderator,
                    "end_chat",
                    Some(&format!("session={session_id}")),
                )
                .await?;

            for party in [first, second] {
                self.ctx
                    .notifier()
                    .notify(party, "The chat was ended by a moderator.")
                    .await
                    .ok();
            }
        }

        Ok(parties)
    }
}
