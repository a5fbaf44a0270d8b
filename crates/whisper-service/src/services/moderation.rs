//! Moderation service
//!
//! Time-bounded bans, with the audit trail and best-effort notification of
//! the affected account.

use chrono::{DateTime, Duration, Utc};
use tracing::instrument;

use whisper_core::entities::BannedAccount;
use whisper_core::value_objects::AccountId;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Moderation service
pub struct ModerationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ModerationService<'a> {
    /// Create a new ModerationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check whether the account is currently banned.
    ///
    /// Mutating read: an expired ban row is reaped as part of this call.
    #[instrument(skip(self))]
    pub async fn check(&self, id: AccountId) -> ServiceResult<Option<DateTime<Utc>>> {
        self.ctx.moderation_repo().check_ban(id).await.map_err(Into::into)
    }

    /// Ban `target` for `duration`, replacing any existing ban.
    #[instrument(skip(self, reason))]
    pub async fn ban(
        &self,
        moderator: AccountId,
        target: AccountId,
        duration: Duration,
        reason: Option<&str>,
    ) -> ServiceResult<DateTime<Utc>> {
        let until = Utc::now() + duration;
        self.ctx.moderation_repo().ban(target, until, reason).await?;

        self.ctx
            .activity_repo()
            .record_admin_action(moderator, "ban", Some(&format!("target={target} until={until}")))
            .await?;

        // Best effort; a blocked bot must not fail the ban.
        self.ctx
            .notifier()
            .notify(target, &format!("You are muted until {until}."))
            .await
            .ok();

        Ok(until)
    }

    /// Lift the ban on `target`; returns whether one existed.
    #[instrument(skip(self))]
    pub async fn unban(&self, moderator: AccountId, target: AccountId) -> ServiceResult<bool> {
        let removed = self.ctx.moderation_repo().unban(target).await?;

        if removed {
            self.ctx
                .activity_repo()
                .record_admin_action(moderator, "unban", Some(&format!("target={target}")))
                .await?;

            self.ctx
                .notifier()
                .notify(target, "Your mute has been lifted.")
                .await
                .ok();
        }

        Ok(removed)
    }

    /// Currently-banned accounts for the operator listing
    #[instrument(skip(self))]
    pub async fn banned_list(&self) -> ServiceResult<Vec<BannedAccount>> {
        self.ctx.moderation_repo().banned().await.map_err(Into::into)
    }

    /// Count of currently-banned accounts
    #[instrument(skip(self))]
    pub async fn banned_count(&self) -> ServiceResult<i64> {
        self.ctx.moderation_repo().banned_count().await.map_err(Into::into)
    }
}
