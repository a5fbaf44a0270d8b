//! Referral service
//!
//! Attributes a fresh signup to its referrer exactly once and pays the fixed
//! bonus. Every check short-circuits to `false` - these are expected
//! outcomes (old account, bad code, replayed request), not faults.

use chrono::{Duration, Utc};
use tracing::{info, instrument};

use whisper_core::entities::ReferralStats;
use whisper_core::traits::CodeClaim;
use whisper_core::value_objects::{generate_referral_code, AccountId};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// How many code candidates to try before giving up; the space is 36^8.
const MAX_CODE_ATTEMPTS: usize = 8;

/// Referral service
pub struct ReferralService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReferralService<'a> {
    /// Create a new ReferralService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Attribute `new_account_id` to the owner of `referral_code`.
    ///
    /// Returns whether attribution happened. Rules, in order:
    /// 1. the account exists and has no referrer yet;
    /// 2. it was created within the grace window (a fresh signup, not an old
    ///    account re-clicking a link);
    /// 3. the code resolves to a referrer;
    /// 4. no self-referral.
    ///
    /// The conditional `referred_by` write is the one-shot guard; a replayed
    /// request loses it and no second bonus is paid. The bonus is plain
    /// balance, never a deposit. Notification is best effort.
    #[instrument(skip(self, referral_code))]
    pub async fn attribute(
        &self,
        new_account_id: AccountId,
        referral_code: &str,
    ) -> ServiceResult<bool> {
        let Some(account) = self.ctx.account_repo().find_by_id(new_account_id).await? else {
            return Ok(false);
        };

        if account.has_referrer() {
            return Ok(false);
        }

        let grace = Duration::seconds(self.ctx.referral().grace_seconds);
        if !account.created_within(grace, Utc::now()) {
            return Ok(false);
        }

        let Some(referrer) = self
            .ctx
            .account_repo()
            .find_by_referral_code(referral_code)
            .await?
        else {
            return Ok(false);
        };

        if referrer.id == new_account_id {
            return Ok(false);
        }

        if !self
            .ctx
            .account_repo()
            .set_referrer_if_unset(new_account_id, referrer.id)
            .await?
        {
            // Raced with another attribution for the same account.
            return Ok(false);
        }

        let bonus = self.ctx.referral().bonus;
        self.ctx.ledger_repo().credit(referrer.id, bonus, false).await?;

        info!(
            new_account = %new_account_id,
            referrer = %referrer.id,
            %bonus,
            "referral attributed"
        );

        // The attribution and the credit stand regardless of whether this
        // lands.
        if let Ok(Some((balance, _))) = self.ctx.ledger_repo().balance(referrer.id).await {
            self.ctx
                .notifier()
                .notify(
                    referrer.id,
                    &format!("A new user joined via your link: +{bonus}. Balance: {balance}."),
                )
                .await
                .ok();
        }

        Ok(true)
    }

    /// Referral statistics; earnings are derived, never stored
    #[instrument(skip(self))]
    pub async fn stats(&self, id: AccountId) -> ServiceResult<ReferralStats> {
        let account = self
            .ctx
            .account_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", id.to_string()))?;

        let count = self.ctx.account_repo().referral_count(id).await?;

        let referrer_name = match account.referred_by {
            Some(referrer_id) => self
                .ctx
                .account_repo()
                .find_by_id(referrer_id)
                .await?
                .map(|referrer| referrer.display_name),
            None => None,
        };

        Ok(ReferralStats::from_count(
            count,
            self.ctx.referral().bonus,
            account.referral_code,
            account.referred_by,
            referrer_name,
        ))
    }

    /// Return the account's referral code, generating one on first use.
    ///
    /// Generation retries on collision until a globally unique candidate
    /// lands; a concurrent call for the same account may win, in which case
    /// its code is returned.
    #[instrument(skip(self))]
    pub async fn ensure_code(&self, id: AccountId) -> ServiceResult<String> {
        if let Some(existing) = self.ctx.account_repo().referral_code(id).await? {
            return Ok(existing);
        }

        for _ in 0..MAX_CODE_ATTEMPTS {
            let candidate = generate_referral_code();
            match self
                .ctx
                .account_repo()
                .try_claim_referral_code(id, &candidate)
                .await?
            {
                CodeClaim::Claimed => return Ok(candidate),
                CodeClaim::AlreadySet(code) => return Ok(code),
                CodeClaim::CodeTaken => continue,
            }
        }

        Err(ServiceError::internal(
            "could not generate a unique referral code",
        ))
    }
}
