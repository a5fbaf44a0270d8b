//! Account service
//!
//! Resolves inbound platform identities to accounts and serves the
//! account-level reads, including the operator overview.

use chrono::Utc;
use tracing::instrument;

use whisper_core::value_objects::AccountId;

use crate::dto::{AccountOverview, Registration, SubscriptionView};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Account service
pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    /// Create a new AccountService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve an inbound platform identity, creating the account on first
    /// contact. Idempotent; display fields are refreshed on repeat calls.
    ///
    /// The adapter calls this before any other operation. When the inbound
    /// event carried a referral code and `is_new` comes back true, it follows
    /// up with [`crate::services::ReferralService::attribute`].
    #[instrument(skip(self, display_name, handle))]
    pub async fn register(
        &self,
        id: AccountId,
        display_name: &str,
        handle: &str,
    ) -> ServiceResult<Registration> {
        let (token, is_new) = self
            .ctx
            .account_repo()
            .get_or_create(id, display_name, handle)
            .await?;

        Ok(Registration { token, is_new })
    }

    /// Resolve a shareable-link token to its account
    #[instrument(skip(self, token))]
    pub async fn resolve_link(&self, token: &str) -> ServiceResult<Option<AccountId>> {
        self.ctx
            .account_repo()
            .resolve_token(token)
            .await
            .map_err(Into::into)
    }

    /// Hide the account from inbound anonymous messages.
    ///
    /// Premium-gated on the stored flag; returns false when the gate rejects.
    #[instrument(skip(self))]
    pub async fn hide_profile(&self, id: AccountId) -> ServiceResult<bool> {
        self.ctx
            .account_repo()
            .set_hidden(id)
            .await
            .map_err(Into::into)
    }

    /// Whether the account holds operator privileges
    #[instrument(skip(self))]
    pub async fn is_operator(&self, id: AccountId) -> ServiceResult<bool> {
        self.ctx.account_repo().is_admin(id).await.map_err(Into::into)
    }

    /// All operator account ids (for operator broadcasts by the adapter)
    #[instrument(skip(self))]
    pub async fn operator_ids(&self) -> ServiceResult<Vec<AccountId>> {
        self.ctx.account_repo().admin_ids().await.map_err(Into::into)
    }

    /// Comprehensive report for the operator panel
    #[instrument(skip(self))]
    pub async fn overview(&self, id: AccountId) -> ServiceResult<AccountOverview> {
        let account = self
            .ctx
            .account_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", id.to_string()))?;

        let now = Utc::now();
        let subscription = self
            .ctx
            .subscription_repo()
            .active_subscription(id)
            .await?
            .map(|sub| SubscriptionView::from_entity(&sub, now));

        let referral_count = self.ctx.account_repo().referral_count(id).await?;
        let referral_earnings =
            self.ctx.referral().bonus * rust_decimal::Decimal::from(referral_count);

        let referrer_name = match account.referred_by {
            Some(referrer_id) => self
                .ctx
                .account_repo()
                .find_by_id(referrer_id)
                .await?
                .map(|referrer| referrer.display_name),
            None => None,
        };

        let last_activity = self.ctx.activity_repo().last_activity(id).await?;

        Ok(AccountOverview {
            id: account.id,
            display_name: account.display_name,
            handle: account.handle,
            is_admin: account.is_admin,
            is_premium: account.is_premium,
            is_hidden: account.is_hidden,
            balance: account.balance,
            total_deposited: account.total_deposited,
            created_at: account.created_at,
            subscription,
            referral_count,
            referral_earnings,
            referral_code: account.referral_code,
            referrer_name,
            last_activity,
        })
    }
}
