//! Service context - dependency container for services
//!
//! Holds the repositories, the notification collaborator, and the monetary
//! configuration. Everything is injected explicitly; there is no ambient
//! connection state, so tests can swap in fake stores.

use std::sync::Arc;

use whisper_common::{PlanPricing, ReferralConfig};
use whisper_core::traits::{
    AccountRepository, ActivityRepository, LedgerRepository, ModerationRepository, Notifier,
    PairingRepository, SubscriptionRepository,
};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    account_repo: Arc<dyn AccountRepository>,
    moderation_repo: Arc<dyn ModerationRepository>,
    pairing_repo: Arc<dyn PairingRepository>,
    ledger_repo: Arc<dyn LedgerRepository>,
    subscription_repo: Arc<dyn SubscriptionRepository>,
    activity_repo: Arc<dyn ActivityRepository>,

    // Outbound delivery (best effort, failures swallowed)
    notifier: Arc<dyn Notifier>,

    // Monetary configuration
    pricing: PlanPricing,
    referral: ReferralConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        moderation_repo: Arc<dyn ModerationRepository>,
        pairing_repo: Arc<dyn PairingRepository>,
        ledger_repo: Arc<dyn LedgerRepository>,
        subscription_repo: Arc<dyn SubscriptionRepository>,
        activity_repo: Arc<dyn ActivityRepository>,
        notifier: Arc<dyn Notifier>,
        pricing: PlanPricing,
        referral: ReferralConfig,
    ) -> Self {
        Self {
            account_repo,
            moderation_repo,
            pairing_repo,
            ledger_repo,
            subscription_repo,
            activity_repo,
            notifier,
            pricing,
            referral,
        }
    }

    // === Repositories ===

    /// Get the account repository
    pub fn account_repo(&self) -> &dyn AccountRepository {
        self.account_repo.as_ref()
    }

    /// Get the moderation repository
    pub fn moderation_repo(&self) -> &dyn ModerationRepository {
        self.moderation_repo.as_ref()
    }

    /// Get the pairing repository
    pub fn pairing_repo(&self) -> &dyn PairingRepository {
        self.pairing_repo.as_ref()
    }

    /// Get the ledger repository
    pub fn ledger_repo(&self) -> &dyn LedgerRepository {
        self.ledger_repo.as_ref()
    }

    /// Get the subscription repository
    pub fn subscription_repo(&self) -> &dyn SubscriptionRepository {
        self.subscription_repo.as_ref()
    }

    /// Get the activity repository
    pub fn activity_repo(&self) -> &dyn ActivityRepository {
        self.activity_repo.as_ref()
    }

    // === Collaborators ===

    /// Get the outbound notifier
    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    // === Configuration ===

    /// Get the plan price table
    pub fn pricing(&self) -> &PlanPricing {
        &self.pricing
    }

    /// Get the referral program configuration
    pub fn referral(&self) -> &ReferralConfig {
        &self.referral
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("pricing", &self.pricing)
            .field("referral", &self.referral)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    account_repo: Option<Arc<dyn AccountRepository>>,
    moderation_repo: Option<Arc<dyn ModerationRepository>>,
    pairing_repo: Option<Arc<dyn PairingRepository>>,
    ledger_repo: Option<Arc<dyn LedgerRepository>>,
    subscription_repo: Option<Arc<dyn SubscriptionRepository>>,
    activity_repo: Option<Arc<dyn ActivityRepository>>,
    notifier: Option<Arc<dyn Notifier>>,
    pricing: Option<PlanPricing>,
    referral: Option<ReferralConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_repo(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.account_repo = Some(repo);
        self
    }

    pub fn moderation_repo(mut self, repo: Arc<dyn ModerationRepository>) -> Self {
        self.moderation_repo = Some(repo);
        self
    }

    pub fn pairing_repo(mut self, repo: Arc<dyn PairingRepository>) -> Self {
        self.pairing_repo = Some(repo);
        self
    }

    pub fn ledger_repo(mut self, repo: Arc<dyn LedgerRepository>) -> Self {
        self.ledger_repo = Some(repo);
        self
    }

    pub fn subscription_repo(mut self, repo: Arc<dyn SubscriptionRepository>) -> Self {
        self.subscription_repo = Some(repo);
        self
    }

    pub fn activity_repo(mut self, repo: Arc<dyn ActivityRepository>) -> Self {
        self.activity_repo = Some(repo);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn pricing(mut self, pricing: PlanPricing) -> Self {
        self.pricing = Some(pricing);
        self
    }

    pub fn referral(mut self, referral: ReferralConfig) -> Self {
        self.referral = Some(referral);
        self
    }

    /// Build the ServiceContext
    ///
    /// Pricing and referral configuration fall back to their defaults; every
    /// repository and the notifier are required.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext::new(
            self.account_repo
                .ok_or_else(|| ServiceError::validation("account_repo is required"))?,
            self.moderation_repo
                .ok_or_else(|| ServiceError::validation("moderation_repo is required"))?,
            self.pairing_repo
                .ok_or_else(|| ServiceError::validation("pairing_repo is required"))?,
            self.ledger_repo
                .ok_or_else(|| ServiceError::validation("ledger_repo is required"))?,
            self.subscription_repo
                .ok_or_else(|| ServiceError::validation("subscription_repo is required"))?,
            self.activity_repo
                .ok_or_else(|| ServiceError::validation("activity_repo is required"))?,
            self.notifier
                .ok_or_else(|| ServiceError::validation("notifier is required"))?,
            self.pricing.unwrap_or_default(),
            self.referral.unwrap_or_default(),
        ))
    }
}
