//! Account entity - a durable identity record for one end-user of the bot

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::value_objects::AccountId;

/// Account entity
///
/// The id comes from the messaging platform and never changes. The token is a
/// capability credential minted exactly once at creation; anyone holding it
/// can address this account through a shareable link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub display_name: String,
    pub handle: String,
    pub token: String,
    pub is_admin: bool,
    pub is_superuser: bool,
    pub is_premium: bool,
    pub is_hidden: bool,
    pub balance: Decimal,
    pub total_deposited: Decimal,
    pub referral_code: Option<String>,
    pub referred_by: Option<AccountId>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new Account with a freshly minted token and zero balance
    pub fn new(id: AccountId, display_name: String, handle: String, token: String) -> Self {
        Self {
            id,
            display_name,
            handle,
            token,
            is_admin: false,
            is_superuser: false,
            is_premium: false,
            is_hidden: false,
            balance: Decimal::ZERO,
            total_deposited: Decimal::ZERO,
            referral_code: None,
            referred_by: None,
            created_at: Utc::now(),
        }
    }

    /// Whether this account was created within `window` of `now`
    ///
    /// Referral attribution uses this to distinguish a fresh signup from an
    /// established account re-clicking an old referral link.
    pub fn created_within(&self, window: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at) <= window
    }

    /// Whether referral attribution has already happened for this account
    #[inline]
    pub fn has_referrer(&self) -> bool {
        self.referred_by.is_some()
    }
}
