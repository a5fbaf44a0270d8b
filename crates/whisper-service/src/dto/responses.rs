//! Response DTOs
//!
//! Plain result values handed back to the adapter. The adapter owns all
//! user-facing wording; these carry the facts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use whisper_core::entities::Subscription;
use whisper_core::value_objects::AccountId;

/// Result of resolving an inbound account
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    /// Capability token for the account's shareable link
    pub token: String,
    /// Whether this call created the account
    pub is_new: bool,
}

/// A subscription window as presented to the adapter
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionView {
    pub plan: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    /// Derived: whether the window covers "now". The stored premium flag is
    /// not swept on expiry, so this is the field entitlement checks want.
    pub is_current: bool,
}

impl SubscriptionView {
    /// Build from the entity, deriving currency against `now`
    pub fn from_entity(subscription: &Subscription, now: DateTime<Utc>) -> Self {
        Self {
            plan: subscription.plan.as_str().to_string(),
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            is_active: subscription.is_active,
            is_current: subscription.is_current(now),
        }
    }
}

/// Premium status summary for one account
#[derive(Debug, Clone, Serialize)]
pub struct PremiumInfo {
    pub is_premium: bool,
    pub balance: Decimal,
    pub subscription: Option<SubscriptionView>,
}

/// Result of a balance-funded plan purchase
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PurchaseOutcome {
    /// Plan activated (or extended) and the price debited
    Activated {
        subscription_id: i64,
        payment_id: i64,
        paid: Decimal,
        remaining_balance: Decimal,
    },
    /// Balance below price; nothing was written
    InsufficientBalance {
        price: Decimal,
        balance: Decimal,
        shortfall: Decimal,
    },
}

/// Comprehensive per-account report for the operator surface
#[derive(Debug, Clone, Serialize)]
pub struct AccountOverview {
    pub id: AccountId,
    pub display_name: String,
    pub handle: String,
    pub is_admin: bool,
    pub is_premium: bool,
    pub is_hidden: bool,
    pub balance: Decimal,
    pub total_deposited: Decimal,
    pub created_at: DateTime<Utc>,
    pub subscription: Option<SubscriptionView>,
    pub referral_count: i64,
    pub referral_earnings: Decimal,
    pub referral_code: Option<String>,
    pub referrer_name: Option<String>,
    pub last_activity: Option<DateTime<Utc>>,
}

/// One live chat as shown in the operator monitor
#[derive(Debug, Clone, Serialize)]
pub struct ChatMonitorEntry {
    pub session_id: i64,
    pub first: AccountId,
    pub second: AccountId,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub started_at: DateTime<Utc>,
    pub message_count: i64,
}
