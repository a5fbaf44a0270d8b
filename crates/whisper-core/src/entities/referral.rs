//! Referral statistics - a derived, read-only view

use rust_decimal::Decimal;

use crate::value_objects::AccountId;

/// Referral statistics for one account
///
/// `earnings` is computed as `count x bonus` at read time so it can never
/// drift from the count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralStats {
    pub referral_count: i64,
    pub referral_earnings: Decimal,
    pub referral_code: Option<String>,
    pub referred_by: Option<AccountId>,
    pub referrer_name: Option<String>,
}

impl ReferralStats {
    /// Build stats from a raw count and the configured per-referral bonus
    pub fn from_count(
        referral_count: i64,
        bonus: Decimal,
        referral_code: Option<String>,
        referred_by: Option<AccountId>,
        referrer_name: Option<String>,
    ) -> Self {
        Self {
            referral_count,
            referral_earnings: bonus * Decimal::from(referral_count),
            referral_code,
            referred_by,
            referrer_name,
        }
    }
}
