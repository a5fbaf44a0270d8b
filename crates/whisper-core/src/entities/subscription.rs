//! Subscription entity and plan tiers

use chrono::{DateTime, Duration, Utc};

use crate::value_objects::AccountId;

/// Subscription plan tier
///
/// Each tier maps to a fixed day count. Prices live in configuration, not
/// here, so the extension algorithm stays independent of monetary values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plan {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl Plan {
    /// All tiers, in ascending duration order
    pub const ALL: [Plan; 4] = [
        Plan::OneMonth,
        Plan::ThreeMonths,
        Plan::SixMonths,
        Plan::OneYear,
    ];

    /// Number of days one purchase of this plan adds to a window
    pub const fn days(self) -> i64 {
        match self {
            Plan::OneMonth => 30,
            Plan::ThreeMonths => 90,
            Plan::SixMonths => 180,
            Plan::OneYear => 365,
        }
    }

    /// The plan's duration as a chrono `Duration`
    pub fn duration(self) -> Duration {
        Duration::days(self.days())
    }

    /// Stable wire/storage name of the tier
    pub const fn as_str(self) -> &'static str {
        match self {
            Plan::OneMonth => "1_month",
            Plan::ThreeMonths => "3_months",
            Plan::SixMonths => "6_months",
            Plan::OneYear => "1_year",
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Plan {
    type Err = PlanParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1_month" => Ok(Plan::OneMonth),
            "3_months" => Ok(Plan::ThreeMonths),
            "6_months" => Ok(Plan::SixMonths),
            "1_year" => Ok(Plan::OneYear),
            _ => Err(PlanParseError(s.to_string())),
        }
    }
}

/// Error when parsing a plan name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown plan: {0}")]
pub struct PlanParseError(pub String);

/// Subscription entity - one plan window for one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: i64,
    pub account_id: AccountId,
    pub plan: Plan,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Whether the window covers `now`
    ///
    /// The stored premium flag is never swept when a window lapses; readers
    /// that care about actual entitlement must derive it from the window.
    #[inline]
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.end_date > now
    }

    /// Time left in the window relative to `now` (zero once lapsed)
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.end_date - now).max(Duration::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_plan_day_counts() {
        assert_eq!(Plan::OneMonth.days(), 30);
        assert_eq!(Plan::ThreeMonths.days(), 90);
        assert_eq!(Plan::SixMonths.days(), 180);
        assert_eq!(Plan::OneYear.days(), 365);
    }

    #[test]
    fn test_plan_round_trips_through_storage_name() {
        for plan in Plan::ALL {
            assert_eq!(Plan::from_str(plan.as_str()).unwrap(), plan);
        }
    }

    #[test]
    fn test_unknown_plan_is_rejected() {
        let err = Plan::from_str("2_weeks").unwrap_err();
        assert_eq!(err.0, "2_weeks");
    }

    #[test]
    fn test_window_validity_is_derived_from_end_date() {
        let now = Utc::now();
        let sub = Subscription {
            id: 1,
            account_id: AccountId::new(7),
            plan: Plan::OneMonth,
            start_date: now - Duration::days(40),
            end_date: now - Duration::days(10),
            is_active: true,
            created_at: now - Duration::days(40),
        };

        // Row still flagged active, but the window has lapsed.
        assert!(!sub.is_current(now));
        assert_eq!(sub.remaining(now), Duration::zero());
    }

    #[test]
    fn test_remaining_time() {
        let now = Utc::now();
        let sub = Subscription {
            id: 1,
            account_id: AccountId::new(7),
            plan: Plan::OneMonth,
            start_date: now,
            end_date: now + Duration::days(30),
            is_active: true,
            created_at: now,
        };
        assert!(sub.is_current(now));
        assert_eq!(sub.remaining(now), Duration::days(30));
    }
}
