//! Ban entity - a time-bounded mute on one account

use chrono::{DateTime, Utc};

use crate::value_objects::AccountId;

/// Ban entity (at most one per account)
///
/// A ban whose `muted_until` lies in the past is logically expired and is
/// reaped lazily by the next `check_ban` read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ban {
    pub account_id: AccountId,
    pub muted_until: DateTime<Utc>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Ban {
    /// Whether the ban has lapsed relative to `now`
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.muted_until <= now
    }
}

/// A currently-banned account together with its display fields, for the
/// operator listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannedAccount {
    pub account_id: AccountId,
    pub display_name: Option<String>,
    pub handle: Option<String>,
    pub muted_until: DateTime<Utc>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_ban_expiry() {
        let now = Utc::now();
        let active = Ban {
            account_id: AccountId::new(5),
            muted_until: now + Duration::minutes(60),
            reason: Some("spam".to_string()),
            created_at: now,
        };
        let lapsed = Ban {
            muted_until: now - Duration::seconds(1),
            ..active.clone()
        };

        assert!(!active.is_expired(now));
        assert!(lapsed.is_expired(now));
    }
}
