//! Chat session entity - an exclusive pairing of two accounts

use chrono::{DateTime, Utc};

use crate::value_objects::AccountId;

/// An active anonymous chat between two accounts
///
/// The pair is unordered from the domain's point of view; `first`/`second`
/// only reflect which side initiated the match. Each account appears in at
/// most one session at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatSession {
    pub id: i64,
    pub first: AccountId,
    pub second: AccountId,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    /// The other party of the session, whichever side `id` occupies
    pub fn partner_of(&self, id: AccountId) -> Option<AccountId> {
        if id == self.first {
            Some(self.second)
        } else if id == self.second {
            Some(self.first)
        } else {
            None
        }
    }

    /// Whether `id` is a party to this session
    #[inline]
    pub fn involves(&self, id: AccountId) -> bool {
        id == self.first || id == self.second
    }
}

/// An active session joined with display names, for the operator chat monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveChat {
    pub session_id: i64,
    pub first: AccountId,
    pub second: AccountId,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_lookup_works_from_either_side() {
        let session = ChatSession {
            id: 1,
            first: AccountId::new(42),
            second: AccountId::new(99),
            created_at: Utc::now(),
        };

        assert_eq!(session.partner_of(AccountId::new(42)), Some(AccountId::new(99)));
        assert_eq!(session.partner_of(AccountId::new(99)), Some(AccountId::new(42)));
        assert_eq!(session.partner_of(AccountId::new(7)), None);
    }

    #[test]
    fn test_involves() {
        let session = ChatSession {
            id: 1,
            first: AccountId::new(1),
            second: AccountId::new(2),
            created_at: Utc::now(),
        };
        assert!(session.involves(AccountId::new(1)));
        assert!(session.involves(AccountId::new(2)));
        assert!(!session.involves(AccountId::new(3)));
    }
}
