//! Account ID - the stable numeric identifier assigned by the messaging platform
//!
//! The platform owns this value; we never mint our own. It is the primary key
//! for every per-account table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform-assigned 64-bit account identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    /// Create an AccountId from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, AccountIdParseError> {
        s.parse::<i64>()
            .map(AccountId)
            .map_err(|_| AccountIdParseError::InvalidFormat)
    }
}

/// Error when parsing an AccountId from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccountIdParseError {
    #[error("invalid account id format")]
    InvalidFormat,
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AccountId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<AccountId> for i64 {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl std::str::FromStr for AccountId {
    type Err = AccountIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountId::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_creation() {
        let id = AccountId::new(123_456_789);
        assert_eq!(id.into_inner(), 123_456_789);
    }

    #[test]
    fn test_account_id_parse() {
        let id = AccountId::parse("42").unwrap();
        assert_eq!(id.into_inner(), 42);

        assert!(AccountId::parse("not-a-number").is_err());
    }

    #[test]
    fn test_account_id_display() {
        let id = AccountId::new(99);
        assert_eq!(id.to_string(), "99");
    }

    #[test]
    fn test_account_id_serde_is_plain_number() {
        let id = AccountId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");

        let back: AccountId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }
}
