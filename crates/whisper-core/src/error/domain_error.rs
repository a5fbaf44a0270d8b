//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::AccountId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Unknown link token")]
    TokenNotFound,

    #[error("Unknown referral code: {0}")]
    ReferralCodeNotFound(String),

    #[error("No active chat session")]
    SessionNotFound,

    #[error("Payment not found: {0}")]
    PaymentNotFound(i64),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Account is already in an active chat")]
    AlreadyInChat,

    #[error("Account is already waiting in the queue")]
    AlreadyInQueue,

    #[error("Account is not in the queue")]
    NotQueued,

    #[error("Duplicate transaction id: {0}")]
    DuplicateTransaction(String),

    #[error("Account already has a referrer")]
    AlreadyReferred,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Payment method not accepted: {0}")]
    PaymentMethodNotAllowed(String),

    #[error("Self-referral is not allowed")]
    SelfReferral,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for adapter-facing results
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::AccountNotFound(_) => "UNKNOWN_ACCOUNT",
            Self::TokenNotFound => "UNKNOWN_TOKEN",
            Self::ReferralCodeNotFound(_) => "UNKNOWN_REFERRAL_CODE",
            Self::SessionNotFound => "UNKNOWN_SESSION",
            Self::PaymentNotFound(_) => "UNKNOWN_PAYMENT",

            // Conflict
            Self::AlreadyInChat => "ALREADY_IN_CHAT",
            Self::AlreadyInQueue => "ALREADY_IN_QUEUE",
            Self::NotQueued => "NOT_QUEUED",
            Self::DuplicateTransaction(_) => "DUPLICATE_TRANSACTION",
            Self::AlreadyReferred => "ALREADY_REFERRED",

            // Validation
            Self::UnknownPlan(_) => "UNKNOWN_PLAN",
            Self::PaymentMethodNotAllowed(_) => "PAYMENT_METHOD_NOT_ALLOWED",
            Self::SelfReferral => "SELF_REFERRAL",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound(_)
                | Self::TokenNotFound
                | Self::ReferralCodeNotFound(_)
                | Self::SessionNotFound
                | Self::PaymentNotFound(_)
        )
    }

    /// Check if this is a conflict error (expected, frequent outcomes)
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyInChat
                | Self::AlreadyInQueue
                | Self::NotQueued
                | Self::DuplicateTransaction(_)
                | Self::AlreadyReferred
        )
    }

    /// Check if this is a validation error (rejected before any mutation)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownPlan(_)
                | Self::PaymentMethodNotAllowed(_)
                | Self::SelfReferral
                | Self::InvalidAmount(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::AccountNotFound(AccountId::new(1));
        assert_eq!(err.code(), "UNKNOWN_ACCOUNT");

        let err = DomainError::AlreadyInChat;
        assert_eq!(err.code(), "ALREADY_IN_CHAT");

        let err = DomainError::UnknownPlan("2_weeks".to_string());
        assert_eq!(err.code(), "UNKNOWN_PLAN");
    }

    #[test]
    fn test_is_not_found() {
        assert!(DomainError::AccountNotFound(AccountId::new(1)).is_not_found());
        assert!(DomainError::TokenNotFound.is_not_found());
        assert!(!DomainError::AlreadyInQueue.is_not_found());
    }

    #[test]
    fn test_is_conflict() {
        assert!(DomainError::AlreadyInChat.is_conflict());
        assert!(DomainError::DuplicateTransaction("tx1".to_string()).is_conflict());
        assert!(!DomainError::SelfReferral.is_conflict());
    }

    #[test]
    fn test_is_validation() {
        assert!(DomainError::SelfReferral.is_validation());
        assert!(DomainError::PaymentMethodNotAllowed("click".to_string()).is_validation());
        assert!(!DomainError::SessionNotFound.is_validation());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::AccountNotFound(AccountId::new(123));
        assert_eq!(err.to_string(), "Account not found: 123");

        let err = DomainError::DuplicateTransaction("abc".to_string());
        assert_eq!(err.to_string(), "Duplicate transaction id: abc");
    }
}
