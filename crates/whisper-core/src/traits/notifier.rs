//! Notification port - the bot-protocol adapter's delivery callback
//!
//! The core only ever uses this fire-and-forget: a failed push (user blocked
//! the bot, network hiccup) must never fail the operation that triggered it.

use async_trait::async_trait;

use crate::value_objects::AccountId;

/// Error from a notification push
#[derive(Debug, thiserror::Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Outbound message delivery, implemented by the adapter layer
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Push a message to one account
    async fn notify(&self, recipient: AccountId, text: &str) -> Result<(), NotifyError>;
}

/// A notifier that discards everything - for tests and headless operation
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, _recipient: AccountId, _text: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_notifier_always_succeeds() {
        let notifier = NullNotifier;
        assert!(notifier.notify(AccountId::new(1), "hello").await.is_ok());
    }

    #[test]
    fn test_notifier_is_object_safe() {
        fn assert_object_safe(_: &dyn Notifier) {}
        assert_object_safe(&NullNotifier);
    }
}
