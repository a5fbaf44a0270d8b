//! Ports - repository traits and the notification collaborator

mod notifier;
mod repositories;

pub use notifier::{Notifier, NotifyError, NullNotifier};
pub use repositories::{
    AccountRepository, ActivityRepository, CodeClaim, LedgerRepository, ModerationRepository,
    NewPayment, PairingRepository, RepoResult, SubscriptionRepository,
};
