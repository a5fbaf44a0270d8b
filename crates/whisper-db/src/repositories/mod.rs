//! PostgreSQL repository implementations

mod account;
mod activity;
mod error;
mod ledger;
mod moderation;
mod pairing;
mod subscription;

pub use account::PgAccountRepository;
pub use activity::PgActivityRepository;
pub use ledger::PgLedgerRepository;
pub use moderation::PgModerationRepository;
pub use pairing::PgPairingRepository;
pub use subscription::PgSubscriptionRepository;
