//! # whisper-core
//!
//! Domain layer containing entities, value objects, repository traits, and the
//! notification port. This crate has zero dependencies on infrastructure
//! (database, bot platform, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Account, ActiveChat, BannedAccount, Ban, ChatSession, Payment, PaymentMethod, PaymentStatus,
    Plan, ReferralStats, Subscription,
};
pub use error::DomainError;
pub use traits::{
    AccountRepository, ActivityRepository, CodeClaim, LedgerRepository, ModerationRepository,
    NewPayment, Notifier, NotifyError, NullNotifier, PairingRepository, RepoResult,
    SubscriptionRepository,
};
pub use value_objects::{generate_link_token, generate_referral_code, AccountId, CODE_LEN, TOKEN_LEN};
