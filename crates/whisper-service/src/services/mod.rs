//! Application services

mod account;
mod billing;
mod context;
mod error;
mod moderation;
mod pairing;
mod referral;

pub use account::AccountService;
pub use billing::BillingService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use moderation::ModerationService;
pub use pairing::PairingService;
pub use referral::ReferralService;
