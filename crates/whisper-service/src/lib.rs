//! # whisper-service
//!
//! Application services layered over the repository traits. This is the
//! operation surface the bot-protocol adapter calls: it resolves an inbound
//! event to an account, dispatches here, and renders the plain result values
//! we return. No bot-platform types appear anywhere in this crate.

pub mod dto;
pub mod services;

// Re-export commonly used types at crate root
pub use dto::{
    AccountOverview, ChatMonitorEntry, PremiumInfo, PurchaseOutcome, Registration,
    SubscriptionView,
};
pub use services::{
    AccountService, BillingService, ModerationService, PairingService, ReferralService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
