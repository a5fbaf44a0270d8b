//! Domain entities

mod account;
mod ban;
mod payment;
mod referral;
mod session;
mod subscription;

pub use account::Account;
pub use ban::{Ban, BannedAccount};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use referral::ReferralStats;
pub use session::{ActiveChat, ChatSession};
pub use subscription::{Plan, PlanParseError, Subscription};
