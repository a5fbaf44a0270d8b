//! Database models (rows as stored)

mod account;
mod ban;
mod payment;
mod session;
mod subscription;

pub use account::AccountModel;
pub use ban::{BanModel, BannedRowModel};
pub use payment::PaymentModel;
pub use session::{ActiveChatModel, SessionModel};
pub use subscription::SubscriptionModel;
