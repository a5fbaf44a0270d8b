//! Data transfer objects returned to the adapter layer

mod responses;

pub use responses::{
    AccountOverview, ChatMonitorEntry, PremiumInfo, PurchaseOutcome, Registration,
    SubscriptionView,
};
