//! Subscription database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the subscriptions table
///
/// `plan` is selected as text (`plan::text`) and parsed in the mapper, so the
/// domain enum stays free of sqlx derives.
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionModel {
    pub id: i64,
    pub account_id: i64,
    pub plan: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
