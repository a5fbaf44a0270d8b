//! Account database model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database model for the accounts table
#[derive(Debug, Clone, FromRow)]
pub struct AccountModel {
    pub id: i64,
    pub display_name: String,
    pub handle: String,
    pub token: String,
    pub is_admin: bool,
    pub is_superuser: bool,
    pub is_premium: bool,
    pub is_hidden: bool,
    pub balance: Decimal,
    pub total_deposited: Decimal,
    pub referral_code: Option<String>,
    pub referred_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}
