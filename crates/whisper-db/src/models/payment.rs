//! Payment database model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database model for the payments table
///
/// `method` and `status` are selected as text and parsed in the mapper.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentModel {
    pub id: i64,
    pub account_id: i64,
    pub amount: Decimal,
    pub method: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub merchant_data: Option<String>,
    pub created_at: DateTime<Utc>,
}
