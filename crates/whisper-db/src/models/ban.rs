//! Ban database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the muted_accounts table
#[derive(Debug, Clone, FromRow)]
pub struct BanModel {
    pub account_id: i64,
    pub muted_until: DateTime<Utc>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Ban row joined with account display fields, for the operator listing
#[derive(Debug, Clone, FromRow)]
pub struct BannedRowModel {
    pub account_id: i64,
    pub muted_until: DateTime<Utc>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub display_name: Option<String>,
    pub handle: Option<String>,
}
