//! Chat session database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the chat_sessions table
#[derive(Debug, Clone, FromRow)]
pub struct SessionModel {
    pub id: i64,
    pub first_id: i64,
    pub second_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Session row joined with both parties' display names
#[derive(Debug, Clone, FromRow)]
pub struct ActiveChatModel {
    pub id: i64,
    pub first_id: i64,
    pub second_id: i64,
    pub created_at: DateTime<Utc>,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
}
