//! # whisper-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `whisper-core`. It handles:
//!
//! - Connection pool management
//! - Idempotent schema creation
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations, including the transactional matcher and the
//!   per-account subscription lock
//!
//! ## Usage
//!
//! ```rust,ignore
//! use whisper_db::pool::{create_pool, DatabaseConfig};
//! use whisper_db::repositories::PgAccountRepository;
//! use whisper_core::traits::AccountRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     whisper_db::schema::init_schema(&pool).await?;
//!     let accounts = PgAccountRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{
    PgAccountRepository, PgActivityRepository, PgLedgerRepository, PgModerationRepository,
    PgPairingRepository, PgSubscriptionRepository,
};
pub use schema::init_schema;
