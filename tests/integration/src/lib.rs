//! Integration test utilities
//!
//! These tests run against a real PostgreSQL database and are skipped when
//! `DATABASE_URL` is not set.

pub mod helpers;

pub use helpers::*;
