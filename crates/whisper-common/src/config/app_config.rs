//! Application configuration structs
//!
//! Loads configuration from environment variables (with `.env` support).
//! Monetary values - plan prices and the referral bonus - live here rather
//! than in the engines, so deployments can reprice without touching logic.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

use whisper_core::Plan;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub referral: ReferralConfig,
    pub pricing: PlanPricing,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Referral program configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReferralConfig {
    /// Fixed bonus credited to the referrer per attributed signup
    #[serde(default = "default_referral_bonus")]
    pub bonus: Decimal,
    /// How recently an account must have been created for attribution to
    /// apply (distinguishes fresh signups from old accounts re-clicking)
    #[serde(default = "default_grace_seconds")]
    pub grace_seconds: i64,
}

impl Default for ReferralConfig {
    fn default() -> Self {
        Self {
            bonus: default_referral_bonus(),
            grace_seconds: default_grace_seconds(),
        }
    }
}

/// Plan price table (in the deployment currency)
#[derive(Debug, Clone, Deserialize)]
pub struct PlanPricing {
    #[serde(default = "default_price_one_month")]
    pub one_month: Decimal,
    #[serde(default = "default_price_three_months")]
    pub three_months: Decimal,
    #[serde(default = "default_price_six_months")]
    pub six_months: Decimal,
    #[serde(default = "default_price_one_year")]
    pub one_year: Decimal,
}

impl PlanPricing {
    /// Price of one purchase of `plan`
    pub fn price(&self, plan: Plan) -> Decimal {
        match plan {
            Plan::OneMonth => self.one_month,
            Plan::ThreeMonths => self.three_months,
            Plan::SixMonths => self.six_months,
            Plan::OneYear => self.one_year,
        }
    }
}

impl Default for PlanPricing {
    fn default() -> Self {
        Self {
            one_month: default_price_one_month(),
            three_months: default_price_three_months(),
            six_months: default_price_six_months(),
            one_year: default_price_one_year(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "whisper".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_referral_bonus() -> Decimal {
    Decimal::new(1000, 2) // 10.00
}

fn default_grace_seconds() -> i64 {
    60
}

fn default_price_one_month() -> Decimal {
    Decimal::new(500_000, 2) // 5000.00
}

fn default_price_three_months() -> Decimal {
    Decimal::new(1_200_000, 2) // 12000.00
}

fn default_price_six_months() -> Decimal {
    Decimal::new(2_500_000, 2) // 25000.00
}

fn default_price_one_year() -> Decimal {
    Decimal::new(5_000_000, 2) // 50000.00
}

fn env_decimal(var: &'static str, fallback: Decimal) -> Result<Decimal, ConfigError> {
    match env::var(var) {
        Ok(raw) => {
            Decimal::from_str(&raw).map_err(|_| ConfigError::InvalidValue(var, raw))
        }
        Err(_) => Ok(fallback),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or a
    /// monetary value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            referral: ReferralConfig {
                bonus: env_decimal("REFERRAL_BONUS", default_referral_bonus())?,
                grace_seconds: env::var("REFERRAL_GRACE_SECONDS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_grace_seconds),
            },
            pricing: PlanPricing {
                one_month: env_decimal("PLAN_PRICE_1_MONTH", default_price_one_month())?,
                three_months: env_decimal("PLAN_PRICE_3_MONTHS", default_price_three_months())?,
                six_months: env_decimal("PLAN_PRICE_6_MONTHS", default_price_six_months())?,
                one_year: env_decimal("PLAN_PRICE_1_YEAR", default_price_one_year())?,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
