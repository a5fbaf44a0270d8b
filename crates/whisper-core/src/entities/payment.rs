//! Payment entity and its enumerated method/status values

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::value_objects::AccountId;

/// Payment method
///
/// Only `Balance` is accepted for new records; the gateway methods are kept
/// so historical rows still decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Balance,
    Click,
    Payme,
    Paynet,
}

impl PaymentMethod {
    /// Whether new payment records may be written with this method
    #[inline]
    pub const fn accepts_new_payments(self) -> bool {
        matches!(self, PaymentMethod::Balance)
    }

    /// Stable storage name
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Balance => "balance",
            PaymentMethod::Click => "click",
            PaymentMethod::Payme => "payme",
            PaymentMethod::Paynet => "paynet",
        }
    }

    /// Parse a stored method name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "balance" => Some(PaymentMethod::Balance),
            "click" => Some(PaymentMethod::Click),
            "payme" => Some(PaymentMethod::Payme),
            "paynet" => Some(PaymentMethod::Paynet),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
    Refunded,
    Expired,
    OnHold,
}

impl PaymentStatus {
    /// Stable storage name
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Expired => "expired",
            PaymentStatus::OnHold => "on_hold",
        }
    }

    /// Parse a stored status name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "processing" => Some(PaymentStatus::Processing),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            "cancelled" => Some(PaymentStatus::Cancelled),
            "refunded" => Some(PaymentStatus::Refunded),
            "expired" => Some(PaymentStatus::Expired),
            "on_hold" => Some(PaymentStatus::OnHold),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment entity - one row of the append-only purchase log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub id: i64,
    pub account_id: AccountId,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// External transaction identifier; unique when present, the duplicate
    /// delivery guard for gateway callbacks.
    pub transaction_id: Option<String>,
    /// Free-form merchant metadata, e.g. `subscription:<id>` cross-references.
    pub merchant_data: Option<String>,
    pub created_at: DateTime<Utc>,
}
