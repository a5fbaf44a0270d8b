//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every operation takes `&self` and an explicit
//! set of arguments; there is no ambient connection state, so the atomicity
//! requirements can be exercised against a fake in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::entities::{
    Account, ActiveChat, BannedAccount, Payment, PaymentMethod, PaymentStatus, Plan, Subscription,
};
use crate::error::DomainError;
use crate::value_objects::AccountId;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Account Repository
// ============================================================================

/// Outcome of attempting to claim a generated referral code for an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeClaim {
    /// The code was stored for this account
    Claimed,
    /// The candidate collided with another account's code; generate and retry
    CodeTaken,
    /// The account already had a code (possibly set concurrently)
    AlreadySet(String),
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Look up the account if it exists, otherwise insert it with a freshly
    /// minted token and zero balance. Returns the token and whether the row
    /// was created by this call.
    ///
    /// Safe under concurrent calls for the same id: the primary key is the
    /// arbiter, and the loser of an insert race observes the winner's token.
    /// Display fields are refreshed on the existing-account path.
    async fn get_or_create(
        &self,
        id: AccountId,
        display_name: &str,
        handle: &str,
    ) -> RepoResult<(String, bool)>;

    /// Find account by id
    async fn find_by_id(&self, id: AccountId) -> RepoResult<Option<Account>>;

    /// Resolve a capability link token to an account id
    async fn resolve_token(&self, token: &str) -> RepoResult<Option<AccountId>>;

    /// Update display name/handle; writes nothing when both are unchanged
    async fn update_display_fields(
        &self,
        id: AccountId,
        display_name: &str,
        handle: &str,
    ) -> RepoResult<()>;

    /// Hide the account from inbound anonymous messages. Succeeds only for
    /// premium accounts; returns false (no write) otherwise.
    async fn set_hidden(&self, id: AccountId) -> RepoResult<bool>;

    /// Check the admin flag
    async fn is_admin(&self, id: AccountId) -> RepoResult<bool>;

    /// Check the stored premium flag (not the subscription window)
    async fn is_premium(&self, id: AccountId) -> RepoResult<bool>;

    /// All operator account ids
    async fn admin_ids(&self) -> RepoResult<Vec<AccountId>>;

    /// Find the account owning a referral code
    async fn find_by_referral_code(&self, code: &str) -> RepoResult<Option<Account>>;

    /// The account's own referral code, if one has been generated
    async fn referral_code(&self, id: AccountId) -> RepoResult<Option<String>>;

    /// Store a candidate referral code if the account has none yet.
    /// The code column is globally unique; see [`CodeClaim`] for outcomes.
    async fn try_claim_referral_code(&self, id: AccountId, code: &str) -> RepoResult<CodeClaim>;

    /// Set `referred_by` only if it is currently unset. Returns whether the
    /// write happened - the one-shot guard for referral attribution.
    async fn set_referrer_if_unset(
        &self,
        id: AccountId,
        referrer: AccountId,
    ) -> RepoResult<bool>;

    /// Number of accounts attributed to this referrer
    async fn referral_count(&self, id: AccountId) -> RepoResult<i64>;
}

// ============================================================================
// Moderation Repository
// ============================================================================

#[async_trait]
pub trait ModerationRepository: Send + Sync {
    /// Check whether the account is currently banned; returns the expiry when
    /// it is.
    ///
    /// This read MUTATES: a ban whose expiry has passed is deleted as part of
    /// the same check (read-and-reap). Callers must not rely on a separate
    /// sweep existing.
    async fn check_ban(&self, id: AccountId) -> RepoResult<Option<DateTime<Utc>>>;

    /// Ban the account until `until`, replacing any existing ban (durations
    /// do not stack).
    async fn ban(
        &self,
        id: AccountId,
        until: DateTime<Utc>,
        reason: Option<&str>,
    ) -> RepoResult<()>;

    /// Lift the ban; returns whether one existed
    async fn unban(&self, id: AccountId) -> RepoResult<bool>;

    /// Currently-banned accounts with display fields, newest expiry first
    async fn banned(&self) -> RepoResult<Vec<BannedAccount>>;

    /// Count of currently-banned accounts
    async fn banned_count(&self) -> RepoResult<i64>;
}

// ============================================================================
// Pairing Repository
// ============================================================================

#[async_trait]
pub trait PairingRepository: Send + Sync {
    /// Enter the waiting queue.
    ///
    /// Errors with `AlreadyInChat` when the account is a party to an active
    /// session and `AlreadyInQueue` when already waiting. The membership check
    /// and the insert are a single atomic statement; two concurrent joins for
    /// the same account cannot both succeed.
    async fn join_queue(&self, id: AccountId) -> RepoResult<()>;

    /// Pair the caller with one uniformly random other waiter.
    ///
    /// On success both queue entries are removed and exactly one session row
    /// is created, all in one transaction; returns the partner. Returns
    /// `Ok(None)` when no other waiter exists (the caller stays queued).
    /// Errors with `NotQueued` when the caller has no queue entry - including
    /// the case where a concurrent matcher claimed the caller first.
    async fn match_partner(&self, id: AccountId) -> RepoResult<Option<AccountId>>;

    /// The other party of the account's active session, from either side
    async fn get_partner(&self, id: AccountId) -> RepoResult<Option<AccountId>>;

    /// End the account's active session; returns the partner so the caller
    /// can notify them. Idempotent: returns `Ok(None)` when no session exists.
    async fn end_chat(&self, id: AccountId) -> RepoResult<Option<AccountId>>;

    /// Remove the account's queue entry; no error if absent
    async fn leave_queue(&self, id: AccountId) -> RepoResult<()>;

    /// All active sessions with display names, newest first (operator surface)
    async fn active_chats(&self) -> RepoResult<Vec<ActiveChat>>;

    /// Tear down a session by row id (operator kill-switch); returns both
    /// parties when a session was removed.
    async fn end_by_id(&self, session_id: i64) -> RepoResult<Option<(AccountId, AccountId)>>;
}

// ============================================================================
// Ledger Repository
// ============================================================================

/// Parameters for a new payment record
#[derive(Debug, Clone)]
pub struct NewPayment<'a> {
    pub account_id: AccountId,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub transaction_id: Option<&'a str>,
    pub merchant_data: Option<&'a str>,
}

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Apply a relative balance change (`balance = balance + amount`).
    ///
    /// `amount` may be negative for debits. When `also_increment_total` is
    /// set, `total_deposited` grows by the same amount - callers must never
    /// set it on a debit. The engine does not clamp balance to non-negative;
    /// the balance >= price gate belongs to the purchase caller.
    async fn credit(
        &self,
        id: AccountId,
        amount: Decimal,
        also_increment_total: bool,
    ) -> RepoResult<()>;

    /// Spendable balance and lifetime deposits
    async fn balance(&self, id: AccountId) -> RepoResult<Option<(Decimal, Decimal)>>;

    /// Append a payment record in `pending` status; returns its id.
    ///
    /// Rejects methods other than the internal balance method before writing.
    /// A supplied transaction id must be globally unique; a duplicate errors
    /// with `DuplicateTransaction` and writes nothing.
    async fn create_payment(&self, payment: &NewPayment<'_>) -> RepoResult<i64>;

    /// Existence pre-filter for external transaction ids (idempotency guard
    /// for duplicate callback delivery; the unique constraint is the backstop)
    async fn transaction_exists(&self, transaction_id: &str) -> RepoResult<bool>;

    /// Update a payment's status, optionally attaching the transaction id
    async fn update_payment_status(
        &self,
        payment_id: i64,
        status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> RepoResult<()>;

    /// The account's payment records, most recent first
    async fn payment_history(&self, id: AccountId, limit: i64) -> RepoResult<Vec<Payment>>;
}

// ============================================================================
// Subscription Repository
// ============================================================================

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Activate a new plan window or extend the current one; returns the
    /// (possibly reused) subscription row id.
    ///
    /// A still-open window is extended contiguously from its end date; a
    /// lapsed or absent window starts from now. The premium flag is set
    /// unconditionally. The read-modify-write is serialized per account so
    /// two concurrent purchases cannot extend from the same stale end date.
    async fn activate_or_extend(&self, id: AccountId, plan: Plan) -> RepoResult<i64>;

    /// The account's most recent active window, if any. Whether it still
    /// covers "now" is for the reader to derive.
    async fn active_subscription(&self, id: AccountId) -> RepoResult<Option<Subscription>>;
}

// ============================================================================
// Activity Repository
// ============================================================================

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Append a relayed-message log entry
    async fn record_message(
        &self,
        sender: AccountId,
        receiver: AccountId,
        body: Option<&str>,
    ) -> RepoResult<()>;

    /// Number of messages exchanged between two accounts, either direction
    async fn count_between(&self, a: AccountId, b: AccountId) -> RepoResult<i64>;

    /// When the account last sent anything
    async fn last_activity(&self, id: AccountId) -> RepoResult<Option<DateTime<Utc>>>;

    /// Append an operator action to the audit trail
    async fn record_admin_action(
        &self,
        admin_id: AccountId,
        action: &str,
        details: Option<&str>,
    ) -> RepoResult<()>;
}
