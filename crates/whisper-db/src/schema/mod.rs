//! Idempotent schema creation
//!
//! Creates enum types and tables on startup if they do not exist. The
//! constraints here carry the store-level invariants: one queue entry per
//! account, one ban per account, unique tokens/referral codes/transaction
//! ids, and session columns that refuse a duplicate party.

use sqlx::PgPool;
use tracing::info;

/// Enum types, created first. `CREATE TYPE` has no `IF NOT EXISTS`, so each
/// is wrapped in a block that swallows `duplicate_object`.
const TYPES: &[&str] = &[
    r"
    DO $$ BEGIN
        CREATE TYPE plan_type AS ENUM ('1_month', '3_months', '6_months', '1_year');
    EXCEPTION
        WHEN duplicate_object THEN null;
    END $$;
    ",
    r"
    DO $$ BEGIN
        CREATE TYPE payment_status AS ENUM (
            'pending', 'processing', 'completed', 'failed',
            'cancelled', 'refunded', 'expired', 'on_hold'
        );
    EXCEPTION
        WHEN duplicate_object THEN null;
    END $$;
    ",
    // Gateway methods are retained so historical rows keep decoding; only
    // 'balance' is accepted for new writes.
    r"
    DO $$ BEGIN
        CREATE TYPE payment_method AS ENUM ('click', 'payme', 'paynet', 'balance');
    EXCEPTION
        WHEN duplicate_object THEN null;
    END $$;
    ",
];

const TABLES: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS accounts (
        id              BIGINT PRIMARY KEY,
        display_name    TEXT NOT NULL DEFAULT '',
        handle          TEXT NOT NULL DEFAULT '',
        token           TEXT UNIQUE NOT NULL,
        is_admin        BOOLEAN NOT NULL DEFAULT FALSE,
        is_superuser    BOOLEAN NOT NULL DEFAULT FALSE,
        is_premium      BOOLEAN NOT NULL DEFAULT FALSE,
        is_hidden       BOOLEAN NOT NULL DEFAULT FALSE,
        balance         NUMERIC(10, 2) NOT NULL DEFAULT 0.00,
        total_deposited NUMERIC(10, 2) NOT NULL DEFAULT 0.00,
        referral_code   TEXT UNIQUE,
        referred_by     BIGINT REFERENCES accounts (id),
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    );
    ",
    r"
    CREATE TABLE IF NOT EXISTS muted_accounts (
        account_id  BIGINT PRIMARY KEY REFERENCES accounts (id) ON DELETE CASCADE,
        muted_until TIMESTAMPTZ NOT NULL,
        reason      TEXT,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    );
    ",
    r"
    CREATE TABLE IF NOT EXISTS chat_queue (
        account_id BIGINT PRIMARY KEY REFERENCES accounts (id) ON DELETE CASCADE,
        joined_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    );
    ",
    r"
    CREATE TABLE IF NOT EXISTS chat_sessions (
        id         BIGSERIAL PRIMARY KEY,
        first_id   BIGINT UNIQUE NOT NULL REFERENCES accounts (id) ON DELETE CASCADE,
        second_id  BIGINT UNIQUE NOT NULL REFERENCES accounts (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        CHECK (first_id <> second_id)
    );
    ",
    r"
    CREATE TABLE IF NOT EXISTS subscriptions (
        id         BIGSERIAL PRIMARY KEY,
        account_id BIGINT NOT NULL REFERENCES accounts (id) ON DELETE CASCADE,
        plan       plan_type NOT NULL,
        start_date TIMESTAMPTZ NOT NULL,
        end_date   TIMESTAMPTZ NOT NULL,
        is_active  BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        CHECK (end_date > start_date)
    );
    ",
    r"
    CREATE INDEX IF NOT EXISTS subscriptions_account_end_idx
        ON subscriptions (account_id, end_date DESC);
    ",
    r"
    CREATE TABLE IF NOT EXISTS payments (
        id             BIGSERIAL PRIMARY KEY,
        account_id     BIGINT NOT NULL REFERENCES accounts (id) ON DELETE CASCADE,
        amount         NUMERIC(10, 2) NOT NULL,
        method         payment_method NOT NULL,
        status         payment_status NOT NULL DEFAULT 'pending',
        transaction_id TEXT UNIQUE,
        merchant_data  TEXT,
        created_at     TIMESTAMPTZ NOT NULL DEFAULT now()
    );
    ",
    r"
    CREATE INDEX IF NOT EXISTS payments_account_created_idx
        ON payments (account_id, created_at DESC);
    ",
    r"
    CREATE TABLE IF NOT EXISTS message_log (
        id          BIGSERIAL PRIMARY KEY,
        sender_id   BIGINT,
        receiver_id BIGINT,
        body        TEXT,
        sent_at     TIMESTAMPTZ NOT NULL DEFAULT now()
    );
    ",
    r"
    CREATE INDEX IF NOT EXISTS message_log_sender_sent_idx
        ON message_log (sender_id, sent_at DESC);
    ",
    r"
    CREATE TABLE IF NOT EXISTS audit_log (
        id         BIGSERIAL PRIMARY KEY,
        admin_id   BIGINT NOT NULL,
        action     TEXT NOT NULL,
        details    TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    );
    ",
];

/// Create enum types and tables if they do not exist
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in TYPES.iter().chain(TABLES) {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("database schema ready");
    Ok(())
}
