//! Integration tests for the core flows
//!
//! These exercise the PostgreSQL repositories and the services layered on
//! them against a real database. Every test is self-contained: it mints
//! fresh account ids and skips silently when DATABASE_URL is absent.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use integration_tests::{
    clear_pairing_state, service_context, test_pool, unique_account_id, PAIRING_GUARD,
};
use whisper_core::entities::{PaymentMethod, PaymentStatus, Plan};
use whisper_core::traits::{
    AccountRepository, LedgerRepository, NewPayment, PairingRepository, SubscriptionRepository,
};
use whisper_core::DomainError;
use whisper_db::{PgAccountRepository, PgLedgerRepository, PgPairingRepository, PgSubscriptionRepository};
use whisper_service::{
    AccountService, BillingService, ModerationService, PairingService, PurchaseOutcome,
    ReferralService,
};

#[tokio::test]
async fn get_or_create_is_idempotent() {
    let Some(pool) = test_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let repo = PgAccountRepository::new(pool);
    let id = unique_account_id();

    let (token_a, created_a) = repo.get_or_create(id, "Ann", "ann").await.unwrap();
    let (token_b, created_b) = repo.get_or_create(id, "Ann", "ann").await.unwrap();

    assert!(created_a);
    assert!(!created_b);
    assert_eq!(token_a, token_b);

    // The token resolves back; display refresh on repeat contact sticks.
    assert_eq!(repo.resolve_token(&token_a).await.unwrap(), Some(id));
    repo.get_or_create(id, "Anne", "anne").await.unwrap();
    let account = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(account.display_name, "Anne");
    assert_eq!(account.handle, "anne");
}

#[tokio::test]
async fn pairing_lifecycle_enforces_exclusivity() {
    let Some(pool) = test_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let _guard = PAIRING_GUARD.lock().await;
    clear_pairing_state(&pool).await;

    let accounts = PgAccountRepository::new(pool.clone());
    let pairing = PgPairingRepository::new(pool.clone());

    let a = unique_account_id();
    let b = unique_account_id();
    let c = unique_account_id();
    for (id, name) in [(a, "A"), (b, "B"), (c, "C")] {
        accounts.get_or_create(id, name, name).await.unwrap();
    }

    // Matching before joining is a distinct rejection.
    assert!(matches!(
        pairing.match_partner(a).await.unwrap_err(),
        DomainError::NotQueued
    ));

    // A alone in the queue finds nobody and stays queued.
    pairing.join_queue(a).await.unwrap();
    assert_eq!(pairing.match_partner(a).await.unwrap(), None);
    assert!(matches!(
        pairing.join_queue(a).await.unwrap_err(),
        DomainError::AlreadyInQueue
    ));

    // B joins and matches A; both leave the queue into one session.
    pairing.join_queue(b).await.unwrap();
    assert_eq!(pairing.match_partner(b).await.unwrap(), Some(a));

    assert_eq!(pairing.get_partner(a).await.unwrap(), Some(b));
    assert_eq!(pairing.get_partner(b).await.unwrap(), Some(a));

    // Paired accounts cannot re-enter the queue.
    assert!(matches!(
        pairing.join_queue(a).await.unwrap_err(),
        DomainError::AlreadyInChat
    ));

    // C finds nobody: A and B are gone from the pool.
    pairing.join_queue(c).await.unwrap();
    assert_eq!(pairing.match_partner(c).await.unwrap(), None);
    pairing.leave_queue(c).await.unwrap();

    // Ending is idempotent and frees both sides.
    assert_eq!(pairing.end_chat(a).await.unwrap(), Some(b));
    assert_eq!(pairing.end_chat(a).await.unwrap(), None);
    assert_eq!(pairing.get_partner(b).await.unwrap(), None);
    pairing.join_queue(a).await.unwrap();
    pairing.leave_queue(a).await.unwrap();
}

#[tokio::test]
async fn subscription_extension_is_time_additive() {
    let Some(pool) = test_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let accounts = PgAccountRepository::new(pool.clone());
    let subscriptions = PgSubscriptionRepository::new(pool.clone());
    let id = unique_account_id();
    accounts.get_or_create(id, "Loyal", "loyal").await.unwrap();

    let before = Utc::now();
    let first_id = subscriptions.activate_or_extend(id, Plan::OneMonth).await.unwrap();
    let first = subscriptions.active_subscription(id).await.unwrap().unwrap();
    let second_id = subscriptions.activate_or_extend(id, Plan::OneMonth).await.unwrap();
    let second = subscriptions.active_subscription(id).await.unwrap().unwrap();

    // Same row reused; the second window starts where the first ended.
    assert_eq!(first_id, second_id);
    assert_eq!(second.start_date, first.end_date);

    // Net effect is now + 60 days: no lost update, no double-counted start.
    let total = second.end_date - before;
    assert!((total - Duration::days(60)).num_seconds().abs() < 5);

    // Activation flipped the stored premium flag.
    assert!(accounts.is_premium(id).await.unwrap());
}

#[tokio::test]
async fn balance_conservation_and_deposit_isolation() {
    let Some(pool) = test_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let accounts = PgAccountRepository::new(pool.clone());
    let ledger = PgLedgerRepository::new(pool.clone());
    let id = unique_account_id();
    accounts.get_or_create(id, "Saver", "saver").await.unwrap();

    ledger.credit(id, Decimal::new(10_000, 2), false).await.unwrap();
    ledger.credit(id, Decimal::new(-3_000, 2), false).await.unwrap();

    let (balance, total) = ledger.balance(id).await.unwrap().unwrap();
    assert_eq!(balance, Decimal::new(7_000, 2));
    assert_eq!(total, Decimal::ZERO);

    // A deposit-flagged credit moves both columns.
    ledger.credit(id, Decimal::new(5_000, 2), true).await.unwrap();
    let (balance, total) = ledger.balance(id).await.unwrap().unwrap();
    assert_eq!(balance, Decimal::new(12_000, 2));
    assert_eq!(total, Decimal::new(5_000, 2));

    // Unknown accounts are a sentinel, not a silent zero.
    assert!(ledger.balance(unique_account_id()).await.unwrap().is_none());
}

#[tokio::test]
async fn gateway_methods_are_rejected_for_new_payments() {
    let Some(pool) = test_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let accounts = PgAccountRepository::new(pool.clone());
    let ledger = PgLedgerRepository::new(pool.clone());
    let id = unique_account_id();
    accounts.get_or_create(id, "Payer", "payer").await.unwrap();

    let err = ledger
        .create_payment(&NewPayment {
            account_id: id,
            amount: Decimal::new(100_000, 2),
            method: PaymentMethod::Click,
            transaction_id: None,
            merchant_data: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::PaymentMethodNotAllowed(_)));
    assert!(ledger.payment_history(id, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn purchase_flow_debits_and_records() {
    let Some(pool) = test_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = service_context(&pool);
    let id = unique_account_id();
    AccountService::new(&ctx).register(id, "Buyer", "buyer").await.unwrap();

    let billing = BillingService::new(&ctx);

    // Below price: rejected with the exact shortfall, nothing written.
    let outcome = billing.purchase_with_balance(id, Plan::OneMonth).await.unwrap();
    assert!(matches!(outcome, PurchaseOutcome::InsufficientBalance { .. }));

    // Seed funds and retry.
    ctx.ledger_repo().credit(id, Decimal::new(600_000, 2), true).await.unwrap();
    let outcome = billing.purchase_with_balance(id, Plan::OneMonth).await.unwrap();
    let PurchaseOutcome::Activated { subscription_id, remaining_balance, .. } = outcome else {
        panic!("expected activation");
    };
    assert_eq!(remaining_balance, Decimal::new(100_000, 2));

    let (balance, total) = billing.balance_of(id).await.unwrap();
    assert_eq!(balance, Decimal::new(100_000, 2));
    assert_eq!(total, Decimal::new(600_000, 2));

    let history = billing.payment_history(id, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].method, PaymentMethod::Balance);
    assert_eq!(history[0].status, PaymentStatus::Completed);
    assert_eq!(
        history[0].merchant_data.as_deref(),
        Some(format!("subscription:{subscription_id}").as_str())
    );

    let info = billing.premium_info(id).await.unwrap();
    assert!(info.is_premium);
    let view = info.subscription.expect("active window");
    assert!(view.is_current);
}

#[tokio::test]
async fn duplicate_external_transaction_is_rejected() {
    let Some(pool) = test_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = service_context(&pool);
    let id = unique_account_id();
    AccountService::new(&ctx).register(id, "Payer", "payer").await.unwrap();

    let billing = BillingService::new(&ctx);
    let txn = format!("txn-{id}");

    billing
        .apply_external_credit(id, Decimal::new(100_000, 2), &txn)
        .await
        .unwrap();
    let err = billing
        .apply_external_credit(id, Decimal::new(100_000, 2), &txn)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "DUPLICATE_TRANSACTION");
    let (balance, _) = billing.balance_of(id).await.unwrap();
    assert_eq!(balance, Decimal::new(100_000, 2));
}

#[tokio::test]
async fn referral_attribution_fires_exactly_once() {
    let Some(pool) = test_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = service_context(&pool);
    let referrer = unique_account_id();
    let invitee = unique_account_id();
    let accounts = AccountService::new(&ctx);
    accounts.register(referrer, "Referrer", "referrer").await.unwrap();
    accounts.register(invitee, "Invitee", "invitee").await.unwrap();

    let referral = ReferralService::new(&ctx);
    let code = referral.ensure_code(referrer).await.unwrap();
    assert_eq!(code, referral.ensure_code(referrer).await.unwrap());

    // Freshly created, valid code: attributed. Replays are no-ops.
    assert!(referral.attribute(invitee, &code).await.unwrap());
    assert!(!referral.attribute(invitee, &code).await.unwrap());
    // Self-referral never lands.
    assert!(!referral.attribute(referrer, &code).await.unwrap());

    let (balance, total) = BillingService::new(&ctx).balance_of(referrer).await.unwrap();
    assert_eq!(balance, Decimal::new(1000, 2));
    assert_eq!(total, Decimal::ZERO);

    let stats = referral.stats(referrer).await.unwrap();
    assert_eq!(stats.referral_count, 1);
    assert_eq!(stats.referral_earnings, Decimal::new(1000, 2));

    let invitee_stats = referral.stats(invitee).await.unwrap();
    assert_eq!(invitee_stats.referred_by, Some(referrer));
    assert_eq!(invitee_stats.referrer_name.as_deref(), Some("Referrer"));
}

#[tokio::test]
async fn ban_upserts_and_reaps_on_read() {
    let Some(pool) = test_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = service_context(&pool);
    let moderator = unique_account_id();
    let target = unique_account_id();
    let accounts = AccountService::new(&ctx);
    accounts.register(moderator, "Mod", "mod").await.unwrap();
    accounts.register(target, "Spammer", "spammer").await.unwrap();

    let moderation = ModerationService::new(&ctx);

    let until = moderation
        .ban(moderator, target, Duration::minutes(60), Some("spam"))
        .await
        .unwrap();
    let checked = moderation.check(target).await.unwrap().expect("banned");
    assert!((checked - until).num_seconds().abs() < 1);

    // A replacement ban with an already-past window stands in for the clock
    // running out; the next check reaps the row entirely.
    moderation
        .ban(moderator, target, Duration::seconds(-1), None)
        .await
        .unwrap();
    assert_eq!(moderation.check(target).await.unwrap(), None);
    assert!(!moderation.unban(moderator, target).await.unwrap());
}

#[tokio::test]
async fn hide_profile_requires_the_premium_flag() {
    let Some(pool) = test_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = service_context(&pool);
    let id = unique_account_id();
    let accounts = AccountService::new(&ctx);
    accounts.register(id, "Shy", "shy").await.unwrap();

    assert!(!accounts.hide_profile(id).await.unwrap());

    ctx.subscription_repo().activate_or_extend(id, Plan::OneMonth).await.unwrap();
    assert!(accounts.hide_profile(id).await.unwrap());

    let overview = accounts.overview(id).await.unwrap();
    assert!(overview.is_hidden);
    assert!(overview.is_premium);
}

#[tokio::test]
async fn end_chat_notifies_partner_and_logs_relays() {
    let Some(pool) = test_pool().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let _guard = PAIRING_GUARD.lock().await;
    clear_pairing_state(&pool).await;

    let ctx = service_context(&pool);
    let a = unique_account_id();
    let b = unique_account_id();
    let accounts = AccountService::new(&ctx);
    accounts.register(a, "A", "a").await.unwrap();
    accounts.register(b, "B", "b").await.unwrap();

    let pairing = PairingService::new(&ctx);
    pairing.join(a).await.unwrap();
    pairing.join(b).await.unwrap();
    assert_eq!(pairing.find_partner(a).await.unwrap(), Some(b));

    pairing.relay(a, Some("hi")).await.unwrap();
    pairing.relay(b, Some("hey")).await.unwrap();

    let monitor = pairing.monitor().await.unwrap();
    let entry = monitor
        .iter()
        .find(|e| e.first == a || e.second == a)
        .expect("session visible in monitor");
    assert_eq!(entry.message_count, 2);

    assert_eq!(pairing.end(b).await.unwrap(), Some(a));
    assert_eq!(pairing.end(b).await.unwrap(), None);
}
