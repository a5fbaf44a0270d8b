//! Billing service
//!
//! Balance reads, plan purchases funded from balance, operator top-ups, and
//! external credit callbacks. The balance >= price gate lives HERE, not in
//! the subscription engine: calling the engine directly will happily activate
//! a plan for a broke account.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use whisper_core::entities::{Payment, PaymentMethod, PaymentStatus, Plan};
use whisper_core::error::DomainError;
use whisper_core::traits::NewPayment;
use whisper_core::value_objects::AccountId;

use crate::dto::{PremiumInfo, PurchaseOutcome, SubscriptionView};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Billing service
pub struct BillingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BillingService<'a> {
    /// Create a new BillingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Spendable balance and lifetime deposits
    #[instrument(skip(self))]
    pub async fn balance_of(&self, id: AccountId) -> ServiceResult<(Decimal, Decimal)> {
        self.ctx
            .ledger_repo()
            .balance(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", id.to_string()))
    }

    /// Premium flag, balance, and the current window (if any)
    #[instrument(skip(self))]
    pub async fn premium_info(&self, id: AccountId) -> ServiceResult<PremiumInfo> {
        let account = self
            .ctx
            .account_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", id.to_string()))?;

        let subscription = if account.is_premium {
            self.ctx
                .subscription_repo()
                .active_subscription(id)
                .await?
                .map(|sub| SubscriptionView::from_entity(&sub, Utc::now()))
        } else {
            None
        };

        Ok(PremiumInfo {
            is_premium: account.is_premium,
            balance: account.balance,
            subscription,
        })
    }

    /// Purchase a plan from the account's balance.
    ///
    /// Checks the balance first and reports `InsufficientBalance` without
    /// writing anything. On success the plan is activated/extended, the price
    /// debited, and a completed payment record cross-references the
    /// subscription it funded.
    #[instrument(skip(self))]
    pub async fn purchase_with_balance(
        &self,
        id: AccountId,
        plan: Plan,
    ) -> ServiceResult<PurchaseOutcome> {
        let price = self.ctx.pricing().price(plan);
        let (balance, _) = self.balance_of(id).await?;

        if balance < price {
            return Ok(PurchaseOutcome::InsufficientBalance {
                price,
                balance,
                shortfall: price - balance,
            });
        }

        let subscription_id = self
            .ctx
            .subscription_repo()
            .activate_or_extend(id, plan)
            .await?;

        // Debit only; a purchase never counts toward lifetime deposits.
        self.ctx.ledger_repo().credit(id, -price, false).await?;

        let merchant_data = format!("subscription:{subscription_id}");
        let payment_id = self
            .ctx
            .ledger_repo()
            .create_payment(&NewPayment {
                account_id: id,
                amount: price,
                method: PaymentMethod::Balance,
                transaction_id: None,
                merchant_data: Some(&merchant_data),
            })
            .await?;

        self.ctx
            .ledger_repo()
            .update_payment_status(payment_id, PaymentStatus::Completed, None)
            .await?;

        info!(account_id = %id, %plan, subscription_id, payment_id, "plan purchased");

        Ok(PurchaseOutcome::Activated {
            subscription_id,
            payment_id,
            paid: price,
            remaining_balance: balance - price,
        })
    }

    /// Operator top-up: credits the balance AND the lifetime-deposit counter.
    #[instrument(skip(self))]
    pub async fn top_up(
        &self,
        operator: AccountId,
        target: AccountId,
        amount: Decimal,
    ) -> ServiceResult<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount(amount.to_string()).into());
        }

        self.ctx.ledger_repo().credit(target, amount, true).await?;

        self.ctx
            .activity_repo()
            .record_admin_action(
                operator,
                "top_up",
                Some(&format!("target={target} amount={amount}")),
            )
            .await?;

        let (balance, _) = self.balance_of(target).await?;

        self.ctx
            .notifier()
            .notify(target, &format!("Your balance was topped up by {amount}."))
            .await
            .ok();

        Ok(balance)
    }

    /// Apply an external credit callback exactly once.
    ///
    /// The transaction id is the duplicate-delivery guard: a replay is
    /// rejected by the existence pre-check, and the unique constraint closes
    /// the race between two concurrent deliveries of the same id.
    #[instrument(skip(self))]
    pub async fn apply_external_credit(
        &self,
        id: AccountId,
        amount: Decimal,
        transaction_id: &str,
    ) -> ServiceResult<i64> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount(amount.to_string()).into());
        }

        if self.ctx.ledger_repo().transaction_exists(transaction_id).await? {
            return Err(DomainError::DuplicateTransaction(transaction_id.to_string()).into());
        }

        let payment_id = self
            .ctx
            .ledger_repo()
            .create_payment(&NewPayment {
                account_id: id,
                amount,
                method: PaymentMethod::Balance,
                transaction_id: Some(transaction_id),
                merchant_data: None,
            })
            .await?;

        self.ctx.ledger_repo().credit(id, amount, true).await?;

        self.ctx
            .ledger_repo()
            .update_payment_status(payment_id, PaymentStatus::Completed, None)
            .await?;

        Ok(payment_id)
    }

    /// The account's payment records, most recent first
    #[instrument(skip(self))]
    pub async fn payment_history(
        &self,
        id: AccountId,
        limit: i64,
    ) -> ServiceResult<Vec<Payment>> {
        self.ctx
            .ledger_repo()
            .payment_history(id, limit)
            .await
            .map_err(Into::into)
    }
}
