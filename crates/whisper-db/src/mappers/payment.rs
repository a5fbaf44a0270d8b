//! Payment entity <-> model mapper

use whisper_core::entities::{Payment, PaymentMethod, PaymentStatus};
use whisper_core::error::DomainError;
use whisper_core::value_objects::AccountId;

use crate::models::PaymentModel;

impl TryFrom<PaymentModel> for Payment {
    type Error = DomainError;

    fn try_from(model: PaymentModel) -> Result<Self, Self::Error> {
        let method = PaymentMethod::parse(&model.method).ok_or_else(|| {
            DomainError::InternalError(format!("unrecognized stored method: {}", model.method))
        })?;
        let status = PaymentStatus::parse(&model.status).ok_or_else(|| {
            DomainError::InternalError(format!("unrecognized stored status: {}", model.status))
        })?;

        Ok(Payment {
            id: model.id,
            account_id: AccountId::new(model.account_id),
            amount: model.amount,
            method,
            status,
            transaction_id: model.transaction_id,
            merchant_data: model.merchant_data,
            created_at: model.created_at,
        })
    }
}
