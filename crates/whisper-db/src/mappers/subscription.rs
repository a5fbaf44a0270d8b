//! Subscription entity <-> model mapper
//!
//! Fallible: a stored plan name that no longer parses means the enum and the
//! schema have drifted, which is an internal fault, not caller input.

use std::str::FromStr;

use whisper_core::entities::{Plan, Subscription};
use whisper_core::error::DomainError;
use whisper_core::value_objects::AccountId;

use crate::models::SubscriptionModel;

impl TryFrom<SubscriptionModel> for Subscription {
    type Error = DomainError;

    fn try_from(model: SubscriptionModel) -> Result<Self, Self::Error> {
        let plan = Plan::from_str(&model.plan).map_err(|_| {
            DomainError::InternalError(format!("unrecognized stored plan: {}", model.plan))
        })?;

        Ok(Subscription {
            id: model.id,
            account_id: AccountId::new(model.account_id),
            plan,
            start_date: model.start_date,
            end_date: model.end_date,
            is_active: model.is_active,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn model(plan: &str) -> SubscriptionModel {
        let now = Utc::now();
        SubscriptionModel {
            id: 1,
            account_id: 7,
            plan: plan.to_string(),
            start_date: now,
            end_date: now + chrono::Duration::days(30),
            is_active: true,
            created_at: now,
        }
    }

    #[test]
    fn test_known_plan_maps() {
        let sub = Subscription::try_from(model("1_month")).unwrap();
        assert_eq!(sub.plan, Plan::OneMonth);
        assert_eq!(sub.account_id, AccountId::new(7));
    }

    #[test]
    fn test_drifted_plan_is_internal_error() {
        let err = Subscription::try_from(model("2_weeks")).unwrap_err();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }
}
