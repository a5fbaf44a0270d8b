//! Account entity <-> model mapper

use whisper_core::entities::Account;
use whisper_core::value_objects::AccountId;

use crate::models::AccountModel;

impl From<AccountModel> for Account {
    fn from(model: AccountModel) -> Self {
        Account {
            id: AccountId::new(model.id),
            display_name: model.display_name,
            handle: model.handle,
            token: model.token,
            is_admin: model.is_admin,
            is_superuser: model.is_superuser,
            is_premium: model.is_premium,
            is_hidden: model.is_hidden,
            balance: model.balance,
            total_deposited: model.total_deposited,
            referral_code: model.referral_code,
            referred_by: model.referred_by.map(AccountId::new),
            created_at: model.created_at,
        }
    }
}
