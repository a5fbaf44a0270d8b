//! Ban entity <-> model mappers

use whisper_core::entities::{Ban, BannedAccount};
use whisper_core::value_objects::AccountId;

use crate::models::{BanModel, BannedRowModel};

impl From<BanModel> for Ban {
    fn from(model: BanModel) -> Self {
        Ban {
            account_id: AccountId::new(model.account_id),
            muted_until: model.muted_until,
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}

impl From<BannedRowModel> for BannedAccount {
    fn from(model: BannedRowModel) -> Self {
        BannedAccount {
            account_id: AccountId::new(model.account_id),
            display_name: model.display_name,
            handle: model.handle,
            muted_until: model.muted_until,
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}
