//! Chat session entity <-> model mappers

use whisper_core::entities::{ActiveChat, ChatSession};
use whisper_core::value_objects::AccountId;

use crate::models::{ActiveChatModel, SessionModel};

impl From<SessionModel> for ChatSession {
    fn from(model: SessionModel) -> Self {
        ChatSession {
            id: model.id,
            first: AccountId::new(model.first_id),
            second: AccountId::new(model.second_id),
            created_at: model.created_at,
        }
    }
}

impl From<ActiveChatModel> for ActiveChat {
    fn from(model: ActiveChatModel) -> Self {
        ActiveChat {
            session_id: model.id,
            first: AccountId::new(model.first_id),
            second: AccountId::new(model.second_id),
            first_name: model.first_name,
            second_name: model.second_name,
            created_at: model.created_at,
        }
    }
}
