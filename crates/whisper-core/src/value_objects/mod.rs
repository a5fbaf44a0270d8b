//! Value objects - immutable domain primitives

mod account_id;
mod codes;

pub use account_id::{AccountId, AccountIdParseError};
pub use codes::{generate_link_token, generate_referral_code, CODE_LEN, TOKEN_LEN};
