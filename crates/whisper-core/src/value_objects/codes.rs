//! Random code generation for capability links and referral codes
//!
//! Both values are opaque credentials embedded in shareable URLs. Uniqueness
//! is enforced by the store (unique columns); generation only has to draw from
//! a wide enough space that retry-on-conflict terminates quickly.

use rand::Rng;

/// Length of an account's link token
pub const TOKEN_LEN: usize = 8;

/// Length of a referral code
pub const CODE_LEN: usize = 8;

/// Generate a random mixed-case alphanumeric link token
pub fn generate_link_token() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Generate a random referral code (uppercase alphanumeric, easy to read aloud)
pub fn generate_referral_code() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length_and_alphabet() {
        let token = generate_link_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_referral_code_is_uppercase_alphanumeric() {
        let code = generate_referral_code();
        assert_eq!(code.len(), CODE_LEN);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_codes_vary() {
        // Not a uniqueness guarantee, just a sanity check that the generator
        // is not returning a constant.
        let a = generate_link_token();
        let b = generate_link_token();
        let c = generate_link_token();
        assert!(a != b || b != c);
    }
}
