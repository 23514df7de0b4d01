//! Bearer tokens.
//!
//! Tokens are 32 random bytes, hex-encoded for transport. Only the BLAKE3
//! digest of a token is ever persisted.

use rand::RngCore;

use crate::constants::TOKEN_BYTES;

/// Generate a new random bearer token (64 hex chars).
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hex-encoded BLAKE3 digest of a token, as stored in `users.token_hash`.
pub fn hash_token(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_hash_is_stable() {
        let token = generate_token();
        assert_eq!(hash_token(&token), hash_token(&token));
        assert_ne!(hash_token(&token), token);
        assert_eq!(hash_token(&token).len(), 64);
    }
}
