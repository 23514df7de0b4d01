//! Deterministic avatar object names.

use sha2::{Digest, Sha256};

use crate::constants::AVATAR_NAME_LEN;

/// Remote object name for a user's avatar: `"{folder}/{hash}"`, where `hash`
/// is the first 12 hex characters of SHA-256 over the email.
///
/// The same email always maps to the same name, so a new upload overwrites
/// the previous avatar.
pub fn avatar_public_id(email: &str, folder: &str) -> String {
    let digest = hex::encode(Sha256::digest(email.as_bytes()));
    format!("{folder}/{}", &digest[..AVATAR_NAME_LEN])
}
