//! Domain model structs persisted in the SQLite database.
//!
//! Every struct derives `Serialize` so it can be returned directly as a
//! JSON response body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// An account that owns an address book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// URL of the avatar on the media host, once uploaded.
    pub avatar: Option<String>,
    /// BLAKE3 digest of the bearer token. Never serialized.
    #[serde(skip)]
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

/// An address-book entry owned by exactly one [`User`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    /// `DD-MM-YYYY`, kept as the string the client sent.
    pub birthday: Option<String>,
    pub nick: String,
    pub is_active_contact: bool,
    pub description: String,
}
