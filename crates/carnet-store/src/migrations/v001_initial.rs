//! v001 -- Initial schema creation.
//!
//! Creates the two core tables: `users` and `contacts`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    username   TEXT NOT NULL,
    email      TEXT NOT NULL UNIQUE,
    avatar     TEXT,                          -- media host URL
    token_hash TEXT NOT NULL UNIQUE,          -- BLAKE3 hex of the bearer token
    created_at TEXT NOT NULL                  -- ISO-8601 / RFC-3339
);

-- ----------------------------------------------------------------
-- Contacts
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS contacts (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id           INTEGER NOT NULL,       -- FK -> users(id)
    first_name        TEXT NOT NULL,
    last_name         TEXT NOT NULL,
    nick              TEXT NOT NULL DEFAULT '',
    description       TEXT NOT NULL DEFAULT '',
    email             TEXT NOT NULL,
    phone_number      TEXT NOT NULL DEFAULT '',
    birthday          TEXT,                   -- DD-MM-YYYY, not a typed date
    is_active_contact INTEGER NOT NULL DEFAULT 1,  -- boolean 0/1

    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_contacts_user ON contacts(user_id);
CREATE INDEX IF NOT EXISTS idx_contacts_user_first_name ON contacts(user_id, first_name);
CREATE INDEX IF NOT EXISTS idx_contacts_user_last_name ON contacts(user_id, last_name);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
