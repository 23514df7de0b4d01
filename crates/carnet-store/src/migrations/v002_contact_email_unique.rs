//! v002 -- one contact per email within an address book.
//!
//! Fails if an existing database already holds duplicates; those rows must
//! be merged by hand before upgrading.

use rusqlite::Connection;

const UP_SQL: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS idx_contacts_user_email ON contacts(user_id, email);
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
