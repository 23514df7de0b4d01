//! CRUD operations for [`User`] records.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;
use crate::models::User;

const SELECT_USER: &str = "SELECT id, username, email, avatar, token_hash, created_at FROM users";

impl Database {
    /// Insert a user. `token_hash` is the digest of the user's bearer token.
    pub fn create_user(&self, username: &str, email: &str, token_hash: &str) -> Result<User> {
        let now = Utc::now();

        self.conn().execute(
            "INSERT INTO users (username, email, avatar, token_hash, created_at)
             VALUES (?1, ?2, NULL, ?3, ?4)",
            params![username, email, token_hash, now.to_rfc3339()],
        )?;

        tracing::debug!(username, "user created");

        Ok(User {
            id: self.conn().last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            avatar: None,
            token_hash: token_hash.to_string(),
            created_at: now,
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_user("WHERE email = ?1", params![email])
    }

    pub fn get_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>> {
        self.query_user("WHERE token_hash = ?1", params![token_hash])
    }

    /// Store the avatar URL of the user with `email`. `None` when no such user.
    pub fn update_avatar(&self, email: &str, url: &str) -> Result<Option<User>> {
        let affected = self.conn().execute(
            "UPDATE users SET avatar = ?1 WHERE email = ?2",
            params![url, email],
        )?;
        if affected == 0 {
            return Ok(None);
        }
        self.get_user_by_email(email)
    }

    fn query_user(&self, clause: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(&format!("{SELECT_USER} {clause}"), args, row_to_user)
            .optional()?;
        Ok(user)
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let created_str: String = row.get(5)?;
    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        avatar: row.get(3)?,
        token_hash: row.get(4)?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;

    #[test]
    fn test_create_and_lookup() {
        let db = Database::open_in_memory().unwrap();
        let user = db.create_user("alice1", "alice@example.com", "abc").unwrap();

        assert_eq!(db.get_user_by_email("alice@example.com").unwrap().unwrap(), user);
        assert_eq!(db.get_user_by_token_hash("abc").unwrap().unwrap().id, user.id);
        assert!(db.get_user_by_token_hash("nope").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_user_email() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("alice1", "alice@example.com", "abc").unwrap();
        let err = db.create_user("alice2", "alice@example.com", "def").unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[test]
    fn test_update_avatar() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("alice1", "alice@example.com", "abc").unwrap();

        let user = db
            .update_avatar("alice@example.com", "https://cdn.example/a.png")
            .unwrap()
            .unwrap();
        assert_eq!(user.avatar.as_deref(), Some("https://cdn.example/a.png"));

        assert!(db.update_avatar("ghost@example.com", "x").unwrap().is_none());
    }
}
