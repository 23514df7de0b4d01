//! CRUD operations for [`Contact`] records.
//!
//! Every helper takes the owning user's id; a contact that belongs to
//! someone else behaves exactly like one that does not exist.

use rusqlite::{params, OptionalExtension, ToSql};

use carnet_shared::schemas::ContactInput;

use crate::database::Database;
use crate::error::Result;
use crate::models::Contact;

const SELECT_CONTACT: &str = "SELECT id, user_id, first_name, last_name, email, phone_number,
            birthday, nick, is_active_contact, description
     FROM contacts";

impl Database {
    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// All contacts of `owner`, oldest first.
    pub fn list_contacts(&self, owner: i64) -> Result<Vec<Contact>> {
        self.query_contacts("WHERE user_id = ?1 ORDER BY id ASC", params![owner])
    }

    /// Contacts whose birthday string equals `birthday` exactly.
    pub fn contacts_with_birthday(&self, owner: i64, birthday: &str) -> Result<Vec<Contact>> {
        self.query_contacts(
            "WHERE user_id = ?1 AND birthday = ?2 ORDER BY id ASC",
            params![owner, birthday],
        )
    }

    pub fn contacts_by_first_name(&self, owner: i64, first_name: &str) -> Result<Vec<Contact>> {
        self.query_contacts(
            "WHERE user_id = ?1 AND first_name = ?2 ORDER BY id ASC",
            params![owner, first_name],
        )
    }

    pub fn contacts_by_last_name(&self, owner: i64, last_name: &str) -> Result<Vec<Contact>> {
        self.query_contacts(
            "WHERE user_id = ?1 AND last_name = ?2 ORDER BY id ASC",
            params![owner, last_name],
        )
    }

    pub fn get_contact(&self, owner: i64, id: i64) -> Result<Option<Contact>> {
        let contact = self
            .conn()
            .query_row(
                &format!("{SELECT_CONTACT} WHERE user_id = ?1 AND id = ?2"),
                params![owner, id],
                row_to_contact,
            )
            .optional()?;
        Ok(contact)
    }

    pub fn get_contact_by_email(&self, owner: i64, email: &str) -> Result<Option<Contact>> {
        let contact = self
            .conn()
            .query_row(
                &format!("{SELECT_CONTACT} WHERE user_id = ?1 AND email = ?2 ORDER BY id ASC LIMIT 1"),
                params![owner, email],
                row_to_contact,
            )
            .optional()?;
        Ok(contact)
    }

    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new contact for `owner` and return it with its generated id.
    ///
    /// A second contact with the same email in the same address book fails
    /// with [`StoreError::Duplicate`](crate::StoreError::Duplicate).
    pub fn create_contact(&self, owner: i64, input: &ContactInput) -> Result<Contact> {
        self.conn().execute(
            "INSERT INTO contacts (user_id, first_name, last_name, email, phone_number,
                                   birthday, nick, is_active_contact, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                owner,
                input.first_name,
                input.last_name,
                input.email,
                input.phone_number,
                input.birthday,
                input.nick,
                input.is_active_contact as i32,
                input.description,
            ],
        )?;

        Ok(Contact {
            id: self.conn().last_insert_rowid(),
            user_id: owner,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            phone_number: input.phone_number.clone(),
            birthday: input.birthday.clone(),
            nick: input.nick.clone(),
            is_active_contact: input.is_active_contact,
            description: input.description.clone(),
        })
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Replace every field of contact `id`. `None` when it does not exist.
    pub fn update_contact(
        &self,
        owner: i64,
        id: i64,
        input: &ContactInput,
    ) -> Result<Option<Contact>> {
        let affected = self.conn().execute(
            "UPDATE contacts
             SET first_name = ?3, last_name = ?4, email = ?5, phone_number = ?6,
                 birthday = ?7, nick = ?8, is_active_contact = ?9, description = ?10
             WHERE user_id = ?1 AND id = ?2",
            params![
                owner,
                id,
                input.first_name,
                input.last_name,
                input.email,
                input.phone_number,
                input.birthday,
                input.nick,
                input.is_active_contact as i32,
                input.description,
            ],
        )?;
        if affected == 0 {
            return Ok(None);
        }
        self.get_contact(owner, id)
    }

    /// Set the active flag of contact `id`. `None` when it does not exist.
    pub fn set_is_active_contact(
        &self,
        owner: i64,
        id: i64,
        is_active: bool,
    ) -> Result<Option<Contact>> {
        let affected = self.conn().execute(
            "UPDATE contacts SET is_active_contact = ?3 WHERE user_id = ?1 AND id = ?2",
            params![owner, id, is_active as i32],
        )?;
        if affected == 0 {
            return Ok(None);
        }
        self.get_contact(owner, id)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete contact `id` and return the removed row. `None` when absent.
    pub fn remove_contact(&self, owner: i64, id: i64) -> Result<Option<Contact>> {
        let Some(contact) = self.get_contact(owner, id)? else {
            return Ok(None);
        };
        self.conn().execute(
            "DELETE FROM contacts WHERE user_id = ?1 AND id = ?2",
            params![owner, id],
        )?;
        Ok(Some(contact))
    }

    fn query_contacts(&self, clause: &str, args: &[&dyn ToSql]) -> Result<Vec<Contact>> {
        let mut stmt = self.conn().prepare(&format!("{SELECT_CONTACT} {clause}"))?;
        let rows = stmt.query_map(args, row_to_contact)?;

        let mut contacts = Vec::new();
        for row in rows {
            contacts.push(row?);
        }
        Ok(contacts)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Contact`].
fn row_to_contact(row: &rusqlite::Row<'_>) -> rusqlite::Result<Contact> {
    let is_active: i32 = row.get(8)?;

    Ok(Contact {
        id: row.get(0)?,
        user_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        phone_number: row.get(5)?,
        birthday: row.get(6)?,
        nick: row.get(7)?,
        is_active_contact: is_active != 0,
        description: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;

    fn db_with_owner() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let owner = db.create_user("owner1", "owner@example.com", "hash-1").unwrap();
        (db, owner.id)
    }

    fn input(first: &str, last: &str, email: &str) -> ContactInput {
        ContactInput {
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
            phone_number: "050-907-97-77".into(),
            birthday: Some("10-04-2019".into()),
            nick: "Badrunt".into(),
            is_active_contact: true,
            description: "description".into(),
        }
    }

    #[test]
    fn test_create_then_get() {
        let (db, owner) = db_with_owner();
        let body = input("Dmytro", "Oseledko", "test@test.api.com");

        let created = db.create_contact(owner, &body).unwrap();
        assert!(created.id >= 1);

        let fetched = db.get_contact(owner, created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.first_name, body.first_name);
        assert_eq!(fetched.last_name, body.last_name);
        assert_eq!(fetched.email, body.email);
        assert_eq!(fetched.phone_number, body.phone_number);
        assert_eq!(fetched.birthday, body.birthday);
        assert_eq!(fetched.nick, body.nick);
        assert_eq!(fetched.description, body.description);
        assert!(fetched.is_active_contact);
    }

    #[test]
    fn test_list_and_filters() {
        let (db, owner) = db_with_owner();
        db.create_contact(owner, &input("Anna", "Shevchenko", "a@example.com")).unwrap();
        db.create_contact(owner, &input("Anna", "Kovalenko", "b@example.com")).unwrap();
        let mut other = input("Boris", "Kovalenko", "c@example.com");
        other.birthday = Some("01-01-1990".into());
        db.create_contact(owner, &other).unwrap();

        assert_eq!(db.list_contacts(owner).unwrap().len(), 3);
        assert_eq!(db.contacts_by_first_name(owner, "Anna").unwrap().len(), 2);
        assert_eq!(db.contacts_by_last_name(owner, "Kovalenko").unwrap().len(), 2);
        assert!(db.contacts_by_first_name(owner, "Zoe").unwrap().is_empty());

        let born = db.contacts_with_birthday(owner, "01-01-1990").unwrap();
        assert_eq!(born.len(), 1);
        assert_eq!(born[0].first_name, "Boris");

        let by_email = db.get_contact_by_email(owner, "b@example.com").unwrap().unwrap();
        assert_eq!(by_email.last_name, "Kovalenko");
        assert!(db.get_contact_by_email(owner, "zz@example.com").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_rejected_by_index() {
        let (db, owner) = db_with_owner();
        db.create_contact(owner, &input("Anna", "Shevchenko", "a@example.com")).unwrap();

        let err = db
            .create_contact(owner, &input("Other", "Person", "a@example.com"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[test]
    fn test_update_replaces_fields() {
        let (db, owner) = db_with_owner();
        let created = db.create_contact(owner, &input("Anna", "Shevchenko", "a@example.com")).unwrap();

        let mut changed = input("Hanna", "Shevchenko", "hanna@example.com");
        changed.birthday = None;
        changed.is_active_contact = false;
        let updated = db.update_contact(owner, created.id, &changed).unwrap().unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.first_name, "Hanna");
        assert_eq!(updated.email, "hanna@example.com");
        assert_eq!(updated.birthday, None);
        assert!(!updated.is_active_contact);
    }

    #[test]
    fn test_missing_id_returns_none() {
        let (db, owner) = db_with_owner();
        let body = input("Anna", "Shevchenko", "a@example.com");

        assert!(db.get_contact(owner, 42).unwrap().is_none());
        assert!(db.update_contact(owner, 42, &body).unwrap().is_none());
        assert!(db.remove_contact(owner, 42).unwrap().is_none());
        assert!(db.set_is_active_contact(owner, 42, false).unwrap().is_none());
    }

    #[test]
    fn test_remove_returns_deleted_row() {
        let (db, owner) = db_with_owner();
        let created = db.create_contact(owner, &input("Anna", "Shevchenko", "a@example.com")).unwrap();

        let removed = db.remove_contact(owner, created.id).unwrap().unwrap();
        assert_eq!(removed, created);
        assert!(db.get_contact(owner, created.id).unwrap().is_none());
    }

    #[test]
    fn test_set_is_active_contact() {
        let (db, owner) = db_with_owner();
        let created = db.create_contact(owner, &input("Anna", "Shevchenko", "a@example.com")).unwrap();

        let off = db.set_is_active_contact(owner, created.id, false).unwrap().unwrap();
        assert!(!off.is_active_contact);
        let on = db.set_is_active_contact(owner, created.id, true).unwrap().unwrap();
        assert!(on.is_active_contact);
    }

    #[test]
    fn test_contacts_are_scoped_to_owner() {
        let (db, owner) = db_with_owner();
        let stranger = db.create_user("stranger", "s@example.com", "hash-2").unwrap();
        let created = db.create_contact(owner, &input("Anna", "Shevchenko", "a@example.com")).unwrap();

        assert!(db.get_contact(stranger.id, created.id).unwrap().is_none());
        assert!(db.list_contacts(stranger.id).unwrap().is_empty());
        assert!(db.remove_contact(stranger.id, created.id).unwrap().is_none());

        // the same email is free in another address book
        db.create_contact(stranger.id, &input("Anna", "Shevchenko", "a@example.com")).unwrap();
        assert!(db.get_contact(owner, created.id).unwrap().is_some());
    }
}
