//! Request payloads accepted by the HTTP layer, with their validation rules.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::birthday::parse_birthday;
use crate::constants::DEFAULT_BIRTHDAY_WINDOW_DAYS;
use crate::error::ValidationError;

fn default_true() -> bool {
    true
}

/// Body of `POST /contacts/` and `PUT /contacts/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct ContactInput {
    #[validate(length(min = 3, max = 25, message = "must be between 3 and 25 characters"))]
    pub first_name: String,
    #[validate(length(min = 3, max = 25, message = "must be between 3 and 25 characters"))]
    pub last_name: String,
    #[validate(email(message = "is not a valid email address"))]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    /// `DD-MM-YYYY`
    #[serde(default)]
    #[validate(custom(function = "validate_birthday"))]
    pub birthday: Option<String>,
    #[serde(default)]
    pub nick: String,
    #[serde(default = "default_true")]
    pub is_active_contact: bool,
    #[serde(default)]
    pub description: String,
}

/// Body of `PATCH /contacts/{id}/is_active_contact`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveFlagInput {
    #[serde(default = "default_true")]
    pub is_active_contact: bool,
}

/// Body of `POST /admin/users`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct NewUserInput {
    #[validate(length(min = 5, max = 12, message = "must be between 5 and 12 characters"))]
    pub username: String,
    #[validate(email(message = "is not a valid email address"))]
    pub email: String,
}

/// Query string of `GET /contacts/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub birthday: Option<String>,
}

/// Query string of `GET /contacts/birthday`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BirthdayQuery {
    #[serde(default = "default_window_days")]
    pub days: u32,
}

fn default_window_days() -> u32 {
    DEFAULT_BIRTHDAY_WINDOW_DAYS
}

/// Contact ids in paths start at 1.
pub fn check_contact_id(id: i64) -> Result<i64, ValidationError> {
    if id < 1 {
        return Err(ValidationError::ContactId(id));
    }
    Ok(id)
}

fn validate_birthday(birthday: &str) -> Result<(), validator::ValidationError> {
    parse_birthday(birthday).map(|_| ()).map_err(|e| {
        let mut error = validator::ValidationError::new("birthday_format");
        error.message = Some(e.to_string().into());
        error
    })
}
