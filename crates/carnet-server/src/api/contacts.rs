use axum::{extract::State, http::StatusCode, Json};
use chrono::Local;
use tracing::{info, warn};
use validator::Validate;

use carnet_shared::birthday::BirthdayWindow;
use carnet_shared::schemas::{
    check_contact_id, ActiveFlagInput, BirthdayQuery, ContactInput, ListQuery,
};
use carnet_store::Contact;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::AppState;
use crate::auth::CurrentUser;
use crate::error::ServerError;

/// `GET /contacts/`, optionally narrowed to one exact `?birthday=`.
pub async fn list_contacts(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Contact>>, ServerError> {
    let db = state.db.lock().await;
    let contacts = match query.birthday.as_deref() {
        Some(birthday) => db.contacts_with_birthday(user.id(), birthday)?,
        None => db.list_contacts(user.id())?,
    };
    Ok(Json(contacts))
}

pub async fn get_contact(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiPath(contact_id): ApiPath<i64>,
) -> Result<Json<Contact>, ServerError> {
    let contact_id = check_contact_id(contact_id)?;
    let contact = state.db.lock().await.get_contact(user.id(), contact_id)?;
    contact.map(Json).ok_or_else(ServerError::contact_not_found)
}

pub async fn create_contact(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ContactInput>,
) -> Result<(StatusCode, Json<Contact>), ServerError> {
    body.validate()?;

    let db = state.db.lock().await;
    if db.get_contact_by_email(user.id(), &body.email)?.is_some() {
        return Err(ServerError::email_exists());
    }
    let contact = db.create_contact(user.id(), &body)?;

    info!(user_id = user.id(), contact_id = contact.id, "Contact created");
    Ok((StatusCode::CREATED, Json(contact)))
}

pub async fn update_contact(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiPath(contact_id): ApiPath<i64>,
    ApiJson(body): ApiJson<ContactInput>,
) -> Result<Json<Contact>, ServerError> {
    let contact_id = check_contact_id(contact_id)?;
    body.validate()?;

    let db = state.db.lock().await;
    if let Some(holder) = db.get_contact_by_email(user.id(), &body.email)? {
        if holder.id != contact_id {
            return Err(ServerError::email_exists());
        }
    }
    let contact = db.update_contact(user.id(), contact_id, &body)?;
    contact.map(Json).ok_or_else(ServerError::contact_not_found)
}

pub async fn delete_contact(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiPath(contact_id): ApiPath<i64>,
) -> Result<Json<Contact>, ServerError> {
    let contact_id = check_contact_id(contact_id)?;
    let contact = state.db.lock().await.remove_contact(user.id(), contact_id)?;
    if contact.is_some() {
        info!(user_id = user.id(), contact_id, "Contact deleted");
    }
    contact.map(Json).ok_or_else(ServerError::contact_not_found)
}

pub async fn set_is_active_contact(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiPath(contact_id): ApiPath<i64>,
    ApiJson(body): ApiJson<ActiveFlagInput>,
) -> Result<Json<Contact>, ServerError> {
    let contact_id = check_contact_id(contact_id)?;
    let contact = state
        .db
        .lock()
        .await
        .set_is_active_contact(user.id(), contact_id, body.is_active_contact)?;
    contact.map(Json).ok_or_else(ServerError::contact_not_found)
}

/// `GET /contacts/birthday`: birthdays in the next `?days=` (default 7) days.
pub async fn upcoming_birthdays(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BirthdayQuery>,
) -> Result<Json<Vec<Contact>>, ServerError> {
    let window = BirthdayWindow::new(Local::now().date_naive(), query.days)?;
    let all = state.db.lock().await.list_contacts(user.id())?;

    let contacts = filter_upcoming(all, &window);
    if contacts.is_empty() {
        return Err(ServerError::contact_not_found());
    }
    Ok(Json(contacts))
}

pub async fn contacts_by_first_name(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiPath(first_name): ApiPath<String>,
) -> Result<Json<Vec<Contact>>, ServerError> {
    let contacts = state
        .db
        .lock()
        .await
        .contacts_by_first_name(user.id(), &first_name)?;
    non_empty(contacts)
}

pub async fn contacts_by_last_name(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiPath(last_name): ApiPath<String>,
) -> Result<Json<Vec<Contact>>, ServerError> {
    let contacts = state
        .db
        .lock()
        .await
        .contacts_by_last_name(user.id(), &last_name)?;
    non_empty(contacts)
}

pub async fn contact_by_email(
    user: CurrentUser,
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> Result<Json<Contact>, ServerError> {
    let contact = state.db.lock().await.get_contact_by_email(user.id(), &email)?;
    contact.map(Json).ok_or_else(ServerError::contact_not_found)
}

fn non_empty(contacts: Vec<Contact>) -> Result<Json<Vec<Contact>>, ServerError> {
    if contacts.is_empty() {
        return Err(ServerError::contact_not_found());
    }
    Ok(Json(contacts))
}

/// Keep the contacts whose birthday falls inside `window`.
///
/// Stored birthdays are validated on write, so a parse failure here means
/// the row was written by something else; it is logged and skipped.
fn filter_upcoming(contacts: Vec<Contact>, window: &BirthdayWindow) -> Vec<Contact> {
    contacts
        .into_iter()
        .filter(|c| match window.includes(c.birthday.as_deref()) {
            Ok(included) => included,
            Err(e) => {
                warn!(contact_id = c.id, error = %e, "Skipping unparsable birthday");
                false
            }
        })
        .collect()
}
