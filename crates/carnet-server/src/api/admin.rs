use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use carnet_shared::schemas::NewUserInput;
use carnet_shared::token::{generate_token, hash_token};
use carnet_store::{StoreError, User};

use super::extract::ApiJson;
use super::AppState;
use crate::auth::verify_admin_token;
use crate::error::ServerError;

#[derive(Serialize)]
pub struct CreatedUserResponse {
    user: User,
    /// Shown once; only its digest is stored.
    token: String,
}

/// `POST /admin/users`: register a user and issue its bearer token.
pub async fn create_user(
    headers: HeaderMap,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewUserInput>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ServerError> {
    verify_admin_token(&headers, &state.config)?;
    body.validate()?;

    let token = generate_token();
    let user = state
        .db
        .lock()
        .await
        .create_user(&body.username, &body.email, &hash_token(&token))
        .map_err(|e| match e {
            StoreError::Duplicate(_) => ServerError::Conflict("User already exists".into()),
            other => ServerError::Store(other),
        })?;

    info!(user_id = user.id, username = %user.username, "Admin created user");
    Ok((StatusCode::CREATED, Json(CreatedUserResponse { user, token })))
}
