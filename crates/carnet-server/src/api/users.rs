use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use carnet_shared::avatar::avatar_public_id;
use carnet_store::User;

use super::AppState;
use crate::auth::CurrentUser;
use crate::error::ServerError;

pub async fn read_users_me(user: CurrentUser) -> Json<User> {
    Json(user.0)
}

/// `PATCH /users/avatar`: multipart form with a single `file` field.
pub async fn update_avatar(
    user: CurrentUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<User>, ServerError> {
    let max = state.config.max_avatar_size;

    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max))?
    {
        if field.name() == Some("file") {
            data = Some(field.bytes().await.map_err(|e| multipart_error(e, max))?);
            break;
        }
    }

    let data = data.ok_or_else(|| {
        ServerError::BadRequest("Missing 'file' field in multipart form".to_string())
    })?;
    if data.is_empty() {
        return Err(ServerError::BadRequest("Empty avatar upload".to_string()));
    }
    if data.len() > max {
        return Err(ServerError::PayloadTooLarge { max });
    }

    let public_id = avatar_public_id(&user.0.email, &state.config.avatar_folder);
    let receipt = state.media.upload(&data, &public_id).await?;
    let url = state.media.avatar_url(&receipt.public_id, receipt.version);

    let updated = state.db.lock().await.update_avatar(&user.0.email, &url)?;
    let updated = updated.ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    info!(
        user_id = updated.id,
        backend = state.media.backend_name(),
        size = data.len(),
        "Avatar updated"
    );
    Ok(Json(updated))
}

fn multipart_error(e: MultipartError, max: usize) -> ServerError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge { max }
    } else {
        ServerError::BadRequest(format!("Multipart error: {e}"))
    }
}
