use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use carnet_shared::error::ValidationError;
use carnet_store::StoreError;

use crate::media::MediaError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// Path, query or body that axum could not extract.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Upload too large (max {max} bytes)")]
    PayloadTooLarge { max: usize },

    #[error("Media host error: {0}")]
    Media(#[from] MediaError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// The 404 every contact lookup answers with.
    pub fn contact_not_found() -> Self {
        ServerError::NotFound("Not found!".to_string())
    }

    /// The 409 for a contact email already in the address book.
    pub fn email_exists() -> Self {
        ServerError::Conflict("Email is exists!".to_string())
    }
}

impl From<validator::ValidationErrors> for ServerError {
    fn from(e: validator::ValidationErrors) -> Self {
        ServerError::Validation(ValidationError::from(e))
    }
}

impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        ServerError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        ServerError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            ServerError::BadRequest(_) | ServerError::Validation(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ServerError::Rejected { status, .. } => (*status, self.to_string()),
            ServerError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ServerError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            ServerError::PayloadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, self.to_string())
            }
            ServerError::Media(e) => {
                tracing::error!(error = %e, "media host failure");
                (StatusCode::BAD_GATEWAY, "Media host error".to_string())
            }
            ServerError::Store(StoreError::Duplicate(_)) => {
                (StatusCode::CONFLICT, "Email is exists!".to_string())
            }
            ServerError::Store(e) => {
                tracing::error!(error = %e, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ServerError::Internal(e) => {
                tracing::error!(error = %e, "internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
