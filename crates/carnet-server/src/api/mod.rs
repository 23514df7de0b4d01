//! HTTP surface of the server.

mod admin;
mod contacts;
mod extract;
mod users;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, Method},
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use carnet_store::Database;

use self::extract::ApiPath;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::media::{sniff_content_type, MediaError, MediaHost};

/// Slack on top of the avatar limit for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub media: Arc<MediaHost>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, media: MediaHost, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            media: Arc::new(media),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let contacts_root = get(contacts::list_contacts).post(contacts::create_contact);
    let contact_item = get(contacts::get_contact)
        .put(contacts::update_contact)
        .delete(contacts::delete_contact);

    Router::new()
        .route("/health", get(health_check))
        .route("/contacts", contacts_root.clone())
        .route("/contacts/", contacts_root)
        .route("/contacts/birthday", get(contacts::upcoming_birthdays))
        .route(
            "/contacts/first_name/:first_name",
            get(contacts::contacts_by_first_name),
        )
        .route(
            "/contacts/last_name/:last_name",
            get(contacts::contacts_by_last_name),
        )
        .route("/contacts/email/:email", get(contacts::contact_by_email))
        .route("/contacts/:contact_id", contact_item)
        .route(
            "/contacts/:contact_id/is_active_contact",
            patch(contacts::set_is_active_contact),
        )
        .route("/users/me", get(users::read_users_me))
        .route("/users/me/", get(users::read_users_me))
        .route("/users/avatar", patch(users::update_avatar))
        .route("/admin/users", post(admin::create_user))
        .route("/media/:folder/:name", get(media_download))
        .layer(DefaultBodyLimit::max(
            state.config.max_avatar_size + MULTIPART_OVERHEAD,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Serve an avatar from the local media backend.
async fn media_download(
    State(state): State<AppState>,
    ApiPath((folder, name)): ApiPath<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
    let store = state
        .media
        .local()
        .ok_or_else(|| ServerError::NotFound("Not found!".into()))?;

    let data = match store.read(&format!("{folder}/{name}")).await {
        Ok(data) => data,
        Err(MediaError::NotFound(_) | MediaError::InvalidName(_)) => {
            return Err(ServerError::NotFound("Not found!".into()))
        }
        Err(e) => return Err(ServerError::Internal(e.to_string())),
    };

    let content_type = sniff_content_type(&data);
    Ok(([(header::CONTENT_TYPE, content_type)], data))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_media_download_missing() {
        let app = TestApp::new().await;
        let (status, _) = app.get("/media/web10/nothing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
