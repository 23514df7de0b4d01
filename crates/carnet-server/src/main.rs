//! # carnet-server
//!
//! REST backend for the carnet address book.
//!
//! This binary provides:
//! - **Contacts API** (axum): CRUD, lookups by name and email, the
//!   upcoming-birthday window and the active flag, all scoped to the
//!   authenticated user
//! - **Avatar upload** to a media host (local disk or Cloudinary)
//! - **Admin API** for registering users and issuing their bearer tokens

mod api;
mod auth;
mod config;
mod error;
mod media;

use tracing::info;
use tracing_subscriber::EnvFilter;

use carnet_store::Database;

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::media::MediaHost;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,carnet_server=debug")),
        )
        .init();

    info!("Starting carnet server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");
    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set: users cannot be registered");
    }

    // -----------------------------------------------------------------------
    // 3. Initialize subsystems
    // -----------------------------------------------------------------------
    let db = match &config.database_path {
        Some(path) => Database::open_at(path)?,
        None => Database::new()?,
    };

    let media = MediaHost::from_config(&config).await?;
    info!(backend = media.backend_name(), "Media host ready");

    let http_addr = config.http_addr;
    let app_state = AppState::new(db, media, config);

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
