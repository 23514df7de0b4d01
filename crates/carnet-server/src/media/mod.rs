//! Media hosting for avatar images.
//!
//! Two backends sit behind [`MediaHost`]: files on local disk and the
//! Cloudinary upload API. Both overwrite on re-upload under the same
//! public id, and both return a version token that is folded into the URL
//! so clients never see a stale cached avatar.

mod cloudinary;
mod local;

pub use cloudinary::CloudinaryClient;
pub use local::{sniff_content_type, LocalMediaStore};

use thiserror::Error;

use crate::config::{MediaBackend, ServerConfig};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upload rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid object name: {0}")]
    InvalidName(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("media backend misconfigured: {0}")]
    Config(String),
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub public_id: String,
    pub version: i64,
}

pub enum MediaHost {
    Local(LocalMediaStore),
    Cloudinary(CloudinaryClient),
}

impl MediaHost {
    pub async fn from_config(config: &ServerConfig) -> Result<Self, MediaError> {
        match config.media_backend {
            MediaBackend::Local => Ok(MediaHost::Local(
                LocalMediaStore::new(
                    config.media_storage_path.clone(),
                    config.public_base_url.clone(),
                )
                .await?,
            )),
            MediaBackend::Cloudinary => {
                let credentials = config.cloudinary.clone().ok_or_else(|| {
                    MediaError::Config("cloudinary backend without credentials".into())
                })?;
                Ok(MediaHost::Cloudinary(CloudinaryClient::new(credentials)))
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            MediaHost::Local(_) => "local",
            MediaHost::Cloudinary(_) => "cloudinary",
        }
    }

    /// Upload `data` under `public_id`, replacing any previous object.
    pub async fn upload(&self, data: &[u8], public_id: &str) -> Result<UploadReceipt, MediaError> {
        match self {
            MediaHost::Local(store) => store.upload(data, public_id).await,
            MediaHost::Cloudinary(client) => client.upload(data, public_id).await,
        }
    }

    /// URL of the 250x250 fill-cropped avatar at `version`.
    pub fn avatar_url(&self, public_id: &str, version: i64) -> String {
        match self {
            MediaHost::Local(store) => store.url(public_id, version),
            MediaHost::Cloudinary(client) => client.avatar_url(public_id, version),
        }
    }

    /// The local store, when this host serves files itself.
    pub fn local(&self) -> Option<&LocalMediaStore> {
        match self {
            MediaHost::Local(store) => Some(store),
            MediaHost::Cloudinary(_) => None,
        }
    }
}
