use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tracing::{debug, info};

use super::{MediaError, UploadReceipt};

/// Reject anything but a plain `folder/name` pair of normal path segments.
fn split_public_id(public_id: &str) -> Result<(&str, &str), MediaError> {
    let invalid = || MediaError::InvalidName(public_id.to_string());
    let (folder, name) = public_id.split_once('/').ok_or_else(invalid)?;
    for segment in [folder, name] {
        let mut components = Path::new(segment).components();
        let ok = matches!(components.next(), Some(Component::Normal(_)))
            && components.next().is_none()
            && !segment.contains('\\');
        if !ok {
            return Err(invalid());
        }
    }
    Ok((folder, name))
}

/// Avatar storage on the server's own disk.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalMediaStore {
    pub async fn new(base_path: PathBuf, public_base_url: String) -> Result<Self, MediaError> {
        fs::create_dir_all(&base_path).await.map_err(|e| {
            MediaError::Storage(format!(
                "Failed to create media directory '{}': {}",
                base_path.display(),
                e
            ))
        })?;

        info!(path = %base_path.display(), "Local media store initialized");

        Ok(Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn upload(&self, data: &[u8], public_id: &str) -> Result<UploadReceipt, MediaError> {
        let path = self.object_path(public_id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| MediaError::Storage(format!("Failed to create folder: {e}")))?;
        }

        fs::write(&path, data).await.map_err(|e| {
            MediaError::Storage(format!("Failed to write {}: {}", public_id, e))
        })?;

        debug!(public_id, size = data.len(), "Stored media object");
        Ok(UploadReceipt {
            public_id: public_id.to_string(),
            version: Utc::now().timestamp(),
        })
    }

    pub async fn read(&self, public_id: &str) -> Result<Vec<u8>, MediaError> {
        let path = self.object_path(public_id)?;

        if !path.exists() {
            return Err(MediaError::NotFound(public_id.to_string()));
        }

        fs::read(&path)
            .await
            .map_err(|e| MediaError::Storage(format!("Failed to read {}: {}", public_id, e)))
    }

    pub fn url(&self, public_id: &str, version: i64) -> String {
        format!("{}/media/{}?v={}", self.public_base_url, public_id, version)
    }

    fn object_path(&self, public_id: &str) -> Result<PathBuf, MediaError> {
        let (folder, name) = split_public_id(public_id)?;
        Ok(self.base_path.join(folder).join(name))
    }
}

/// Content type guessed from the leading magic bytes.
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    match data {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "application/octet-stream",
    }
}
