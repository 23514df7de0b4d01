//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use carnet_shared::constants::{DEFAULT_AVATAR_FOLDER, DEFAULT_HTTP_PORT, MAX_AVATAR_SIZE};

/// Where avatar uploads end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaBackend {
    /// Files on this server's disk, served back under `/media`.
    Local,
    /// Cloudinary image hosting.
    Cloudinary,
}

/// Cloudinary account credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: `None` (platform data directory).
    pub database_path: Option<PathBuf>,

    /// Admin API bearer token. Required to access /admin/* endpoints.
    /// Env: `ADMIN_TOKEN`
    /// Default: empty (admin API disabled).
    pub admin_token: Option<String>,

    /// Folder avatars are namespaced under on the media host.
    /// Env: `AVATAR_FOLDER`
    /// Default: `web10`
    pub avatar_folder: String,

    /// Maximum avatar upload size in bytes.
    /// Env: `MAX_AVATAR_SIZE`
    /// Default: 5 MiB
    pub max_avatar_size: usize,

    /// Env: `MEDIA_BACKEND` (`local` / `cloudinary`)
    /// Default: `local`
    pub media_backend: MediaBackend,

    /// Directory used by the local media backend.
    /// Env: `MEDIA_STORAGE_PATH`
    /// Default: `./media`
    pub media_storage_path: PathBuf,

    /// Externally visible base URL, used to build local avatar URLs.
    /// Env: `PUBLIC_BASE_URL`
    /// Default: `http://localhost:8080`
    pub public_base_url: String,

    /// Env: `CLOUDINARY_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET`
    pub cloudinary: Option<CloudinaryCredentials>,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("http_addr", &self.http_addr)
            .field("database_path", &self.database_path)
            .field("admin_enabled", &self.admin_token.is_some())
            .field("avatar_folder", &self.avatar_folder)
            .field("max_avatar_size", &self.max_avatar_size)
            .field("media_backend", &self.media_backend)
            .field("media_storage_path", &self.media_storage_path)
            .field("public_base_url", &self.public_base_url)
            .field("cloudinary", &self.cloudinary)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: None,
            admin_token: None,
            avatar_folder: DEFAULT_AVATAR_FOLDER.to_string(),
            max_avatar_size: MAX_AVATAR_SIZE,
            media_backend: MediaBackend::Local,
            media_storage_path: PathBuf::from("./media"),
            public_base_url: format!("http://localhost:{DEFAULT_HTTP_PORT}"),
            cloudinary: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Some(path) = lookup("DATABASE_PATH").filter(|p| !p.is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(token) = lookup("ADMIN_TOKEN").filter(|t| !t.is_empty()) {
            config.admin_token = Some(token);
        }

        if let Some(folder) = lookup("AVATAR_FOLDER") {
            let folder = folder.trim().trim_matches('/');
            if folder.is_empty() || folder.contains('/') || folder.contains("..") {
                tracing::warn!(value = %folder, "Invalid AVATAR_FOLDER, using default");
            } else {
                config.avatar_folder = folder.to_string();
            }
        }

        if let Some(val) = lookup("MAX_AVATAR_SIZE") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.max_avatar_size = n,
                _ => tracing::warn!(value = %val, "Invalid MAX_AVATAR_SIZE, using default"),
            }
        }

        if let Some(path) = lookup("MEDIA_STORAGE_PATH") {
            config.media_storage_path = PathBuf::from(path);
        }

        if let Some(url) = lookup("PUBLIC_BASE_URL") {
            config.public_base_url = url.trim_end_matches('/').to_string();
        }

        let credential = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let (Some(cloud_name), Some(api_key), Some(api_secret)) = (
            credential("CLOUDINARY_NAME"),
            credential("CLOUDINARY_API_KEY"),
            credential("CLOUDINARY_API_SECRET"),
        ) {
            config.cloudinary = Some(CloudinaryCredentials {
                cloud_name,
                api_key,
                api_secret,
            });
        }

        if let Some(val) = lookup("MEDIA_BACKEND") {
            match val.to_ascii_lowercase().as_str() {
                "local" => config.media_backend = MediaBackend::Local,
                "cloudinary" if config.cloudinary.is_some() => {
                    config.media_backend = MediaBackend::Cloudinary
                }
                "cloudinary" => tracing::warn!(
                    "MEDIA_BACKEND=cloudinary without CLOUDINARY_* credentials, using local"
                ),
                other => tracing::warn!(value = %other, "Unknown MEDIA_BACKEND, using local"),
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.avatar_folder, "web10");
        assert_eq!(config.media_backend, MediaBackend::Local);
        assert!(config.admin_token.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HTTP_ADDR", "127.0.0.1:9000"),
            ("DATABASE_PATH", "/tmp/carnet.db"),
            ("ADMIN_TOKEN", "s3cret"),
            ("AVATAR_FOLDER", "/avatars/"),
            ("MAX_AVATAR_SIZE", "1024"),
            ("PUBLIC_BASE_URL", "https://carnet.example/"),
        ]);
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 9000).into());
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/carnet.db")));
        assert_eq!(config.admin_token.as_deref(), Some("s3cret"));
        assert_eq!(config.avatar_folder, "avatars");
        assert_eq!(config.max_avatar_size, 1024);
        assert_eq!(config.public_base_url, "https://carnet.example");
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = config_from(&[
            ("HTTP_ADDR", "not-an-addr"),
            ("MAX_AVATAR_SIZE", "lots"),
            ("AVATAR_FOLDER", "../etc"),
            ("ADMIN_TOKEN", ""),
        ]);
        assert_eq!(config.http_addr, ServerConfig::default().http_addr);
        assert_eq!(config.max_avatar_size, MAX_AVATAR_SIZE);
        assert_eq!(config.avatar_folder, "web10");
        assert!(config.admin_token.is_none());
    }

    #[test]
    fn test_cloudinary_requires_credentials() {
        let config = config_from(&[("MEDIA_BACKEND", "cloudinary")]);
        assert_eq!(config.media_backend, MediaBackend::Local);

        let config = config_from(&[
            ("MEDIA_BACKEND", "Cloudinary"),
            ("CLOUDINARY_NAME", "demo"),
            ("CLOUDINARY_API_KEY", "123"),
            ("CLOUDINARY_API_SECRET", "shh"),
        ]);
        assert_eq!(config.media_backend, MediaBackend::Cloudinary);
        assert!(!format!("{:?}", config).contains("shh"));
    }
}
