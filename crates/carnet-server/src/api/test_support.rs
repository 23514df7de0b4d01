//! In-process harness for router tests.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use carnet_shared::token::{generate_token, hash_token};
use carnet_store::Database;

use super::{build_router, AppState};
use crate::config::ServerConfig;
use crate::media::MediaHost;

pub const TEST_ADMIN_TOKEN: &str = "admin-secret";
pub const TEST_MAX_AVATAR_SIZE: usize = 4 * 1024;

const BOUNDARY: &str = "carnet-test-boundary";

pub struct TestApp {
    router: Router,
    state: AppState,
    _media_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let media_dir = TempDir::new().unwrap();
        let config = ServerConfig {
            admin_token: Some(TEST_ADMIN_TOKEN.to_string()),
            max_avatar_size: TEST_MAX_AVATAR_SIZE,
            media_storage_path: media_dir.path().to_path_buf(),
            ..ServerConfig::default()
        };

        let media = MediaHost::from_config(&config).await.unwrap();
        let db = Database::open_in_memory().unwrap();
        let state = AppState::new(db, media, config);

        Self {
            router: build_router(state.clone()),
            state,
            _media_dir: media_dir,
        }
    }

    /// Insert a user directly and return its bearer token.
    pub async fn seed_user(&self, username: &str, email: &str) -> String {
        let token = generate_token();
        self.state
            .db
            .lock()
            .await
            .create_user(username, email, &hash_token(&token))
            .unwrap();
        token
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.json_response(request).await
    }

    pub async fn upload_avatar(
        &self,
        token: &str,
        field: &str,
        data: &[u8],
    ) -> (StatusCode, serde_json::Value) {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"avatar.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::PATCH)
            .uri("/users/avatar")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.json_response(request).await
    }

    pub async fn get_raw(&self, path: &str) -> (StatusCode, Vec<u8>, Option<String>) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec(), content_type)
    }

    async fn json_response(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, json)
    }
}
