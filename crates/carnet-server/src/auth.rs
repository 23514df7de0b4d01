//! Request authentication.
//!
//! Users present `Authorization: Bearer <token>`; the token's BLAKE3 digest
//! is matched against `users.token_hash`. Admin routes compare the bearer
//! against `ADMIN_TOKEN` instead.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use subtle::ConstantTimeEq;
use tracing::warn;

use carnet_shared::token::hash_token;
use carnet_store::User;

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::error::ServerError;

/// The authenticated user of the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ServerError::Unauthorized)?;
        let token_hash = hash_token(token);

        let user = state.db.lock().await.get_user_by_token_hash(&token_hash)?;
        match user {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                warn!(path = %parts.uri.path(), "Rejected unknown bearer token");
                Err(ServerError::Unauthorized)
            }
        }
    }
}

/// The token of an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub fn verify_admin_token(headers: &HeaderMap, config: &ServerConfig) -> Result<(), ServerError> {
    let Some(ref expected) = config.admin_token else {
        return Err(ServerError::Forbidden(
            "Admin API is disabled (no ADMIN_TOKEN configured)".into(),
        ));
    };

    let token = bearer_token(headers).unwrap_or("");

    // Constant-time comparison to prevent timing attacks on admin token.
    let token_bytes = token.as_bytes();
    let expected_bytes = expected.as_bytes();
    if token_bytes.len() != expected_bytes.len()
        || token_bytes.ct_eq(expected_bytes).unwrap_u8() != 1
    {
        return Err(ServerError::Forbidden("Invalid admin token".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(auth: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert("authorization", HeaderValue::from_str(auth).unwrap());
        h
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_verify_admin_token() {
        let mut config = ServerConfig::default();
        assert!(verify_admin_token(&headers("Bearer x"), &config).is_err());

        config.admin_token = Some("s3cret".into());
        assert!(verify_admin_token(&headers("Bearer s3cret"), &config).is_ok());
        assert!(verify_admin_token(&headers("Bearer s3cres"), &config).is_err());
        assert!(verify_admin_token(&headers("Bearer s3"), &config).is_err());
        assert!(verify_admin_token(&HeaderMap::new(), &config).is_err());
    }
}
