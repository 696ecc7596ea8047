use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ag_core::{Error, Result};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::AppState;

pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60 * 24;

/// Longest token lifetime accepted from configuration: ten years.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365 * 10;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Static user table plus the HS256 secret used to sign access tokens.
#[derive(Clone)]
pub struct AuthConfig {
    secret_key: String,
    token_ttl: Duration,
    users: HashMap<String, String>,
}

impl AuthConfig {
    pub fn new(
        secret_key: impl Into<String>,
        token_ttl_minutes: i64,
        users: HashMap<String, String>,
    ) -> Result<Self> {
        let token_ttl = Duration::try_minutes(token_ttl_minutes).ok_or_else(|| {
            Error::Config(format!("Token lifetime out of range: {} minutes", token_ttl_minutes))
        })?;
        Ok(Self {
            secret_key: secret_key.into(),
            token_ttl,
            users,
        })
    }

    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .map_or(false, |expected| expected == password)
    }

    pub fn issue_token(&self, username: &str) -> Result<String> {
        let expires_at = Utc::now()
            .checked_add_signed(self.token_ttl)
            .ok_or_else(|| Error::Auth("Token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: username.to_string(),
            exp: expires_at.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_key.as_bytes()),
        )
        .map_err(|e| Error::Auth(e.to_string()))
    }

    /// Returns the username the token was issued to.
    pub fn verify_token(&self, token: &str) -> Result<String> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_key.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| Error::Auth(e.to_string()))?;

        if !self.users.contains_key(&data.claims.sub) {
            return Err(Error::Auth(format!("Unknown user: {}", data.claims.sub)));
        }
        Ok(data.claims.sub)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("users", &self.users.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The authenticated caller, taken from an `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let username = state.auth.verify_token(token.trim()).map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            ApiError::Unauthorized("Could not validate credentials".to_string())
        })?;
        Ok(CurrentUser(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ttl_minutes: i64) -> AuthConfig {
        AuthConfig::new(
            "test-secret",
            ttl_minutes,
            HashMap::from([("admin".to_string(), "admin123".to_string())]),
        )
        .unwrap()
    }

    #[test]
    fn test_authenticate() {
        let auth = config(DEFAULT_TOKEN_TTL_MINUTES);
        assert!(auth.authenticate("admin", "admin123"));
        assert!(!auth.authenticate("admin", "wrong"));
        assert!(!auth.authenticate("nobody", "admin123"));
    }

    #[test]
    fn test_token_round_trip() {
        let auth = config(DEFAULT_TOKEN_TTL_MINUTES);
        let token = auth.issue_token("admin").unwrap();
        assert_eq!(auth.verify_token(&token).unwrap(), "admin");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = config(-10);
        let token = auth.issue_token("admin").unwrap();
        assert!(matches!(auth.verify_token(&token), Err(Error::Auth(_))));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let other = AuthConfig::new(
            "other-secret",
            DEFAULT_TOKEN_TTL_MINUTES,
            HashMap::from([("admin".to_string(), "admin123".to_string())]),
        )
        .unwrap();
        let token = other.issue_token("admin").unwrap();
        assert!(config(DEFAULT_TOKEN_TTL_MINUTES).verify_token(&token).is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let debug = format!("{:?}", config(DEFAULT_TOKEN_TTL_MINUTES));
        assert!(!debug.contains("test-secret"));
        assert!(!debug.contains("admin123"));
    }

    #[test]
    fn test_oversized_ttl_is_a_config_error() {
        let auth = AuthConfig::new("test-secret", i64::MAX, HashMap::new());
        assert!(matches!(auth, Err(Error::Config(_))));
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let auth = config(MAX_TOKEN_TTL_MINUTES * 100_000);
        assert!(matches!(auth.issue_token("admin"), Err(Error::Auth(_))));
    }
}
