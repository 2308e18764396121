use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

use crate::db::admin_queries;
use crate::errors::AppError;
use crate::models::Admin;
use crate::state::AppState;

pub const SESSION_TOKEN_TTL_HOURS: i64 = 24;
/// Reset tokens only have to survive the gap between OTP verification
/// and the password update form submit.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 5;

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
}

pub fn generate_token(admin_id: Uuid, ttl: Duration) -> Result<String, AppError> {
    let claims = Claims {
        sub: admin_id,
        exp: (Utc::now() + ttl).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )
    .map_err(|e| AppError::External(format!("Failed to sign token: {}", e)))
}

/// Returns the admin id carried by a valid, unexpired token, or None.
pub fn verify_token(token: &str) -> Option<Uuid> {
    if token.trim().is_empty() || token.split('.').count() != 3 {
        return None;
    }
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims.sub)
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.trim().is_empty())
}

// ==============================================================================
// Password hashing
// ==============================================================================

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::External(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

// ==============================================================================
// Field validation
// ==============================================================================

static EMAIL_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn is_valid_username(username: &str) -> bool {
    let username = username.trim();
    (3..=50).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// At least 6 characters with one lowercase, one uppercase and one digit.
pub fn is_strong_password(password: &str) -> bool {
    password.len() >= 6
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

// ==============================================================================
// Request extractor for admin-protected routes
// ==============================================================================

pub struct AdminAuth(pub Admin);

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            AppError::Unauthorized("Access denied. No token provided.".into())
        })?;

        let admin_id = verify_token(token)
            .ok_or_else(|| AppError::Unauthorized("Invalid token. Please login again.".into()))?;

        let admin = admin_queries::find_by_id(&state.pool, admin_id)
            .await?
            .filter(|admin| admin.is_active)
            .ok_or_else(|| {
                AppError::Unauthorized("Invalid token or admin not found.".into())
            })?;

        Ok(AdminAuth(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("admin@example.com"));
        assert!(is_valid_email("a.b+c@mail.co.in"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn test_username_validation() {
        assert!(is_valid_username("admin_01"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("dash-not-allowed"));
    }

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("Passw0rd"));
        assert!(!is_strong_password("short"));
        assert!(!is_strong_password("alllowercase1"));
        assert!(!is_strong_password("ALLUPPER1"));
        assert!(!is_strong_password("NoDigitsHere"));
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("Sup3rSecret").unwrap();
        assert!(verify_password("Sup3rSecret", &hash));
        assert!(!verify_password("WrongSecret", &hash));
    }

    #[test]
    fn test_token_roundtrip() {
        let admin_id = Uuid::new_v4();
        let token = generate_token(admin_id, Duration::hours(1)).unwrap();
        assert_eq!(verify_token(&token), Some(admin_id));
        assert_eq!(verify_token("garbage"), None);
        assert_eq!(verify_token("a.b"), None);
    }
}
