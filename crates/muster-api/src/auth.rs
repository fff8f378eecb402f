//! Bearer-token auth gate.
//!
//! One credential for the whole system: the admin password verifies against
//! an argon2 PHC hash from configuration, and a successful login mints an
//! HS256 JWT. Every protected handler takes the [`Authenticated`] extractor;
//! there are no accounts, roles, or revocation.

use argon2::{Argon2, PasswordHash, PasswordVerifier as _};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use muster_core::store::RegistrationStore;
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

/// Tokens signed with a secret shorter than this are trivially brute-forced;
/// startup refuses to run with one.
pub const MIN_TOKEN_SECRET_LEN: usize = 32;

const DEFAULT_TOKEN_TTL_MINUTES: i64 = 12 * 60;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Credentials and token parameters for this server instance.
/// Injected at startup; nothing here is module-level state.
#[derive(Clone)]
pub struct AuthConfig {
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash:     String,
  /// HMAC secret for token signing; at least [`MIN_TOKEN_SECRET_LEN`] bytes.
  pub token_secret:      String,
  pub token_ttl_minutes: i64,
}

pub fn default_token_ttl_minutes() -> i64 { DEFAULT_TOKEN_TTL_MINUTES }

// ─── Password ────────────────────────────────────────────────────────────────

/// Verify the admin password against the configured argon2 hash.
/// A malformed hash counts as a failed verification, not a server fault.
pub fn verify_password(password: &str, phc_hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc_hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  pub sub: String,
  pub iat: i64,
  pub exp: i64,
}

/// Mint a signed bearer token for the admin session.
pub fn mint_token(config: &AuthConfig) -> Result<String, ApiError> {
  let now = Utc::now();
  let claims = Claims {
    sub: "admin".to_string(),
    iat: now.timestamp(),
    exp: (now + Duration::minutes(config.token_ttl_minutes)).timestamp(),
  };

  jsonwebtoken::encode(
    &Header::default(),
    &claims,
    &EncodingKey::from_secret(config.token_secret.as_bytes()),
  )
  .map_err(|e| ApiError::Dependency(e.to_string()))
}

/// Verify a bearer token's signature and expiry.
pub fn verify_token(token: &str, config: &AuthConfig) -> Result<Claims, ApiError> {
  jsonwebtoken::decode::<Claims>(
    token,
    &DecodingKey::from_secret(config.token_secret.as_bytes()),
    &Validation::default(),
  )
  .map(|data| data.claims)
  .map_err(|_| ApiError::Unauthorized)
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// Zero-size marker: present in the handler means the request carried a
/// valid bearer token.
pub struct Authenticated;

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: RegistrationStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
    verify_token(token, &state.auth)?;
    Ok(Authenticated)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
