//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/login` | Body: `{"password":"…"}`; the only open write |
//! | `POST` | `/auth/verify` | 200 iff the bearer token is valid |

use axum::{Json, extract::State};
use muster_core::store::RegistrationStore;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
  AppState,
  auth::{Authenticated, mint_token, verify_password},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
  pub access_token: String,
  pub token_type:   String,
}

/// `POST /auth/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<TokenResponse>, ApiError>
where
  S: RegistrationStore + Clone + Send + Sync + 'static,
{
  if !verify_password(&body.password, &state.auth.password_hash) {
    return Err(ApiError::InvalidCredentials);
  }

  let access_token = mint_token(&state.auth)?;
  Ok(Json(TokenResponse {
    access_token,
    token_type: "bearer".to_string(),
  }))
}

/// `POST /auth/verify` — reaching the body at all means the token passed.
pub async fn verify<S>(
  State(_state): State<AppState<S>>,
  _auth: Authenticated,
) -> Json<Value>
where
  S: RegistrationStore + Clone + Send + Sync + 'static,
{
  Json(json!({ "valid": true, "message": "token is valid" }))
}
