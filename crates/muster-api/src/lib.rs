//! JSON REST API for Muster.
//!
//! Exposes an axum [`Router`] backed by any
//! [`muster_core::store::RegistrationStore`]. Every route except
//! `/auth/login` and `/health` sits behind the bearer-token gate in
//! [`auth`].

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use muster_core::store::RegistrationStore;
use muster_invite::{MailConfig, Mailer};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `MUSTER_`-prefixed environment overrides.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  /// Argon2 PHC string for the single admin password.
  pub auth_password_hash: String,
  /// HMAC secret for bearer tokens; at least 32 bytes.
  pub token_secret:       String,
  #[serde(default = "auth::default_token_ttl_minutes")]
  pub token_ttl_minutes:  i64,
  /// SMTP settings; omit the block entirely to run with mail disabled.
  #[serde(default)]
  pub mail:               Option<MailConfig>,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: RegistrationStore> {
  pub store:  Arc<S>,
  pub auth:   Arc<AuthConfig>,
  pub mailer: Arc<Mailer>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RegistrationStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Open routes
    .route("/health", get(handlers::health::handler::<S>))
    .route("/auth/login", post(handlers::auth::login::<S>))
    // Everything below requires a bearer token (enforced per-handler via
    // the `Authenticated` extractor).
    .route("/auth/verify", post(handlers::auth::verify::<S>))
    .route("/users/register", post(handlers::register::handler::<S>))
    .route("/registrations/scan", post(handlers::scan::handler::<S>))
    .route("/users", get(handlers::admin::list::<S>))
    .route(
      "/users/{index_number}",
      get(handlers::admin::get_one::<S>).put(handlers::admin::update::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
