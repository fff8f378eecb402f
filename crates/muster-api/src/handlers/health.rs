//! Handler for `GET /health` — open liveness probe, no auth.

use axum::{Json, extract::State};
use muster_core::store::RegistrationStore;
use serde_json::{Value, json};

use crate::AppState;

/// `GET /health`
///
/// Always 200; the `database` field carries the probe result so monitors
/// can tell an unhealthy dependency from a dead process.
pub async fn handler<S>(State(state): State<AppState<S>>) -> Json<Value>
where
  S: RegistrationStore + Clone + Send + Sync + 'static,
{
  let database = match state.store.ping().await {
    Ok(()) => "connected".to_string(),
    Err(e) => format!("error: {e}"),
  };

  Json(json!({ "status": "healthy", "database": database }))
}
