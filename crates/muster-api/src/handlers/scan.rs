//! Handler for `POST /registrations/scan`.

use axum::{Json, extract::State};
use muster_core::store::RegistrationStore;
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Authenticated, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ScanBody {
  pub index_number: String,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
  pub success:         bool,
  pub message:         String,
  pub student_name:    String,
  pub already_scanned: bool,
}

/// `POST /registrations/scan`
///
/// A re-scan is a success with `already_scanned = true`, not an error — the
/// entry desk greets the student either way.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Json(body): Json<ScanBody>,
) -> Result<Json<ScanResponse>, ApiError>
where
  S: RegistrationStore + Clone + Send + Sync + 'static,
{
  let outcome = state.store.mark_attendance(&body.index_number).await?;
  let name = outcome.registration.name;

  let message = if outcome.already_scanned {
    format!("Hello again, {name}! Your attendance was already recorded.")
  } else {
    format!("Welcome, {name}! Your attendance has been recorded.")
  };

  Ok(Json(ScanResponse {
    success:         true,
    message,
    student_name:    name,
    already_scanned: outcome.already_scanned,
  }))
}
