//! Handler for `POST /users/register`.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use muster_core::{
  registration::{NewRegistration, Registration},
  store::RegistrationStore,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Authenticated, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:          String,
  pub index_number:  String,
  pub email:         String,
  pub combination:   String,
  #[serde(default)]
  pub mobile_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
  pub success: bool,
  pub message: String,
  pub student: Registration,
}

/// `POST /users/register`
///
/// Inserts the row, then dispatches the invitation email from a background
/// task. The row stays committed whatever the email outcome; delivery
/// failures are logged, never returned to the caller.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RegistrationStore + Clone + Send + Sync + 'static,
{
  let input = NewRegistration {
    name:          body.name,
    index_number:  body.index_number,
    email:         body.email,
    combination:   body.combination,
    mobile_number: body.mobile_number,
  };
  input.validate()?;

  let student = state.store.insert(input).await?;

  let mailer = state.mailer.clone();
  let (email, name, index) = (
    student.email.clone(),
    student.name.clone(),
    student.index_number.clone(),
  );
  tokio::spawn(async move {
    if let Err(error) = mailer.send_invitation(&email, &name, &index).await {
      tracing::warn!(%error, recipient = %email, "invitation email failed");
    }
  });

  let message = format!(
    "Registration successful. An invitation email with your QR code has \
     been sent to {}.",
    student.email
  );

  Ok((
    StatusCode::CREATED,
    Json(RegisterResponse { success: true, message, student }),
  ))
}
