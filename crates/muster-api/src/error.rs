//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Error bodies follow the `{"success": false, "error": ..., "detail": ...}`
//! shape the front end renders as inline alerts.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("invalid password")]
  InvalidCredentials,

  #[error("invalid or missing bearer token")]
  Unauthorized,

  #[error("{0}")]
  Validation(String),

  #[error("a student with index number {0:?} is already registered")]
  DuplicateIndex(String),

  #[error("no student registered with index number {0:?}")]
  NotFound(String),

  /// Database or mail/QR provider failure; never carries request detail.
  #[error("dependency failure: {0}")]
  Dependency(String),
}

impl From<muster_core::Error> for ApiError {
  fn from(err: muster_core::Error) -> Self {
    match err {
      muster_core::Error::Validation(msg) => ApiError::Validation(msg),
      muster_core::Error::DuplicateIndex(index) => ApiError::DuplicateIndex(index),
      muster_core::Error::NotFound(index) => ApiError::NotFound(index),
      muster_core::Error::Storage(msg) => ApiError::Dependency(msg),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, error, detail) = match &self {
      ApiError::InvalidCredentials => {
        (StatusCode::UNAUTHORIZED, self.to_string(), None)
      }
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, self.to_string(), None)
      }
      ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string(), None),
      ApiError::DuplicateIndex(_) => {
        (StatusCode::CONFLICT, self.to_string(), None)
      }
      ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string(), None),
      // Dependency failures surface as a generic server error; the cause
      // goes into the detail field and the logs, not the headline.
      ApiError::Dependency(cause) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        "an unexpected error occurred".to_string(),
        Some(cause.clone()),
      ),
    };

    let unauthorized = status == StatusCode::UNAUTHORIZED;
    let body = Json(json!({
      "success": false,
      "error":   error,
      "detail":  detail,
    }));

    let mut response = (status, body).into_response();
    if unauthorized {
      response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    response
  }
}
