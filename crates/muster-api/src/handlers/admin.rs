//! Handlers for the `/users` admin endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users` | Full list, newest first; paging is the client's job |
//! | `GET`  | `/users/{index_number}` | 404 if not found |
//! | `PUT`  | `/users/{index_number}` | Partial update; 409 on index collision |

use axum::{
  Json,
  extract::{Path, State},
};
use muster_core::{
  registration::{Registration, RegistrationUpdate},
  store::RegistrationStore,
};

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `GET /users`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
) -> Result<Json<Vec<Registration>>, ApiError>
where
  S: RegistrationStore + Clone + Send + Sync + 'static,
{
  Ok(Json(state.store.list().await?))
}

/// `GET /users/{index_number}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(index_number): Path<String>,
) -> Result<Json<Registration>, ApiError>
where
  S: RegistrationStore + Clone + Send + Sync + 'static,
{
  let registration = state
    .store
    .get(&index_number)
    .await?
    .ok_or(ApiError::NotFound(index_number))?;
  Ok(Json(registration))
}

/// `PUT /users/{index_number}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(index_number): Path<String>,
  Json(body): Json<RegistrationUpdate>,
) -> Result<Json<Registration>, ApiError>
where
  S: RegistrationStore + Clone + Send + Sync + 'static,
{
  body.validate()?;
  let updated = state.store.update(&index_number, body).await?;
  Ok(Json(updated))
}
