//! Integration tests driving the full router against an in-memory store.
//!
//! The mailer runs disabled throughout, which doubles as the test for the
//! registration policy: rows commit whether or not email can be sent.

use std::sync::Arc;

use argon2::{Argon2, PasswordHasher as _, password_hash::SaltString};
use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use muster_invite::Mailer;
use muster_store_sqlite::SqliteStore;
use rand_core::OsRng;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, auth::AuthConfig, router};

const PASSWORD: &str = "secret";
const TOKEN_SECRET: &str = "0123456789abcdef0123456789abcdef";

async fn make_state() -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(PASSWORD.as_bytes(), &salt)
    .unwrap()
    .to_string();

  AppState {
    store:  Arc::new(store),
    auth:   Arc::new(AuthConfig {
      password_hash:     hash,
      token_secret:      TOKEN_SECRET.to_string(),
      token_ttl_minutes: 60,
    }),
    mailer: Arc::new(Mailer::Disabled),
  }
}

async fn request(
  state:  AppState<SqliteStore>,
  method: &str,
  uri:    &str,
  token:  Option<&str>,
  body:   Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }

  let req = match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let resp = router(state).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn login(state: &AppState<SqliteStore>) -> String {
  let (status, body) = request(
    state.clone(),
    "POST",
    "/auth/login",
    None,
    Some(json!({ "password": PASSWORD })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  body["access_token"].as_str().unwrap().to_string()
}

fn register_body(index: &str) -> Value {
  json!({
    "name":         "Test Student",
    "index_number": index,
    "email":        "t@example.com",
    "combination":  "Physical Science",
  })
}

async fn register(
  state: &AppState<SqliteStore>,
  token: &str,
  index: &str,
) -> (StatusCode, Value) {
  request(
    state.clone(),
    "POST",
    "/users/register",
    Some(token),
    Some(register_body(index)),
  )
  .await
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_open_and_reports_database() {
  let state = make_state().await;
  let (status, body) = request(state, "GET", "/health", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "healthy");
  assert_eq!(body["database"], "connected");
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_mints_a_usable_token() {
  let state = make_state().await;
  let token = login(&state).await;

  let (status, body) =
    request(state, "POST", "/auth/verify", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["valid"], true);
}

#[tokio::test]
async fn login_with_wrong_password_rejected() {
  let state = make_state().await;
  let (status, body) = request(
    state,
    "POST",
    "/auth/login",
    None,
    Some(json!({ "password": "wrong" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["success"], false);
  assert!(body.get("access_token").is_none());
}

#[tokio::test]
async fn protected_routes_require_a_token() {
  let state = make_state().await;

  let (status, body) =
    request(state.clone(), "GET", "/users", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["success"], false);

  let (status, _) = request(
    state.clone(),
    "GET",
    "/users",
    Some("garbage.token.here"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let (status, _) = request(
    state,
    "POST",
    "/registrations/scan",
    None,
    Some(json!({ "index_number": "TEST001" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_from_another_secret_rejected() {
  let state = make_state().await;
  let foreign = crate::auth::mint_token(&AuthConfig {
    password_hash:     String::new(),
    token_secret:      "ffffffffffffffffffffffffffffffff".to_string(),
    token_ttl_minutes: 60,
  })
  .unwrap();

  let (status, _) =
    request(state, "GET", "/users", Some(&foreign), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Registration ────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_then_get_roundtrips_all_fields() {
  let state = make_state().await;
  let token = login(&state).await;

  let (status, body) = register(&state, &token, "TEST001").await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["success"], true);
  assert_eq!(body["student"]["index_number"], "TEST001");
  assert_eq!(body["student"]["attendance_status"], false);

  let (status, body) =
    request(state, "GET", "/users/TEST001", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "Test Student");
  assert_eq!(body["index_number"], "TEST001");
  assert_eq!(body["email"], "t@example.com");
  assert_eq!(body["combination"], "Physical Science");
  assert_eq!(body["mobile_number"], Value::Null);
}

#[tokio::test]
async fn duplicate_registration_conflicts_and_keeps_one_row() {
  let state = make_state().await;
  let token = login(&state).await;

  let (status, _) = register(&state, &token, "TEST001").await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) = register(&state, &token, "TEST001").await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["success"], false);

  let (status, body) =
    request(state, "GET", "/users", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_registration_input_rejected() {
  let state = make_state().await;
  let token = login(&state).await;

  let mut body = register_body("TEST001");
  body["email"] = json!("not-an-email");
  let (status, body) = request(
    state.clone(),
    "POST",
    "/users/register",
    Some(&token),
    Some(body),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["success"], false);

  // Nothing was inserted.
  let (_, body) = request(state, "GET", "/users", Some(&token), None).await;
  assert!(body.as_array().unwrap().is_empty());
}

// ─── Attendance ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn scan_unknown_index_is_404() {
  let state = make_state().await;
  let token = login(&state).await;

  let (status, body) = request(
    state,
    "POST",
    "/registrations/scan",
    Some(&token),
    Some(json!({ "index_number": "NOPE001" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["success"], false);
}

#[tokio::test]
async fn scan_flow_is_idempotent() {
  let state = make_state().await;
  let token = login(&state).await;
  register(&state, &token, "TEST001").await;

  let scan = json!({ "index_number": "TEST001" });

  let (status, body) = request(
    state.clone(),
    "POST",
    "/registrations/scan",
    Some(&token),
    Some(scan.clone()),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["success"], true);
  assert_eq!(body["already_scanned"], false);
  assert_eq!(body["student_name"], "Test Student");

  for _ in 0..2 {
    let (status, body) = request(
      state.clone(),
      "POST",
      "/registrations/scan",
      Some(&token),
      Some(scan.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["already_scanned"], true);
  }

  // The flag never reverts.
  let (_, body) =
    request(state, "GET", "/users/TEST001", Some(&token), None).await;
  assert_eq!(body["attendance_status"], true);
}

// ─── Admin updates ───────────────────────────────────────────────────────────

#[tokio::test]
async fn update_fields_in_place() {
  let state = make_state().await;
  let token = login(&state).await;
  register(&state, &token, "TEST001").await;

  let (status, body) = request(
    state,
    "PUT",
    "/users/TEST001",
    Some(&token),
    Some(json!({ "name": "Corrected Name", "mobile_number": "0771234567" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "Corrected Name");
  assert_eq!(body["mobile_number"], "0771234567");
  assert_eq!(body["index_number"], "TEST001");
}

#[tokio::test]
async fn rename_index_moves_the_record() {
  let state = make_state().await;
  let token = login(&state).await;
  register(&state, &token, "OLD001").await;

  let (status, body) = request(
    state.clone(),
    "PUT",
    "/users/OLD001",
    Some(&token),
    Some(json!({ "index_number": "NEW001" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["index_number"], "NEW001");

  let (status, _) =
    request(state.clone(), "GET", "/users/OLD001", Some(&token), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) =
    request(state, "GET", "/users/NEW001", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn rename_onto_taken_index_conflicts() {
  let state = make_state().await;
  let token = login(&state).await;
  register(&state, &token, "TEST001").await;
  register(&state, &token, "TEST002").await;

  let (status, body) = request(
    state,
    "PUT",
    "/users/TEST002",
    Some(&token),
    Some(json!({ "index_number": "TEST001" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["success"], false);
}

#[tokio::test]
async fn update_unknown_index_is_404() {
  let state = make_state().await;
  let token = login(&state).await;

  let (status, _) = request(
    state,
    "PUT",
    "/users/NOPE001",
    Some(&token),
    Some(json!({ "name": "Anyone" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_invalid_email_rejected() {
  let state = make_state().await;
  let token = login(&state).await;
  register(&state, &token, "TEST001").await;

  let (status, _) = request(
    state,
    "PUT",
    "/users/TEST001",
    Some(&token),
    Some(json!({ "email": "broken" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}
