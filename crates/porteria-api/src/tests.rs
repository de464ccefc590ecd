//! Router integration tests over the SQLite backend.

use std::sync::Arc;

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use porteria_core::store::DeskStore as _;
use porteria_desk::FrontDesk;
use porteria_store_sqlite::{SqliteStore, seed::reference_layout};
use rand_core::OsRng;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, auth::AuthConfig, router};

async fn make_state(password: &str) -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  store.provision_spots(reference_layout()).await.unwrap();

  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .unwrap()
    .to_string();

  AppState {
    desk: FrontDesk::new(store),
    auth: Arc::new(AuthConfig {
      username:      "porter".to_string(),
      password_hash: hash,
    }),
  }
}

fn auth_header(user: &str, pass: &str) -> String {
  format!("Basic {}", B64.encode(format!("{user}:{pass}")))
}

async fn oneshot_json(
  state: AppState<SqliteStore>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let auth = auth_header("porter", "secret");
  let mut builder = Request::builder()
    .method(method)
    .uri(uri)
    .header(header::AUTHORIZATION, auth);

  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };

  let resp = router(state)
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
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

fn entry_body(national_id: &str) -> Value {
  json!({
    "name": "Jane Doe",
    "national_id": national_id,
    "apartment": "301",
  })
}

// ─── Auth ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unauthenticated_requests_return_401() {
  let state = make_state("secret").await;
  let req = Request::builder()
    .method("GET")
    .uri("/visitors")
    .body(Body::empty())
    .unwrap();
  let resp = router(state).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn wrong_password_returns_401() {
  let state = make_state("secret").await;
  let req = Request::builder()
    .method("GET")
    .uri("/visitors")
    .header(header::AUTHORIZATION, auth_header("porter", "wrong"))
    .body(Body::empty())
    .unwrap();
  let resp = router(state).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ─── Visitors ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn visitor_entry_and_fetch() {
  let state = make_state("secret").await;

  let (status, created) = oneshot_json(
    state.clone(),
    "POST",
    "/visitors",
    Some(entry_body("12345678-5")),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["status"], "in_building");

  let id = created["visitor_id"].as_str().unwrap().to_string();
  let (status, fetched) =
    oneshot_json(state, "GET", &format!("/visitors/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["name"], "Jane Doe");
}

#[tokio::test]
async fn invalid_national_id_returns_400() {
  let state = make_state("secret").await;
  let (status, body) = oneshot_json(
    state,
    "POST",
    "/visitors",
    Some(entry_body("12345678-0")),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("12345678"));
}

#[tokio::test]
async fn duplicate_entry_returns_409() {
  let state = make_state("secret").await;
  oneshot_json(
    state.clone(),
    "POST",
    "/visitors",
    Some(entry_body("12345678-5")),
  )
  .await;

  let (status, _) = oneshot_json(
    state,
    "POST",
    "/visitors",
    Some(entry_body("12.345.678-5")),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_visitor_returns_404() {
  let state = make_state("secret").await;
  let id = uuid::Uuid::new_v4();
  let (status, _) =
    oneshot_json(state, "GET", &format!("/visitors/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn exit_succeeds_once_then_conflicts() {
  let state = make_state("secret").await;
  let (_, created) = oneshot_json(
    state.clone(),
    "POST",
    "/visitors",
    Some(entry_body("12345678-5")),
  )
  .await;
  let id = created["visitor_id"].as_str().unwrap().to_string();

  let (status, receipt) = oneshot_json(
    state.clone(),
    "POST",
    &format!("/visitors/{id}/exit"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(receipt["visitor"]["status"], "exited");
  assert_eq!(receipt["stranded_spot"], Value::Null);

  let (status, _) =
    oneshot_json(state, "POST", &format!("/visitors/{id}/exit"), None).await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn visitor_list_filters_by_status() {
  let state = make_state("secret").await;
  let (_, created) = oneshot_json(
    state.clone(),
    "POST",
    "/visitors",
    Some(entry_body("12345678-5")),
  )
  .await;
  let id = created["visitor_id"].as_str().unwrap().to_string();
  oneshot_json(
    state.clone(),
    "POST",
    &format!("/visitors/{id}/exit"),
    None,
  )
  .await;
  oneshot_json(
    state.clone(),
    "POST",
    "/visitors",
    Some(entry_body("12345698-K")),
  )
  .await;

  let (_, active) = oneshot_json(
    state.clone(),
    "GET",
    "/visitors?status=in_building",
    None,
  )
  .await;
  assert_eq!(active.as_array().unwrap().len(), 1);

  let (_, all) = oneshot_json(state, "GET", "/visitors", None).await;
  assert_eq!(all.as_array().unwrap().len(), 2);
}

// ─── Parking ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn taking_a_spot_shrinks_the_available_list() {
  let state = make_state("secret").await;

  let (_, before) = oneshot_json(
    state.clone(),
    "GET",
    "/parking/available?kind=visitor",
    None,
  )
  .await;
  assert_eq!(before.as_array().unwrap().len(), 6);

  let mut body = entry_body("12345678-5");
  body["license_plate"] = json!("ABCD-12");
  body["parking_spot"] = json!("V-02");
  let (status, _) =
    oneshot_json(state.clone(), "POST", "/visitors", Some(body)).await;
  assert_eq!(status, StatusCode::CREATED);

  let (_, after) = oneshot_json(
    state,
    "GET",
    "/parking/available?kind=visitor",
    None,
  )
  .await;
  assert_eq!(after.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn stale_spot_pick_returns_409() {
  let state = make_state("secret").await;

  let mut body = entry_body("12345678-5");
  body["parking_spot"] = json!("V-01");
  oneshot_json(state.clone(), "POST", "/visitors", Some(body)).await;

  let mut body = entry_body("12345698-K");
  body["parking_spot"] = json!("V-01");
  let (status, _) =
    oneshot_json(state, "POST", "/visitors", Some(body)).await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn parking_board_filters_by_kind() {
  let state = make_state("secret").await;
  let (_, residents) =
    oneshot_json(state.clone(), "GET", "/parking?kind=resident", None).await;
  assert_eq!(residents.as_array().unwrap().len(), 6);

  let (_, board) = oneshot_json(state, "GET", "/parking", None).await;
  assert_eq!(board.as_array().unwrap().len(), 12);
}

// ─── Deliveries ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn delivery_arrival_and_pickup() {
  let state = make_state("secret").await;

  let (status, created) = oneshot_json(
    state.clone(),
    "POST",
    "/deliveries",
    Some(json!({
      "apartment": "402",
      "recipient_name": "Maria Silva",
      "courier": "Chilexpress",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["status"], "pending");

  let id = created["delivery_id"].as_str().unwrap().to_string();
  let (status, picked) = oneshot_json(
    state.clone(),
    "POST",
    &format!("/deliveries/{id}/pickup"),
    Some(json!({ "retrieved_by": "Juan" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(picked["status"], "picked_up");
  assert_eq!(picked["retrieved_by"], "Juan");

  let (status, _) = oneshot_json(
    state.clone(),
    "POST",
    &format!("/deliveries/{id}/pickup"),
    Some(json!({ "retrieved_by": "Pedro" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (_, pending) =
    oneshot_json(state, "GET", "/deliveries?status=pending", None).await;
  assert!(pending.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn pickup_without_a_name_returns_400() {
  let state = make_state("secret").await;
  let (_, created) = oneshot_json(
    state.clone(),
    "POST",
    "/deliveries",
    Some(json!({
      "apartment": "402",
      "recipient_name": "Maria",
      "courier": "Starken",
    })),
  )
  .await;
  let id = created["delivery_id"].as_str().unwrap().to_string();

  let (status, _) = oneshot_json(
    state,
    "POST",
    &format!("/deliveries/{id}/pickup"),
    Some(json!({ "retrieved_by": "  " })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─── Frequent visitors ────────────────────────────────────────────────────────

#[tokio::test]
async fn frequent_suggestions_surface_opted_in_visitors() {
  let state = make_state("secret").await;

  let mut body = entry_body("12345678-5");
  body["mark_frequent"] = json!(true);
  oneshot_json(state.clone(), "POST", "/visitors", Some(body)).await;

  let (status, matches) = oneshot_json(
    state.clone(),
    "GET",
    "/frequent-visitors?q=jane",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(matches.as_array().unwrap().len(), 1);
  assert_eq!(matches[0]["apartment"], "301");

  let (_, none) =
    oneshot_json(state, "GET", "/frequent-visitors?q=zzz", None).await;
  assert!(none.as_array().unwrap().is_empty());
}
