use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tigerwatch_notify::{NotificationConfig, NotificationService, SimulatedMailer};
use tigerwatch_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

use super::*;

fn config() -> ServerConfig {
  ServerConfig {
    host:                   "127.0.0.1".into(),
    port:                   8080,
    store_path:             PathBuf::from(":memory:"),
    jwt_secret:             "test-secret".into(),
    token_ttl_hours:        1,
    request_timeout_secs:   5,
    sighting_radius_meters: Radius::default(),
    notifications:          NotificationConfig { delivery_delay_ms: 0, ..Default::default() },
  }
}

/// The running notification service is returned so it outlives the router.
async fn app() -> (Router, NotificationService<SimulatedMailer>) {
  let config = config();
  let store = SqliteStore::open_in_memory().await.unwrap();
  let mut notifications = NotificationService::simulated(config.notifications.clone()).unwrap();
  notifications.start().unwrap();
  let state = AppState::new(Arc::new(store), &config, notifications.queue()).unwrap();
  (router(state), notifications)
}

async fn call(
  app: &Router,
  method: &str,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, json)
}

async fn signup(app: &Router, username: &str) -> String {
  let (status, _) = call(
    app,
    "POST",
    "/api/v1/users",
    None,
    Some(json!({
      "username": username,
      "email": format!("{username}@example.com"),
      "password": "hunter2",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) = call(
    app,
    "POST",
    "/api/v1/auth/login",
    None,
    Some(json!({ "username": username, "password": "hunter2" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  body["access_token"].as_str().unwrap().to_owned()
}

async fn create_tiger(app: &Router, token: &str) -> i64 {
  let (status, body) = call(
    app,
    "POST",
    "/api/v1/tigers",
    Some(token),
    Some(json!({
      "name": "Rajah",
      "date_of_birth": "2018-05-17",
      "last_seen_at": "2024-01-01T00:00:00Z",
      "last_seen_lat": 1.2,
      "last_seen_lon": 2.2,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_i64().unwrap()
}

fn sighting_body(tiger_id: i64, lat: f64, lon: f64, sighted_at: &str) -> Value {
  json!({ "tiger_id": tiger_id, "lat": lat, "lon": lon, "sighted_at": sighted_at })
}

#[tokio::test]
async fn index_is_public() {
  let (app, _n) = app().await;
  let (status, body) = call(&app, "GET", "/", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["service"], "tigerwatch");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
  let (app, _n) = app().await;
  let (status, body) = call(&app, "GET", "/nope", None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn registration_hides_hash_and_rejects_duplicates() {
  let (app, _n) = app().await;
  let user = json!({ "username": "alice", "email": "alice@example.com", "password": "pw" });

  let (status, body) = call(&app, "POST", "/api/v1/users", None, Some(user.clone())).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["username"], "alice");
  assert!(body.get("password_hash").is_none());

  let (status, body) = call(&app, "POST", "/api/v1/users", None, Some(user)).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
  let (app, _n) = app().await;
  signup(&app, "alice").await;
  let (status, _) = call(
    &app,
    "POST",
    "/api/v1/auth/login",
    None,
    Some(json!({ "username": "alice", "password": "nope" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
  let (app, _n) = app().await;
  let (status, body) = call(&app, "GET", "/api/v1/tigers", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], "missing bearer token");

  let (status, _) = call(&app, "GET", "/api/v1/tigers", Some("not.a.jwt"), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
  let (app, _n) = app().await;
  let req = Request::builder()
    .method("POST")
    .uri("/api/v1/users")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tigers_are_created_and_paged() {
  let (app, _n) = app().await;
  let token = signup(&app, "alice").await;
  create_tiger(&app, &token).await;
  create_tiger(&app, &token).await;

  let (status, body) = call(&app, "GET", "/api/v1/tigers?page=2&per_page=1", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["page"], 2);
  assert_eq!(body["tigers"].as_array().unwrap().len(), 1);

  let (status, _) = call(&app, "GET", "/api/v1/tigers?page=0", Some(&token), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_tiger_name_is_a_bad_request() {
  let (app, _n) = app().await;
  let token = signup(&app, "alice").await;
  let (status, _) = call(
    &app,
    "POST",
    "/api/v1/tigers",
    Some(&token),
    Some(json!({
      "name": " ",
      "date_of_birth": "2018-05-17",
      "last_seen_at": "2024-01-01T00:00:00Z",
      "last_seen_lat": 1.2,
      "last_seen_lon": 2.2,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sighting_flow() {
  let (app, notifications) = app().await;
  let alice = signup(&app, "alice").await;
  let bob = signup(&app, "bob").await;
  let tiger_id = create_tiger(&app, &alice).await;

  let (status, first) = call(
    &app,
    "POST",
    "/api/v1/sightings",
    Some(&alice),
    Some(sighting_body(tiger_id, 1.2, 2.2, "2024-01-01T00:00:00Z")),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{first}");
  assert!(first["id"].as_str().unwrap().parse::<uuid::Uuid>().is_ok());

  // ~110 m away: same tiger, already reported.
  let (status, body) = call(
    &app,
    "POST",
    "/api/v1/sightings",
    Some(&bob),
    Some(sighting_body(tiger_id, 1.201, 2.2, "2024-01-01T01:00:00Z")),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert!(body["error"].as_str().unwrap().contains("already reported"));

  let (status, _) = call(
    &app,
    "POST",
    "/api/v1/sightings",
    Some(&bob),
    Some(sighting_body(tiger_id, 1.5, 2.5, "2024-01-01T02:00:00Z")),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let uri = format!("/api/v1/tigers/{tiger_id}/sightings?page=1&per_page=10");
  let (status, body) = call(&app, "GET", &uri, Some(&alice), None).await;
  assert_eq!(status, StatusCode::OK);
  let listed = body["sightings"].as_array().unwrap();
  assert_eq!(listed.len(), 2);
  assert_eq!(listed[0]["lat"], 1.5);
  assert_eq!(listed[1]["id"], first["id"]);

  // Bob's report notified Alice.
  let report = notifications.stop(true).await;
  assert_eq!(report.delivery.delivered, 1);
}

#[tokio::test]
async fn invalid_sighting_input_is_a_bad_request() {
  let (app, _n) = app().await;
  let token = signup(&app, "alice").await;
  let tiger_id = create_tiger(&app, &token).await;

  for body in [
    sighting_body(tiger_id, 1.2, 2.2, "not-a-date"),
    sighting_body(tiger_id, 95.0, 2.2, "2024-01-01T00:00:00Z"),
    sighting_body(tiger_id + 100, 1.2, 2.2, "2024-01-01T00:00:00Z"),
  ] {
    let (status, body) = call(&app, "POST", "/api/v1/sightings", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
  }
}

#[tokio::test]
async fn reported_sighted_at_matches_the_listed_one() {
  let (app, _n) = app().await;
  let token = signup(&app, "alice").await;
  let tiger_id = create_tiger(&app, &token).await;

  let (status, created) = call(
    &app,
    "POST",
    "/api/v1/sightings",
    Some(&token),
    Some(sighting_body(tiger_id, 1.2, 2.2, "2024-01-01T00:00:00.123456789Z")),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{created}");

  let uri = format!("/api/v1/tigers/{tiger_id}/sightings");
  let (_, body) = call(&app, "GET", &uri, Some(&token), None).await;
  let listed = &body["sightings"][0];
  assert_eq!(listed["id"], created["id"]);
  assert_eq!(listed["sighted_at"], created["sighted_at"]);
}

#[test]
fn out_of_range_settings_are_rejected() {
  for hours in [0, -1, i64::MAX] {
    let config = ServerConfig { token_ttl_hours: hours, ..config() };
    assert!(config.token_ttl().is_err(), "token_ttl_hours = {hours}");
  }
  assert_eq!(config().token_ttl().unwrap(), chrono::Duration::hours(1));

  let config = ServerConfig { request_timeout_secs: 0, ..config() };
  assert!(config.request_timeout().is_err());
}

