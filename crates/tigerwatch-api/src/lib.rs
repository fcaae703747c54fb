//! JSON REST API for tigerwatch.
//!
//! Exposes an axum [`Router`] over any store implementing the
//! `tigerwatch-core` store traits. Everything except `/` and the account
//! endpoints requires an `Authorization: Bearer <token>` header obtained
//! from `POST /api/v1/auth/login`.

pub mod auth;
pub mod error;
pub mod pagination;
pub mod sightings;
pub mod tigers;
pub mod users;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Json, Router,
  routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tigerwatch_core::{
  geo::Radius,
  store::{SightingStore, TigerStore, UserStore},
};
use tigerwatch_notify::{NotificationConfig, Producer};
use tigerwatch_service::{
  AccountService, RequestContext, SightingNotifier, SightingService, TigerService,
};
use tower_http::trace::TraceLayer;

use crate::auth::AuthenticatedUser;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TIGERWATCH_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                   String,
  #[serde(default = "default_port")]
  pub port:                   u16,
  pub store_path:             PathBuf,
  /// HS256 signing secret for access tokens.
  pub jwt_secret:             String,
  #[serde(default = "default_token_ttl_hours")]
  pub token_ttl_hours:        i64,
  /// Store work for a request is abandoned after this many seconds.
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs:   u64,
  /// Reports of the same tiger closer than this are duplicates.
  #[serde(default)]
  pub sighting_radius_meters: Radius,
  #[serde(default)]
  pub notifications:          NotificationConfig,
}

fn default_host() -> String { "127.0.0.1".into() }

fn default_port() -> u16 { 8080 }

fn default_token_ttl_hours() -> i64 { 24 }

fn default_request_timeout_secs() -> u64 { 30 }

#[derive(Debug, Error)]
#[error("invalid configuration: {0}")]
pub struct InvalidConfig(String);

impl ServerConfig {
  pub fn token_ttl(&self) -> Result<chrono::Duration, InvalidConfig> {
    chrono::Duration::try_hours(self.token_ttl_hours)
      .filter(|ttl| *ttl > chrono::Duration::zero())
      .ok_or_else(|| {
        InvalidConfig(format!(
          "token_ttl_hours must be a positive number of hours, got {}",
          self.token_ttl_hours
        ))
      })
  }

  pub fn request_timeout(&self) -> Result<Duration, InvalidConfig> {
    match self.request_timeout_secs {
      0 => Err(InvalidConfig("request_timeout_secs must be at least 1".into())),
      secs => Ok(Duration::from_secs(secs)),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything a store backend must provide to serve the API.
pub trait AppStore: TigerStore + SightingStore + UserStore + 'static {}

impl<S: TigerStore + SightingStore + UserStore + 'static> AppStore for S {}

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub accounts:  Arc<AccountService<S>>,
  pub tigers:    TigerService<S>,
  pub sightings: Arc<SightingService<S>>,
  request_timeout: Duration,
}

impl<S> AppState<S> {
  /// The service context for a request made by `user`.
  pub fn context(&self, user: AuthenticatedUser) -> RequestContext {
    RequestContext::authenticated(user.0).with_timeout(self.request_timeout)
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      accounts:  Arc::clone(&self.accounts),
      tigers:    self.tigers.clone(),
      sightings: Arc::clone(&self.sightings),
      request_timeout: self.request_timeout,
    }
  }
}

impl<S: AppStore> AppState<S> {
  /// Wire the services over `store`, sending notifications into `producer`.
  pub fn new(
    store: Arc<S>,
    config: &ServerConfig,
    producer: Producer,
  ) -> Result<Self, InvalidConfig> {
    let notifier = SightingNotifier::new(producer, &config.notifications);
    Ok(Self {
      accounts:  Arc::new(AccountService::new(
        Arc::clone(&store),
        &config.jwt_secret,
        config.token_ttl()?,
      )),
      tigers:    TigerService::new(Arc::clone(&store)),
      sightings: Arc::new(SightingService::new(store, notifier, config.sighting_radius_meters)),
      request_timeout: config.request_timeout()?,
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: `/` plus the API under `/api/v1`.
pub fn router<S: AppStore>(state: AppState<S>) -> Router {
  let api = Router::new()
    .route("/users", post(users::register::<S>))
    .route("/auth/login", post(users::login::<S>))
    .route("/tigers", get(tigers::list::<S>).post(tigers::create::<S>))
    .route("/tigers/{tiger_id}/sightings", get(sightings::list::<S>))
    .route("/sightings", post(sightings::report::<S>));

  Router::new()
    .route("/", get(index))
    .nest("/api/v1", api)
    .fallback(not_found)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn index() -> Json<Value> {
  Json(json!({ "service": "tigerwatch", "version": env!("CARGO_PKG_VERSION") }))
}

async fn not_found() -> ApiError { ApiError::NotFound("no such route".into()) }

#[cfg(test)]
mod tests;
