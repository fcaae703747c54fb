//! Handlers for registration and login.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Body: `{"username","email","password"}`; 409 on duplicate |
//! | `POST` | `/auth/login` | Body: `{"username","password"}`; 401 on bad credentials |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tigerwatch_service::NewAccount;

use crate::{AppState, AppStore, error::ApiError};

/// `POST /users`
pub async fn register<S: AppStore>(
  State(state): State<AppState<S>>,
  body: Result<Json<NewAccount>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(account) = body?;
  let user = state.accounts.register(account).await?;
  Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub access_token: String,
  pub token_type:   &'static str,
}

/// `POST /auth/login`
pub async fn login<S: AppStore>(
  State(state): State<AppState<S>>,
  body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
  let Json(body) = body?;
  let access_token = state.accounts.login(&body.username, &body.password).await?;
  Ok(Json(LoginResponse { access_token, token_type: "Bearer" }))
}
