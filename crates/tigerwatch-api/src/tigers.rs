//! Handlers for `/tigers` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/tigers` | Body: `{"name","date_of_birth","last_seen_at","last_seen_lat","last_seen_lon"}` |
//! | `GET`  | `/tigers` | `?page=&per_page=`; most recently seen first |

use axum::{
  Json,
  extract::{Query, State, rejection::{JsonRejection, QueryRejection}},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Serialize;
use tigerwatch_core::tiger::{NewTiger, Tiger};

use crate::{AppState, AppStore, auth::AuthenticatedUser, error::ApiError, pagination::PageParams};

/// `POST /tigers`
pub async fn create<S: AppStore>(
  State(state): State<AppState<S>>,
  AuthenticatedUser(user_id): AuthenticatedUser,
  body: Result<Json<NewTiger>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = body?;
  let tiger = state.tigers.create_tiger(input).await?;
  tracing::debug!(tiger_id = tiger.id, user_id = %user_id, "tiger created via api");
  Ok((StatusCode::CREATED, Json(tiger)))
}

#[derive(Debug, Serialize)]
pub struct TigerPage {
  pub tigers:   Vec<Tiger>,
  pub page:     usize,
  pub per_page: usize,
}

/// `GET /tigers[?page=&per_page=]`
pub async fn list<S: AppStore>(
  State(state): State<AppState<S>>,
  _user: AuthenticatedUser,
  params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<TigerPage>, ApiError> {
  let Query(params) = params?;
  let (limit, offset) = params.window()?;
  let tigers = state.tigers.list_tigers(limit, offset).await?;
  Ok(Json(TigerPage { tigers, page: params.page, per_page: params.per_page }))
}
