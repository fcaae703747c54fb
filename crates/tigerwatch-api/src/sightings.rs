//! Handlers for sighting endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/sightings` | Body: `{"tiger_id","lat","lon","sighted_at","image_url"?}`; 409 if already reported nearby |
//! | `GET`  | `/tigers/{tiger_id}/sightings` | `?page=&per_page=`; newest first |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use serde::Serialize;
use tigerwatch_core::{sighting::Sighting, tiger::TigerId};
use tigerwatch_service::ReportSightingRequest;

use crate::{AppState, AppStore, auth::AuthenticatedUser, error::ApiError, pagination::PageParams};

/// `POST /sightings`
pub async fn report<S: AppStore>(
  State(state): State<AppState<S>>,
  user: AuthenticatedUser,
  body: Result<Json<ReportSightingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(req) = body?;
  let sighting = state.sightings.report_sighting(&state.context(user), req).await?;
  Ok((StatusCode::CREATED, Json(sighting)))
}

#[derive(Debug, Serialize)]
pub struct SightingPage {
  pub sightings: Vec<Sighting>,
  pub page:      usize,
  pub per_page:  usize,
}

/// `GET /tigers/{tiger_id}/sightings[?page=&per_page=]`
pub async fn list<S: AppStore>(
  State(state): State<AppState<S>>,
  user: AuthenticatedUser,
  tiger_id: Result<Path<TigerId>, PathRejection>,
  params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<SightingPage>, ApiError> {
  let Path(tiger_id) = tiger_id?;
  let Query(params) = params?;
  let (limit, offset) = params.window()?;
  let sightings = state
    .sightings
    .get_sightings(&state.context(user), tiger_id, Some(limit), offset)
    .await?;
  Ok(Json(SightingPage { sightings, page: params.page, per_page: params.per_page }))
}
