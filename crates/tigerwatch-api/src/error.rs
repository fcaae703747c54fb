//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tigerwatch_service::{
  AccountError, ListSightingsError, ReportSightingError, TigerError,
};

/// An error returned by an API handler. Rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("timed out: {0}")]
  Timeout(String),

  /// The cause is logged, never sent to the client.
  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
      ApiError::Timeout(m) => (StatusCode::SERVICE_UNAVAILABLE, m),
      ApiError::Unauthorized(m) => {
        let mut res = (StatusCode::UNAUTHORIZED, Json(json!({ "error": m }))).into_response();
        res
          .headers_mut()
          .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        return res;
      }
      ApiError::Internal(e) => {
        tracing::error!(error = %e, source = ?e.source(), "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

impl From<ReportSightingError> for ApiError {
  fn from(e: ReportSightingError) -> Self {
    use ReportSightingError as E;
    match e {
      E::InvalidTimestamp { .. }
      | E::InvalidCoordinates(_)
      | E::InvalidImageUrl
      | E::TigerDoesNotExist(_) => ApiError::BadRequest(e.to_string()),
      E::SightingAlreadyReported { .. } => ApiError::Conflict(e.to_string()),
      E::Cancelled => ApiError::Timeout(e.to_string()),
      E::MissingAuthenticatedUser
      | E::FetchingTigerDetailsFailed(_)
      | E::FetchingExistingSightingsFailed(_)
      | E::Persistence(_)
      | E::SendingEmailNotificationFailed(_) => ApiError::Internal(Box::new(e)),
    }
  }
}

impl From<ListSightingsError> for ApiError {
  fn from(e: ListSightingsError) -> Self {
    match e {
      ListSightingsError::Cancelled => ApiError::Timeout(e.to_string()),
      ListSightingsError::Store(_) => ApiError::Internal(Box::new(e)),
    }
  }
}

impl From<TigerError> for ApiError {
  fn from(e: TigerError) -> Self {
    match e {
      TigerError::Validation(m) => ApiError::BadRequest(m),
      TigerError::Store(_) => ApiError::Internal(Box::new(e)),
    }
  }
}

impl From<AccountError> for ApiError {
  fn from(e: AccountError) -> Self {
    match e {
      AccountError::Validation(m) => ApiError::BadRequest(m),
      AccountError::UserAlreadyExists => ApiError::Conflict(e.to_string()),
      AccountError::InvalidCredentials | AccountError::InvalidToken => {
        ApiError::Unauthorized(e.to_string())
      }
      AccountError::Hashing(_) | AccountError::Token(_) | AccountError::Store(_) => {
        ApiError::Internal(Box::new(e))
      }
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self { ApiError::BadRequest(e.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(e: QueryRejection) -> Self { ApiError::BadRequest(e.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(e: PathRejection) -> Self { ApiError::BadRequest(e.body_text()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn abandoned_work_is_service_unavailable() {
    let res = ApiError::from(ReportSightingError::Cancelled).into_response();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let res = ApiError::from(ListSightingsError::Cancelled).into_response();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
  }
}
