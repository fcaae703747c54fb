//! Error types for every service operation.

use thiserror::Error;
use tigerwatch_core::tiger::TigerId;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a notification fan-out.
#[derive(Debug, Error)]
pub enum NotifyError {
  #[error("no authenticated user in request context")]
  MissingAuthenticatedUser,

  #[error(transparent)]
  Queue(#[from] tigerwatch_notify::Error),

  #[error("notification submission task failed: {0}")]
  Submission(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum ReportSightingError {
  #[error("invalid sighted_at timestamp {value:?}: {source}")]
  InvalidTimestamp {
    value:  String,
    #[source]
    source: chrono::ParseError,
  },

  #[error("invalid coordinates: {0}")]
  InvalidCoordinates(#[source] tigerwatch_core::Error),

  #[error("image_url must not be blank")]
  InvalidImageUrl,

  #[error("no authenticated user in request context")]
  MissingAuthenticatedUser,

  #[error("request cancelled")]
  Cancelled,

  #[error("tiger {0} does not exist")]
  TigerDoesNotExist(TigerId),

  #[error("fetching tiger details failed")]
  FetchingTigerDetailsFailed(#[source] BoxError),

  #[error("fetching existing sightings failed")]
  FetchingExistingSightingsFailed(#[source] BoxError),

  #[error("tiger {tiger_id} was already reported within {radius_meters} m")]
  SightingAlreadyReported {
    tiger_id:      TigerId,
    radius_meters: f64,
    /// How many earlier sightings fall inside the radius.
    nearby:        usize,
  },

  #[error("persisting sighting failed")]
  Persistence(#[source] BoxError),

  #[error("sending email notification failed")]
  SendingEmailNotificationFailed(#[source] NotifyError),
}

impl From<crate::Cancelled> for ReportSightingError {
  fn from(_: crate::Cancelled) -> Self { Self::Cancelled }
}

#[derive(Debug, Error)]
pub enum ListSightingsError {
  #[error("request cancelled")]
  Cancelled,

  #[error("fetching sightings failed")]
  Store(#[source] BoxError),
}

impl From<crate::Cancelled> for ListSightingsError {
  fn from(_: crate::Cancelled) -> Self { Self::Cancelled }
}

#[derive(Debug, Error)]
pub enum TigerError {
  #[error("{0}")]
  Validation(String),

  #[error("tiger store error")]
  Store(#[source] BoxError),
}

#[derive(Debug, Error)]
pub enum AccountError {
  #[error("{0}")]
  Validation(String),

  #[error("a user with that username or email already exists")]
  UserAlreadyExists,

  #[error("invalid username or password")]
  InvalidCredentials,

  #[error("invalid or expired token")]
  InvalidToken,

  #[error("password hashing failed: {0}")]
  Hashing(String),

  #[error("token signing failed")]
  Token(#[from] jsonwebtoken::errors::Error),

  #[error("user store error")]
  Store(#[source] BoxError),
}
