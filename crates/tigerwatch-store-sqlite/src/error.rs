//! Error type for `tigerwatch-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] tigerwatch_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A UNIQUE, NOT NULL or FOREIGN KEY constraint rejected a write.
  #[error("constraint violation: {0}")]
  Constraint(String),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  /// Classify a write failure, separating constraint violations from I/O.
  pub(crate) fn from_write(e: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
      failure,
      msg,
    )) = &e
      && failure.code == rusqlite::ErrorCode::ConstraintViolation
    {
      return Error::Constraint(
        msg.clone().unwrap_or_else(|| failure.to_string()),
      );
    }
    Error::Database(e)
  }

  pub fn is_constraint_violation(&self) -> bool {
    matches!(self, Error::Constraint(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
