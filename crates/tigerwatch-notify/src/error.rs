use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("notification queue is closed")]
  QueueClosed,

  #[error("notification service already started")]
  AlreadyStarted,

  #[error("invalid notification config: {0}")]
  InvalidConfig(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
