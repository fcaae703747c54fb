//! Error types for `tigerwatch-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("latitude {0} is outside [-90, 90]")]
  InvalidLatitude(f64),

  #[error("longitude {0} is outside [-180, 180]")]
  InvalidLongitude(f64),

  #[error("radius must be a positive number of meters, got {0}")]
  InvalidRadius(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
