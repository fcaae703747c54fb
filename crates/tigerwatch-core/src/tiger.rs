//! Tiger: the animal whose sightings are tracked.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Tigers are keyed by a store-assigned integer.
pub type TigerId = i64;

/// A tiger record. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tiger {
  pub id:            TigerId,
  pub name:          String,
  pub date_of_birth: NaiveDate,
  pub last_seen_at:  DateTime<Utc>,
  pub last_seen_lat: f64,
  pub last_seen_lon: f64,
  /// Server-assigned timestamp.
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::TigerStore::create_tiger`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTiger {
  pub name:          String,
  pub date_of_birth: NaiveDate,
  pub last_seen_at:  DateTime<Utc>,
  pub last_seen_lat: f64,
  pub last_seen_lon: f64,
}
