//! Sighting: a geotagged, timestamped report that a tiger was observed.
//!
//! Sightings are append-only: no update or delete exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{geo::GeoPoint, tiger::TigerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
  /// Generated by the caller before insertion.
  pub id:                  Uuid,
  pub tiger_id:            TigerId,
  pub reported_by_user_id: Uuid,
  pub lat:                 f64,
  pub lon:                 f64,
  /// When the tiger was observed, as reported by the user.
  pub sighted_at:          DateTime<Utc>,
  pub image_url:           Option<String>,
  /// When the report reached the server.
  pub recorded_at:         DateTime<Utc>,
}

impl Sighting {
  pub fn point(&self) -> GeoPoint { GeoPoint { lat: self.lat, lon: self.lon } }
}
