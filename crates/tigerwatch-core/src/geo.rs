//! Great-circle distance and the proximity filter used for sighting dedup.
//!
//! Distances are computed with the haversine formula on a spherical earth.
//! Planar distance over raw degrees is wrong here: a degree of longitude
//! shrinks towards the poles.

use serde::{Deserialize, Serialize};
use crate::{
  Error, Result,
  sighting::Sighting,
  store::{SightingQuery, SightingStore},
  tiger::TigerId,
};

/// Mean earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Two reports of the same tiger closer than this are treated as duplicates.
pub const DEFAULT_SIGHTING_RANGE_METERS: f64 = 5_000.0;

// ─── Points and radii ────────────────────────────────────────────────────────

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
  pub lat: f64,
  pub lon: f64,
}

impl GeoPoint {
  /// Build a point, rejecting non-finite or out-of-range coordinates.
  pub fn new(lat: f64, lon: f64) -> Result<Self> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
      return Err(Error::InvalidLatitude(lat));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
      return Err(Error::InvalidLongitude(lon));
    }
    Ok(Self { lat, lon })
  }

  pub fn distance_to(&self, other: &GeoPoint) -> f64 {
    haversine_meters(*self, *other)
  }
}

/// A strictly positive distance in meters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Radius(f64);

impl Radius {
  pub fn new(meters: f64) -> Result<Self> {
    if meters.is_finite() && meters > 0.0 {
      Ok(Self(meters))
    } else {
      Err(Error::InvalidRadius(meters))
    }
  }

  pub fn meters(self) -> f64 { self.0 }
}

impl Default for Radius {
  fn default() -> Self { Self(DEFAULT_SIGHTING_RANGE_METERS) }
}

impl<'de> Deserialize<'de> for Radius {
  fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let meters = f64::deserialize(d)?;
    Radius::new(meters).map_err(serde::de::Error::custom)
  }
}

// ─── Distance ────────────────────────────────────────────────────────────────

/// Great-circle distance between two points, in meters.
pub fn haversine_meters(a: GeoPoint, b: GeoPoint) -> f64 {
  let (lat_a, lat_b) = (a.lat.to_radians(), b.lat.to_radians());
  let d_lat = lat_b - lat_a;
  let d_lon = (b.lon - a.lon).to_radians();

  let h = (d_lat / 2.0).sin().powi(2)
    + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

  // Rounding can push `h` a hair above 1 for antipodal points.
  2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// `true` if `point` lies strictly inside `radius` around `center`.
pub fn is_within(center: GeoPoint, radius: Radius, point: GeoPoint) -> bool {
  haversine_meters(center, point) < radius.meters()
}

// ─── Proximity filter ────────────────────────────────────────────────────────

/// Ask the store for every sighting of `tiger_id` strictly inside `radius`
/// of `center`. An empty result is not an error.
pub async fn find_nearby_sightings<S: SightingStore>(
  store: &S,
  tiger_id: TigerId,
  center: GeoPoint,
  radius: Radius,
) -> Result<Vec<Sighting>, S::Error> {
  let query = SightingQuery::for_tiger(tiger_id).near(center, radius);
  store.query_sightings(&query).await
}
