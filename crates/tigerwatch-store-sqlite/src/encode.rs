//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings so that text
//! ordering matches chronological ordering. Dates are `YYYY-MM-DD`. UUIDs are
//! stored as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use tigerwatch_core::{sighting::Sighting, tiger::Tiger, user::User};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `sightings` row.
pub struct RawSighting {
  pub sighting_id:         String,
  pub tiger_id:            i64,
  pub reported_by_user_id: String,
  pub lat:                 f64,
  pub lon:                 f64,
  pub sighted_at:          String,
  pub image_url:           Option<String>,
  pub recorded_at:         String,
}

impl RawSighting {
  pub const COLUMNS: &'static str = "sighting_id, tiger_id, reported_by_user_id, \
                                     lat, lon, sighted_at, image_url, recorded_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      sighting_id:         row.get(0)?,
      tiger_id:            row.get(1)?,
      reported_by_user_id: row.get(2)?,
      lat:                 row.get(3)?,
      lon:                 row.get(4)?,
      sighted_at:          row.get(5)?,
      image_url:           row.get(6)?,
      recorded_at:         row.get(7)?,
    })
  }

  pub fn into_sighting(self) -> Result<Sighting> {
    Ok(Sighting {
      id:                  decode_uuid(&self.sighting_id)?,
      tiger_id:            self.tiger_id,
      reported_by_user_id: decode_uuid(&self.reported_by_user_id)?,
      lat:                 self.lat,
      lon:                 self.lon,
      sighted_at:          decode_dt(&self.sighted_at)?,
      image_url:           self.image_url,
      recorded_at:         decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw values read directly from a `tigers` row.
pub struct RawTiger {
  pub tiger_id:      i64,
  pub name:          String,
  pub date_of_birth: String,
  pub last_seen_at:  String,
  pub last_seen_lat: f64,
  pub last_seen_lon: f64,
  pub created_at:    String,
}

impl RawTiger {
  pub const COLUMNS: &'static str = "tiger_id, name, date_of_birth, last_seen_at, \
                                     last_seen_lat, last_seen_lon, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      tiger_id:      row.get(0)?,
      name:          row.get(1)?,
      date_of_birth: row.get(2)?,
      last_seen_at:  row.get(3)?,
      last_seen_lat: row.get(4)?,
      last_seen_lon: row.get(5)?,
      created_at:    row.get(6)?,
    })
  }

  pub fn into_tiger(self) -> Result<Tiger> {
    Ok(Tiger {
      id:            self.tiger_id,
      name:          self.name,
      date_of_birth: decode_date(&self.date_of_birth)?,
      last_seen_at:  decode_dt(&self.last_seen_at)?,
      last_seen_lat: self.last_seen_lat,
      last_seen_lon: self.last_seen_lon,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub const COLUMNS: &'static str =
    "user_id, username, email, password_hash, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      username:      row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      username:      self.username,
      email:         self.email,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
