//! [`SqliteStore`], the SQLite implementation of the tigerwatch store traits.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tigerwatch_core::{
  geo::GeoPoint,
  sighting::Sighting,
  store::{SightingQuery, SightingStore, Store, TigerStore, UserStore},
  tiger::{NewTiger, Tiger, TigerId},
  user::{NewUser, User},
};

use crate::{
  Error, Result,
  encode::{RawSighting, RawTiger, RawUser, encode_date, encode_dt, encode_uuid},
  geo,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tigerwatch store backed by a single SQLite file.
///
/// Clones share one reference-counted connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  async fn init(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        geo::register(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

impl Store for SqliteStore {
  type Error = Error;
}

// ─── TigerStore impl ─────────────────────────────────────────────────────────

impl TigerStore for SqliteStore {
  async fn create_tiger(&self, input: NewTiger) -> Result<Tiger> {
    GeoPoint::new(input.last_seen_lat, input.last_seen_lon)?;

    let created_at = Utc::now();
    let name       = input.name.clone();
    let dob_str    = encode_date(input.date_of_birth);
    let seen_str   = encode_dt(input.last_seen_at);
    let lat        = input.last_seen_lat;
    let lon        = input.last_seen_lon;
    let at_str     = encode_dt(created_at);

    let id: TigerId = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tigers (
             name, date_of_birth, last_seen_at, last_seen_lat, last_seen_lon, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![name, dob_str, seen_str, lat, lon, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::from_write)?;

    Ok(Tiger {
      id,
      name: input.name,
      date_of_birth: input.date_of_birth,
      last_seen_at: input.last_seen_at,
      last_seen_lat: input.last_seen_lat,
      last_seen_lon: input.last_seen_lon,
      created_at,
    })
  }

  async fn get_tiger(&self, id: TigerId) -> Result<Option<Tiger>> {
    let raw: Option<RawTiger> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM tigers WHERE tiger_id = ?1", RawTiger::COLUMNS),
            rusqlite::params![id],
            RawTiger::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTiger::into_tiger).transpose()
  }

  async fn list_tigers(&self, limit: Option<usize>, offset: usize) -> Result<Vec<Tiger>> {
    let limit_val  = sql_limit(limit);
    let offset_val = offset as i64;

    let raws: Vec<RawTiger> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM tigers
           ORDER BY last_seen_at DESC, tiger_id DESC
           LIMIT ?1 OFFSET ?2",
          RawTiger::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val, offset_val], RawTiger::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTiger::into_tiger).collect()
  }
}

// ─── SightingStore impl ──────────────────────────────────────────────────────

impl SightingStore for SqliteStore {
  async fn insert_sighting(&self, sighting: &Sighting) -> Result<()> {
    let id_str       = encode_uuid(sighting.id);
    let tiger_id     = sighting.tiger_id;
    let reporter_str = encode_uuid(sighting.reported_by_user_id);
    let lat          = sighting.lat;
    let lon          = sighting.lon;
    let sighted_str  = encode_dt(sighting.sighted_at);
    let image_url    = sighting.image_url.clone();
    let recorded_str = encode_dt(sighting.recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sightings (
             sighting_id, tiger_id, reported_by_user_id,
             lat, lon, sighted_at, image_url, recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            tiger_id,
            reporter_str,
            lat,
            lon,
            sighted_str,
            image_url,
            recorded_str,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::from_write)?;
    Ok(())
  }

  async fn query_sightings(&self, query: &SightingQuery) -> Result<Vec<Sighting>> {
    let tiger_id     = query.tiger_id;
    let center_lat   = query.near.map(|(c, _)| c.lat);
    let center_lon   = query.near.map(|(c, _)| c.lon);
    let radius_m     = query.near.map(|(_, r)| r.meters());
    let excluded_str = query.exclude_user_id.map(encode_uuid);
    let limit_val    = sql_limit(query.limit);
    let offset_val   = query.offset as i64;

    let raws: Vec<RawSighting> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {columns} FROM sightings
           WHERE tiger_id = ?1
             AND (?4 IS NULL OR {haversine}(lat, lon, ?2, ?3) < ?4)
             AND (?5 IS NULL OR reported_by_user_id != ?5)
           ORDER BY sighted_at DESC, recorded_at DESC
           LIMIT ?6 OFFSET ?7",
          columns   = RawSighting::COLUMNS,
          haversine = geo::HAVERSINE_FN,
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              tiger_id,
              center_lat,
              center_lon,
              radius_m,
              excluded_str,
              limit_val,
              offset_val,
            ],
            RawSighting::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSighting::into_sighting).collect()
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  async fn create_user(&self, input: NewUser) -> Result<User> {
    let created_at = Utc::now();

    let id_str   = encode_uuid(input.user_id);
    let username = input.username.clone();
    let email    = input.email.clone();
    let hash     = input.password_hash.clone();
    let at_str   = encode_dt(created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, username, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, username, email, hash, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::from_write)?;

    Ok(User {
      user_id: input.user_id,
      username: input.username,
      email: input.email,
      password_hash: input.password_hash,
      created_at,
    })
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let username = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM users WHERE username = ?1", RawUser::COLUMNS),
            rusqlite::params![username],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_username_or_email(
    &self,
    username: &str,
    email:    &str,
  ) -> Result<Option<User>> {
    let username = username.to_owned();
    let email    = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM users WHERE username = ?1 OR email = ?2 LIMIT 1",
              RawUser::COLUMNS
            ),
            rusqlite::params![username, email],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}

/// SQLite treats a negative LIMIT as "no limit".
fn sql_limit(limit: Option<usize>) -> i64 {
  limit.map(|l| l as i64).unwrap_or(-1)
}
