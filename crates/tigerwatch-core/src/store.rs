//! Store traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g.
//! `tigerwatch-store-sqlite`). Higher layers depend on these abstractions,
//! not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  geo::{GeoPoint, Radius},
  sighting::Sighting,
  tiger::{NewTiger, Tiger, TigerId},
  user::{NewUser, User},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`SightingStore::query_sightings`].
///
/// Results are always ordered by `sighted_at`, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct SightingQuery {
  pub tiger_id:        TigerId,
  /// Keep only sightings strictly inside this circle.
  pub near:            Option<(GeoPoint, Radius)>,
  /// Drop sightings reported by this user.
  pub exclude_user_id: Option<Uuid>,
  /// `None` means no limit. `Some(0)` returns nothing.
  pub limit:           Option<usize>,
  pub offset:          usize,
}

impl SightingQuery {
  /// Every sighting of `tiger_id`, unpaginated.
  pub fn for_tiger(tiger_id: TigerId) -> Self {
    Self {
      tiger_id,
      near: None,
      exclude_user_id: None,
      limit: None,
      offset: 0,
    }
  }

  pub fn near(mut self, center: GeoPoint, radius: Radius) -> Self {
    self.near = Some((center, radius));
    self
  }

  pub fn excluding_user(mut self, user_id: Uuid) -> Self {
    self.exclude_user_id = Some(user_id);
    self
  }

  pub fn paginate(mut self, limit: usize, offset: usize) -> Self {
    self.limit = Some(limit);
    self.offset = offset;
    self
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Shared error type for every store trait a backend implements.
pub trait Store: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
}

/// Tiger records. This is the tiger lookup collaborator of sighting
/// reporting.
pub trait TigerStore: Store {
  /// Persist a new tiger; the store assigns `id` and `created_at`.
  fn create_tiger(
    &self,
    input: NewTiger,
  ) -> impl Future<Output = Result<Tiger, Self::Error>> + Send + '_;

  /// Retrieve a tiger by id. Returns `None` if not found.
  fn get_tiger(
    &self,
    id: TigerId,
  ) -> impl Future<Output = Result<Option<Tiger>, Self::Error>> + Send + '_;

  /// Tigers ordered by `last_seen_at`, most recent first.
  fn list_tigers(
    &self,
    limit: Option<usize>,
    offset: usize,
  ) -> impl Future<Output = Result<Vec<Tiger>, Self::Error>> + Send + '_;
}

/// Append-only sighting records.
pub trait SightingStore: Store {
  /// Persist a fully populated sighting. Fails if `tiger_id` does not
  /// reference an existing tiger.
  fn insert_sighting<'a>(
    &'a self,
    sighting: &'a Sighting,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Sightings matching `query`, newest `sighted_at` first.
  fn query_sightings<'a>(
    &'a self,
    query: &'a SightingQuery,
  ) -> impl Future<Output = Result<Vec<Sighting>, Self::Error>> + Send + 'a;
}

/// Registered users.
pub trait UserStore: Store {
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn find_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Any user that already owns `username` or `email`.
  fn find_user_by_username_or_email<'a>(
    &'a self,
    username: &'a str,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;
}
