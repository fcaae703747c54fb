//! The sighting report pipeline.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use serde::Deserialize;
use tigerwatch_core::{
  geo::{self, GeoPoint, Radius},
  notification::TigerSightingEmail,
  sighting::Sighting,
  store::{SightingQuery, SightingStore, TigerStore},
  tiger::TigerId,
};
use uuid::Uuid;

use crate::{
  ListSightingsError, ReportSightingError, RequestContext, SightingNotifier,
  locks::KeyedLocks,
};

/// A sighting as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSightingRequest {
  pub tiger_id:   TigerId,
  pub lat:        f64,
  pub lon:        f64,
  /// RFC 3339.
  pub sighted_at: String,
  #[serde(default)]
  pub image_url:  Option<String>,
}

pub struct SightingService<S> {
  store:    Arc<S>,
  notifier: SightingNotifier,
  radius:   Radius,
  locks:    KeyedLocks<TigerId>,
}

impl<S> SightingService<S>
where
  S: TigerStore + SightingStore,
{
  pub fn new(store: Arc<S>, notifier: SightingNotifier, radius: Radius) -> Self {
    Self { store, notifier, radius, locks: KeyedLocks::new() }
  }

  /// Record a new sighting and notify everyone who reported the tiger before.
  ///
  /// Rejected with [`ReportSightingError::SightingAlreadyReported`] when an
  /// earlier sighting of the same tiger lies strictly inside the dedup
  /// radius; nothing is stored or sent in that case. Checks and insert are
  /// serialised per tiger. A failed fan-out does not undo the insert.
  pub async fn report_sighting(
    &self,
    ctx: &RequestContext,
    req: ReportSightingRequest,
  ) -> Result<Sighting, ReportSightingError> {
    let user_id = ctx.user_id().ok_or(ReportSightingError::MissingAuthenticatedUser)?;
    let sighted_at = DateTime::parse_from_rfc3339(&req.sighted_at)
      .map_err(|source| ReportSightingError::InvalidTimestamp {
        value: req.sighted_at.clone(),
        source,
      })?
      .with_timezone(&Utc)
      .trunc_subsecs(6);
    let point = GeoPoint::new(req.lat, req.lon).map_err(ReportSightingError::InvalidCoordinates)?;
    let image_url = match req.image_url {
      Some(url) if url.trim().is_empty() => return Err(ReportSightingError::InvalidImageUrl),
      other => other,
    };
    let tiger_id = req.tiger_id;

    let guard = self.locks.lock(tiger_id).await;

    let tiger = ctx
      .guard(self.store.get_tiger(tiger_id))
      .await?
      .map_err(|e| {
        tracing::error!(tiger_id, error = %e, "fetching tiger failed");
        ReportSightingError::FetchingTigerDetailsFailed(Box::new(e))
      })?;
    if tiger.is_none() {
      return Err(ReportSightingError::TigerDoesNotExist(tiger_id));
    }

    let nearby = ctx
      .guard(geo::find_nearby_sightings(&*self.store, tiger_id, point, self.radius))
      .await?
      .map_err(|e| {
        tracing::error!(tiger_id, lat = point.lat, lon = point.lon, error = %e, "fetching nearby sightings failed");
        ReportSightingError::FetchingExistingSightingsFailed(Box::new(e))
      })?
      .len();
    if nearby > 0 {
      tracing::info!(tiger_id, lat = point.lat, lon = point.lon, nearby, "sighting already reported nearby");
      return Err(ReportSightingError::SightingAlreadyReported {
        tiger_id,
        radius_meters: self.radius.meters(),
        nearby,
      });
    }

    // Read before the insert so the new row is not its own recipient.
    let earlier = ctx
      .guard(
        self
          .store
          .query_sightings(&SightingQuery::for_tiger(tiger_id).excluding_user(user_id)),
      )
      .await?
      .map_err(|e| {
        tracing::error!(tiger_id, error = %e, "fetching earlier reporters failed");
        ReportSightingError::FetchingExistingSightingsFailed(Box::new(e))
      })?;

    let sighting = Sighting {
      id: Uuid::new_v4(),
      tiger_id,
      reported_by_user_id: user_id,
      lat: point.lat,
      lon: point.lon,
      sighted_at,
      image_url,
      recorded_at: Utc::now(),
    };
    self.store.insert_sighting(&sighting).await.map_err(|e| {
      tracing::error!(tiger_id, lat = point.lat, lon = point.lon, error = %e, "persisting sighting failed");
      ReportSightingError::Persistence(Box::new(e))
    })?;
    drop(guard);

    tracing::info!(tiger_id, sighting_id = %sighting.id, user_id = %user_id, "sighting reported");

    self
      .notifier
      .report_sighting_to_all_users(ctx, TigerSightingEmail::from(&sighting), &earlier)
      .await
      .map_err(|e| {
        tracing::error!(tiger_id, sighting_id = %sighting.id, error = %e, "sighting notification failed");
        ReportSightingError::SendingEmailNotificationFailed(e)
      })?;

    Ok(sighting)
  }

  /// Sightings of `tiger_id`, newest first. `limit: None` means all.
  pub async fn get_sightings(
    &self,
    ctx:      &RequestContext,
    tiger_id: TigerId,
    limit:    Option<usize>,
    offset:   usize,
  ) -> Result<Vec<Sighting>, ListSightingsError> {
    let mut query = SightingQuery::for_tiger(tiger_id);
    query.limit = limit;
    query.offset = offset;

    ctx
      .guard(self.store.query_sightings(&query))
      .await?
      .map_err(|e| {
        tracing::error!(tiger_id, error = %e, "listing sightings failed");
        ListSightingsError::Store(Box::new(e))
      })
  }
}
