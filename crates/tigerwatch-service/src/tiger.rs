//! The tiger catalogue.

use std::sync::Arc;

use tigerwatch_core::{
  geo::GeoPoint,
  store::TigerStore,
  tiger::{NewTiger, Tiger},
};

use crate::TigerError;

pub struct TigerService<S> {
  store: Arc<S>,
}

impl<S> Clone for TigerService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: TigerStore> TigerService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn create_tiger(&self, mut input: NewTiger) -> Result<Tiger, TigerError> {
    input.name = input.name.trim().to_owned();
    if input.name.is_empty() {
      return Err(TigerError::Validation("name must not be blank".into()));
    }
    GeoPoint::new(input.last_seen_lat, input.last_seen_lon)
      .map_err(|e| TigerError::Validation(e.to_string()))?;

    let tiger = self
      .store
      .create_tiger(input)
      .await
      .map_err(|e| TigerError::Store(Box::new(e)))?;
    tracing::info!(tiger_id = tiger.id, name = %tiger.name, "created tiger");
    Ok(tiger)
  }

  /// Most recently seen first.
  pub async fn list_tigers(&self, limit: usize, offset: usize) -> Result<Vec<Tiger>, TigerError> {
    self
      .store
      .list_tigers(Some(limit), offset)
      .await
      .map_err(|e| TigerError::Store(Box::new(e)))
  }
}
