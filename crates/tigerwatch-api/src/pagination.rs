use serde::Deserialize;

use crate::error::ApiError;

/// `?page=&per_page=` query parameters. Pages start at 1.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
  #[serde(default = "first_page")]
  pub page:     usize,
  #[serde(default = "default_per_page")]
  pub per_page: usize,
}

fn first_page() -> usize { 1 }

fn default_per_page() -> usize { 20 }

impl PageParams {
  /// `(limit, offset)` for the store.
  pub fn window(&self) -> Result<(usize, usize), ApiError> {
    if self.page == 0 {
      return Err(ApiError::BadRequest("page must be at least 1".into()));
    }
    if self.per_page == 0 {
      return Err(ApiError::BadRequest("per_page must be at least 1".into()));
    }
    let offset = (self.page - 1)
      .checked_mul(self.per_page)
      .ok_or_else(|| ApiError::BadRequest("page out of range".into()))?;
    Ok((self.per_page, offset))
  }
}
