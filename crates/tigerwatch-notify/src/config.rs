//! Notification settings, read from the `[notifications]` config table.

use serde::Deserialize;

use crate::{Error, Result};

/// Who receives a fan-out notification for a new sighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientPolicy {
  /// One notification per prior sighting row. A user who reported the
  /// tiger three times gets three notifications.
  #[default]
  PerSighting,
  /// One notification per distinct prior reporter.
  DistinctReporter,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
  /// Number of worker tasks draining the queue.
  pub workers:                    usize,
  /// Queue buffer size. Producers block while the buffer is full.
  pub queue_capacity:             usize,
  /// Upper bound on concurrent queue submissions per fan-out.
  pub max_concurrent_submissions: usize,
  /// Artificial latency of the simulated mailer.
  pub delivery_delay_ms:          u64,
  pub recipient_policy:           RecipientPolicy,
}

impl Default for NotificationConfig {
  fn default() -> Self {
    Self {
      workers:                    1,
      queue_capacity:             1,
      max_concurrent_submissions: 16,
      delivery_delay_ms:          1000,
      recipient_policy:           RecipientPolicy::PerSighting,
    }
  }
}

impl NotificationConfig {
  pub fn validate(&self) -> Result<()> {
    if self.workers == 0 {
      return Err(Error::InvalidConfig("workers must be at least 1".into()));
    }
    if self.queue_capacity == 0 {
      return Err(Error::InvalidConfig(
        "queue_capacity must be at least 1".into(),
      ));
    }
    if self.max_concurrent_submissions == 0 {
      return Err(Error::InvalidConfig(
        "max_concurrent_submissions must be at least 1".into(),
      ));
    }
    Ok(())
  }
}
