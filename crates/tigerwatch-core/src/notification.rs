//! Outbound notification messages.
//!
//! Notifications are ephemeral: they are built per recipient, handed to the
//! notification queue, consumed once by a worker and then discarded.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{sighting::Sighting, tiger::TigerId};

/// The fixed set of notification subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSubject {
  TigerSighting,
}

impl NotificationSubject {
  /// The human-readable subject line.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::TigerSighting => "Tiger Sighting Email",
    }
  }
}

impl fmt::Display for NotificationSubject {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Body of a tiger-sighting email: the tiger and where it was just seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TigerSightingEmail {
  pub tiger_id:    TigerId,
  pub sighting_id: Uuid,
  pub lat:         f64,
  pub lon:         f64,
  pub sighted_at:  DateTime<Utc>,
}

impl From<&Sighting> for TigerSightingEmail {
  fn from(s: &Sighting) -> Self {
    Self {
      tiger_id:    s.tiger_id,
      sighting_id: s.id,
      lat:         s.lat,
      lon:         s.lon,
      sighted_at:  s.sighted_at,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum NotificationPayload {
  TigerSighting(TigerSightingEmail),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
  pub subject: NotificationSubject,
  /// Recipient.
  pub user_id: Uuid,
  pub payload: NotificationPayload,
}

impl Notification {
  pub fn tiger_sighting(user_id: Uuid, email: TigerSightingEmail) -> Self {
    Self {
      subject: NotificationSubject::TigerSighting,
      user_id,
      payload: NotificationPayload::TigerSighting(email),
    }
  }

  pub fn tiger_id(&self) -> TigerId {
    match &self.payload {
      NotificationPayload::TigerSighting(e) => e.tiger_id,
    }
  }
}
