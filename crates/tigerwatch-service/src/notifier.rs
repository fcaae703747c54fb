//! Fan-out of sighting notifications to earlier reporters.

use tigerwatch_core::{
  notification::{Notification, TigerSightingEmail},
  sighting::Sighting,
};
use tigerwatch_notify::{NotificationConfig, Producer, RecipientPolicy};
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::{NotifyError, RequestContext};

#[derive(Debug, Clone)]
pub struct SightingNotifier {
  producer:       Producer,
  policy:         RecipientPolicy,
  max_concurrent: usize,
}

impl SightingNotifier {
  pub fn new(producer: Producer, config: &NotificationConfig) -> Self {
    Self {
      producer,
      policy: config.recipient_policy,
      max_concurrent: config.max_concurrent_submissions.max(1),
    }
  }

  /// Recipients for a report by `reporter`, given the tiger's earlier
  /// sightings. `reporter` never appears.
  pub fn recipients(&self, reporter: Uuid, existing: &[Sighting]) -> Vec<Uuid> {
    match self.policy {
      RecipientPolicy::PerSighting => existing
        .iter()
        .map(|s| s.reported_by_user_id)
        .filter(|id| *id != reporter)
        .collect(),
      RecipientPolicy::DistinctReporter => distinct_reporters(existing, reporter),
    }
  }

  /// Queue one notification per recipient and wait until every one has
  /// been accepted by the queue. Returns the number queued.
  ///
  /// At most `max_concurrent_submissions` sends are in flight at once. The
  /// first failed submission aborts the rest.
  pub async fn report_sighting_to_all_users(
    &self,
    ctx:      &RequestContext,
    email:    TigerSightingEmail,
    existing: &[Sighting],
  ) -> Result<usize, NotifyError> {
    let reporter = ctx.user_id().ok_or(NotifyError::MissingAuthenticatedUser)?;
    let recipients = self.recipients(reporter, existing);
    let total = recipients.len();
    let mut pending = recipients.into_iter();
    let mut in_flight = JoinSet::new();

    loop {
      while in_flight.len() < self.max_concurrent {
        let Some(user_id) = pending.next() else { break };
        let producer = self.producer.clone();
        let notification = Notification::tiger_sighting(user_id, email.clone());
        in_flight.spawn(async move { producer.send(notification).await });
      }
      match in_flight.join_next().await {
        None => break,
        Some(joined) => joined??,
      }
    }

    tracing::debug!(tiger_id = email.tiger_id, recipients = total, "queued sighting notifications");
    Ok(total)
  }
}

/// Distinct reporters among `sightings`, in first-seen order, skipping
/// `exclude`.
fn distinct_reporters(sightings: &[Sighting], exclude: Uuid) -> Vec<Uuid> {
  let mut seen = Vec::new();
  for s in sightings {
    if s.reported_by_user_id != exclude && !seen.contains(&s.reported_by_user_id) {
      seen.push(s.reported_by_user_id);
    }
  }
  seen
}
