//! The delivery seam.

use std::{future::Future, time::Duration};

use thiserror::Error;
use tigerwatch_core::notification::Notification;

#[derive(Debug, Error)]
#[error("delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// Something that can hand a notification to its recipient.
pub trait Mailer: Send + Sync + 'static {
  fn deliver<'a>(
    &'a self,
    notification: &'a Notification,
  ) -> impl Future<Output = Result<(), DeliveryError>> + Send + 'a;
}

/// Stand-in for an email gateway: waits `delay`, logs, and succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedMailer {
  delay: Duration,
}

impl SimulatedMailer {
  pub fn new(delay: Duration) -> Self { Self { delay } }
}

impl Mailer for SimulatedMailer {
  async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
    tokio::time::sleep(self.delay).await;
    tracing::info!(
      user_id  = %notification.user_id,
      tiger_id = notification.tiger_id(),
      subject  = %notification.subject,
      "sent notification"
    );
    Ok(())
  }
}
