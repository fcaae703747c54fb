use std::sync::{
  Arc,
  atomic::{AtomicU64, Ordering},
};

use tigerwatch_core::notification::Notification;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::Mailer;

/// Running delivery counters shared by all workers.
#[derive(Debug, Default)]
pub struct DeliveryStats {
  delivered: AtomicU64,
  failed:    AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryCounts {
  pub delivered: u64,
  pub failed:    u64,
}

impl DeliveryStats {
  pub fn snapshot(&self) -> DeliveryCounts {
    DeliveryCounts {
      delivered: self.delivered.load(Ordering::Relaxed),
      failed:    self.failed.load(Ordering::Relaxed),
    }
  }
}

/// Receive and deliver until the channel is closed and drained, or until
/// `cancel` fires. Cancellation is only observed between items.
pub(crate) async fn run_worker<M: Mailer>(
  worker:   usize,
  receiver: Arc<Mutex<mpsc::Receiver<Notification>>>,
  mailer:   Arc<M>,
  stats:    Arc<DeliveryStats>,
  cancel:   CancellationToken,
) {
  tracing::debug!(worker, "notification worker started");
  loop {
    let next = tokio::select! {
      biased;
      _ = cancel.cancelled() => break,
      n = async { receiver.lock().await.recv().await } => n,
    };
    let Some(notification) = next else { break };

    match mailer.deliver(&notification).await {
      Ok(()) => {
        stats.delivered.fetch_add(1, Ordering::Relaxed);
      }
      Err(e) => {
        stats.failed.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
          worker,
          user_id  = %notification.user_id,
          tiger_id = notification.tiger_id(),
          error    = %e,
          "dropping undeliverable notification"
        );
      }
    }
  }
  tracing::debug!(worker, "notification worker stopped");
}
