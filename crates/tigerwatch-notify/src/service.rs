//! [`NotificationService`]: queue plus worker pool, with an explicit
//! start/stop lifecycle.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
  Error, Mailer, NotificationConfig, Result, SimulatedMailer,
  queue::{NotificationQueue, Producer},
  worker::{DeliveryCounts, DeliveryStats, run_worker},
};

/// Outcome of [`NotificationService::stop`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopReport {
  /// Notifications discarded without a delivery attempt.
  pub dropped:  usize,
  pub delivery: DeliveryCounts,
}

pub struct NotificationService<M: Mailer> {
  config:  NotificationConfig,
  mailer:  Arc<M>,
  queue:   NotificationQueue,
  stats:   Arc<DeliveryStats>,
  cancel:  CancellationToken,
  workers: Option<JoinSet<()>>,
}

impl NotificationService<SimulatedMailer> {
  /// A service delivering through [`SimulatedMailer`] with the configured
  /// delay.
  pub fn simulated(config: NotificationConfig) -> Result<Self> {
    let mailer = SimulatedMailer::new(Duration::from_millis(config.delivery_delay_ms));
    Self::new(config, mailer)
  }
}

impl<M: Mailer> NotificationService<M> {
  pub fn new(config: NotificationConfig, mailer: M) -> Result<Self> {
    config.validate()?;
    Ok(Self {
      queue: NotificationQueue::new(config.queue_capacity),
      config,
      mailer: Arc::new(mailer),
      stats: Arc::default(),
      cancel: CancellationToken::new(),
      workers: None,
    })
  }

  /// Spawn the worker pool. Must be called from within a tokio runtime.
  pub fn start(&mut self) -> Result<()> {
    if self.workers.is_some() {
      return Err(Error::AlreadyStarted);
    }
    let mut set = JoinSet::new();
    for worker in 0..self.config.workers {
      set.spawn(run_worker(
        worker,
        self.queue.receiver(),
        Arc::clone(&self.mailer),
        Arc::clone(&self.stats),
        self.cancel.clone(),
      ));
    }
    tracing::info!(workers = self.config.workers, "notification service started");
    self.workers = Some(set);
    Ok(())
  }

  /// A handle for submitting notifications. Valid until [`stop`](Self::stop).
  pub fn queue(&self) -> Producer { self.queue.producer() }

  pub fn stats(&self) -> DeliveryCounts { self.stats.snapshot() }

  /// Close the queue and shut the worker pool down.
  ///
  /// With `drain`, waits for every in-flight submission to land and every
  /// queued notification to be delivered. Without it, workers stop after
  /// their current delivery and anything still queued is dropped.
  pub async fn stop(mut self, drain: bool) -> StopReport {
    self.queue.close();
    if !drain {
      self.cancel.cancel();
    }

    if let Some(mut workers) = self.workers.take() {
      while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
          tracing::error!(error = %e, "notification worker panicked");
        }
      }
    }

    // Reached with items left only when not draining, when the pool was
    // never started, or when every worker died.
    let dropped = self.queue.discard_pending().await;
    let report = StopReport { dropped, delivery: self.stats.snapshot() };

    if dropped > 0 {
      tracing::warn!(dropped, "notification service stopped with undelivered notifications");
    }
    tracing::info!(
      delivered = report.delivery.delivered,
      failed    = report.delivery.failed,
      "notification service stopped"
    );
    report
  }
}
