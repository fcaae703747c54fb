//! The queue between fan-out producers and the worker pool.
//!
//! The only path to the channel's sender is through a [`Producer`], which
//! clones it for the duration of one send. Closing takes the master sender
//! away, so a closed queue can never be sent on; the channel itself ends
//! once the last in-flight send has dropped its clone.

use std::sync::{Arc, PoisonError, RwLock};

use tigerwatch_core::notification::Notification;
use tokio::sync::{Mutex, mpsc};

use crate::{Error, Result};

type SharedSender = Arc<RwLock<Option<mpsc::Sender<Notification>>>>;

pub(crate) struct NotificationQueue {
  sender:   SharedSender,
  receiver: Arc<Mutex<mpsc::Receiver<Notification>>>,
}

impl NotificationQueue {
  pub(crate) fn new(capacity: usize) -> Self {
    let (tx, rx) = mpsc::channel(capacity);
    Self {
      sender:   Arc::new(RwLock::new(Some(tx))),
      receiver: Arc::new(Mutex::new(rx)),
    }
  }

  pub(crate) fn producer(&self) -> Producer {
    Producer { sender: Arc::clone(&self.sender) }
  }

  pub(crate) fn receiver(&self) -> Arc<Mutex<mpsc::Receiver<Notification>>> {
    Arc::clone(&self.receiver)
  }

  /// Stop accepting submissions. Idempotent.
  pub(crate) fn close(&self) {
    self
      .sender
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .take();
  }

  /// Close the receiving side and discard whatever is still buffered.
  /// Producers blocked on a full buffer fail with [`Error::QueueClosed`].
  pub(crate) async fn discard_pending(&self) -> usize {
    let mut rx = self.receiver.lock().await;
    rx.close();
    let mut dropped = 0;
    while rx.try_recv().is_ok() {
      dropped += 1;
    }
    dropped
  }
}

/// Cloneable handle for submitting notifications.
#[derive(Clone)]
pub struct Producer {
  sender: SharedSender,
}

impl Producer {
  /// Submit `notification`, waiting for buffer space.
  pub async fn send(&self, notification: Notification) -> Result<()> {
    let sender = self
      .sender
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
      .ok_or(Error::QueueClosed)?;
    sender.send(notification).await.map_err(|_| Error::QueueClosed)
  }

  pub fn is_closed(&self) -> bool {
    self
      .sender
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .is_none()
  }
}

impl std::fmt::Debug for Producer {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Producer")
      .field("closed", &self.is_closed())
      .finish()
  }
}
