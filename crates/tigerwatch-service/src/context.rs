//! Per-request execution context.

use std::{future::Future, time::Duration};

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("request cancelled")]
pub struct Cancelled;

/// What a service call knows about its caller: who they are and whether
/// they still want the answer.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
  user_id:  Option<Uuid>,
  cancel:   CancellationToken,
  deadline: Option<Instant>,
}

impl RequestContext {
  /// A context with no authenticated user.
  pub fn anonymous() -> Self { Self::default() }

  pub fn authenticated(user_id: Uuid) -> Self {
    Self { user_id: Some(user_id), ..Self::default() }
  }

  pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
    self.cancel = cancel;
    self
  }

  /// Give up on guarded work once `timeout` has elapsed from now.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.deadline = Some(Instant::now() + timeout);
    self
  }

  pub fn user_id(&self) -> Option<Uuid> { self.user_id }

  pub fn cancellation(&self) -> &CancellationToken { &self.cancel }

  /// Run `fut` unless the caller cancels or the deadline passes first.
  pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, Cancelled> {
    let expired = async {
      match self.deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
      }
    };
    tokio::select! {
      biased;
      _ = self.cancel.cancelled() => Err(Cancelled),
      _ = expired => Err(Cancelled),
      out = fut => Ok(out),
    }
  }
}
