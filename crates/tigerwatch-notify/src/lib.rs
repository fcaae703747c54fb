//! In-process notification delivery for tigerwatch.
//!
//! A [`NotificationService`] owns a bounded queue and a pool of worker
//! tasks that drain it through a [`Mailer`]. Producers get a cloneable
//! [`Producer`] handle from [`NotificationService::queue`]; once the service
//! is stopped every producer fails with [`Error::QueueClosed`].
//!
//! Nothing is persisted. Notifications still queued when the process dies
//! are lost.

pub mod config;
pub mod error;
pub mod mailer;
pub mod queue;
pub mod service;
mod worker;

pub use config::{NotificationConfig, RecipientPolicy};
pub use error::{Error, Result};
pub use mailer::{DeliveryError, Mailer, SimulatedMailer};
pub use queue::Producer;
pub use service::{NotificationService, StopReport};
pub use worker::{DeliveryCounts, DeliveryStats};
