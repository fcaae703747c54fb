//! Application services for tigerwatch.
//!
//! [`SightingService`] runs the sighting report pipeline: validate, check
//! for a nearby duplicate, persist, then fan notifications out to earlier
//! reporters through a [`SightingNotifier`]. [`AccountService`] covers
//! registration, login and bearer-token verification, and [`TigerService`]
//! the tiger catalogue.
//!
//! Services are generic over the `tigerwatch-core` store traits.

pub mod account;
pub mod context;
pub mod error;
pub mod locks;
pub mod notifier;
pub mod sighting;
pub mod tiger;


pub use account::{AccountService, NewAccount};
pub use context::{Cancelled, RequestContext};
pub use error::{AccountError, ListSightingsError, NotifyError, ReportSightingError, TigerError};
pub use notifier::SightingNotifier;
pub use sighting::{ReportSightingRequest, SightingService};
pub use tiger::TigerService;
