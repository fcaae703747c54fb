//! Core types and trait definitions for the tigerwatch sighting tracker.
//!
//! No HTTP, no database. Every other crate depends on this one.

pub mod error;
pub mod geo;
pub mod notification;
pub mod sighting;
pub mod store;
pub mod tiger;
pub mod user;

pub use error::{Error, Result};
