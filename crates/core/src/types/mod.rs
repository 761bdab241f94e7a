//! Core types for StayHub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod identity;
pub mod price;
pub mod property;
pub mod status;

pub use id::*;
pub use identity::{AnonymousId, AnonymousIdError, Identity};
pub use price::{CurrencyCode, Price};
pub use property::Property;
pub use status::*;
