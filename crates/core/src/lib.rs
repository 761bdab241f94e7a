//! StayHub Core - Shared types library.
//!
//! This crate provides common types used across all StayHub components:
//! - `storefront` - Comparison store and marketplace API client
//! - `cli` - Command-line front-end for the comparison list
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, identities, prices, and listings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
