//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `comparison` - Bounded comparison list synchronized with the marketplace API

pub mod comparison;
