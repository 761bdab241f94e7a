//! CLI command implementations.

pub mod comparison;
