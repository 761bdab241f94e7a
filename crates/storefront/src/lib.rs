//! StayHub Storefront services library.
//!
//! Client-side services for the accommodation marketplace front-end. The
//! rendering layer is not part of this crate; it receives a [`state::Services`]
//! container at startup and calls into it.
//!
//! # Modules
//!
//! - [`api`] - Marketplace comparison API seam and its HTTP client
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Error type and Sentry helpers
//! - [`notify`] - User-facing notice capability
//! - [`services`] - Comparison store
//! - [`state`] - Service container

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod services;
pub mod state;

pub use api::{ApiError, ComparisonApi, HttpComparisonApi};
pub use notify::{Notice, NoticeKind, Notifier, TracingNotifier};
pub use services::comparison::{
    AddOutcome, ComparisonStore, ComparisonSummary, MAX_COMPARISON_ITEMS, MutationOutcome,
    RefreshOutcome,
};
