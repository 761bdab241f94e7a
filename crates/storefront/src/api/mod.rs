//! Marketplace comparison API.
//!
//! # Architecture
//!
//! - The remote API is the source of truth for comparison lists - NO local
//!   persistence, every read goes over the wire
//! - [`ComparisonApi`] is the seam the comparison store depends on, so the
//!   store can run against the HTTP client or an in-memory fake
//! - [`HttpComparisonApi`] speaks the REST/JSON dialect of the marketplace API
//!
//! # Example
//!
//! ```rust,ignore
//! use stayhub_storefront::api::{ComparisonApi, HttpComparisonApi};
//!
//! let api = HttpComparisonApi::new(&config.api)?;
//! let properties = api.get_comparison_properties(&identity).await?;
//! ```

mod http;

pub use http::HttpComparisonApi;

use std::future::Future;
use std::time::Duration;

use stayhub_core::{Identity, Property, PropertyId};
use thiserror::Error;

/// Errors that can occur when interacting with the marketplace API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The call did not complete before its deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The client could not be configured.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

/// Remote persistence for comparison lists.
///
/// Every operation is keyed by the visitor's [`Identity`]. Implementations
/// must be thread-safe (`Send + Sync`) and return `Send` futures so the store
/// can be driven from spawned tasks.
pub trait ComparisonApi: Send + Sync {
    /// Fetch the full comparison list for `identity`, in stored order.
    fn get_comparison_properties(
        &self,
        identity: &Identity,
    ) -> impl Future<Output = Result<Vec<Property>, ApiError>> + Send;

    /// Append `property_id` to the list. Duplicate handling is up to the caller.
    fn add_to_comparison(
        &self,
        property_id: PropertyId,
        identity: &Identity,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Remove `property_id` from the list. Removing an absent id is not an error.
    fn remove_from_comparison(
        &self,
        property_id: PropertyId,
        identity: &Identity,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Remove every entry from the list.
    fn clear_comparison(&self, identity: &Identity)
    -> impl Future<Output = Result<(), ApiError>> + Send;
}
