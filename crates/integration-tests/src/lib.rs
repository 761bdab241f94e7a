//! Integration tests for StayHub.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stayhub-integration-tests
//! ```
//!
//! No external services are needed: the comparison store runs against
//! [`InMemoryComparisonApi`], and the HTTP client runs against a local axum
//! server ([`FakeBackend`]) bound to an ephemeral port.
//!
//! # Test Categories
//!
//! - `comparison_store` - Store behavior against the in-memory API
//! - `comparison_concurrency` - Stale responses, identity switches, timeouts
//! - `http_api` - REST client against the fake backend

pub mod backend;
pub mod fake_api;
pub mod notifier;

pub use backend::{FakeBackend, RecordedRequest};
pub use fake_api::{ApiCall, FetchGate, InMemoryComparisonApi, Operation};
pub use notifier::RecordingNotifier;

use std::time::Duration;

use rust_decimal::Decimal;
use stayhub_core::{AnonymousId, CurrencyCode, Identity, Price, Property, PropertyId};
use stayhub_storefront::ComparisonStore;

/// Store type used throughout the integration tests.
pub type TestStore = ComparisonStore<InMemoryComparisonApi, RecordingNotifier>;

/// Deadline used by [`store_with`]; long enough never to fire by accident.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// A listing priced in rupees per month.
#[must_use]
pub fn listing(title: &str, monthly_rent: i64) -> Property {
    Property::new(
        PropertyId::generate(),
        title,
        Price::new(Decimal::new(monthly_rent, 0), CurrencyCode::INR),
    )
}

/// An anonymous identity.
///
/// # Panics
///
/// Panics if `id` is not a valid anonymous id.
#[must_use]
#[allow(clippy::expect_used)]
pub fn anonymous(id: &str) -> Identity {
    Identity::Anonymous(AnonymousId::parse(id).expect("valid anonymous id"))
}

/// Build a store over `api` with a fresh recording notifier.
#[must_use]
pub fn store_with(api: &InMemoryComparisonApi, identity: Identity) -> (TestStore, RecordingNotifier) {
    let notifier = RecordingNotifier::new();
    let store = ComparisonStore::new(api.clone(), notifier.clone(), identity, TEST_TIMEOUT);
    (store, notifier)
}
