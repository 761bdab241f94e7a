//! Comparison list store.
//!
//! Holds the visitor's selection of up to [`MAX_COMPARISON_ITEMS`] properties
//! and mediates every change through the remote [`ComparisonApi`].
//!
//! # Consistency
//!
//! The remote list is the source of truth. Nothing is applied optimistically:
//! after every successful add or remove the full list is fetched again and
//! replaces the local copy. Each fetch takes a generation ticket; a result
//! older than the newest applied one is discarded, so a slow response can
//! never overwrite a fresher one.
//!
//! # Failure handling
//!
//! Operations never return errors to the caller. Validation rejections and
//! remote failures are reported through the [`Notifier`] and logged; the
//! returned outcome enums exist for callers that want to branch on the result.
//! Background refreshes only log.
//!
//! # Cancellation
//!
//! Every remote call is bounded by the store's request timeout. Dropping an
//! operation's future cancels it; the loading flag is released by a guard so
//! neither path leaves [`ComparisonStore::is_loading`] stuck.

mod messages;
mod summary;

pub use summary::{ComparisonSummary, MAX_THUMBNAILS, Thumbnail};

use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use stayhub_core::{Identity, Property, PropertyId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::api::{ApiError, ComparisonApi};
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::notify::{Notice, NoticeKind, Notifier};

/// Maximum number of properties in a comparison list.
pub const MAX_COMPARISON_ITEMS: usize = 4;

/// Deadline for remote calls when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of [`ComparisonStore::add`].
#[derive(Debug)]
pub enum AddOutcome {
    /// The remote list accepted the property.
    Added,
    /// The property was already selected; nothing was sent.
    AlreadySelected,
    /// The list is full; nothing was sent.
    LimitReached,
    /// The remote call failed; local state is unchanged.
    Failed(ApiError),
}

impl AddOutcome {
    /// Returns true if the property was added.
    #[must_use]
    pub const fn is_added(&self) -> bool {
        matches!(self, Self::Added)
    }
}

/// Result of [`ComparisonStore::remove`] and [`ComparisonStore::clear`].
#[derive(Debug)]
pub enum MutationOutcome {
    /// The remote store accepted the change.
    Applied,
    /// The remote call failed; local state is unchanged.
    Failed(ApiError),
}

impl MutationOutcome {
    /// Returns true if the remote store accepted the change.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Result of a fetch of the remote list.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// Local state was replaced with the fetched list.
    Applied,
    /// A newer result (or an identity change) superseded this fetch.
    Stale,
    /// The fetch failed; local state is unchanged.
    Failed(ApiError),
}

/// Client-side view of a visitor's comparison list.
///
/// Construct once at startup and share by cloning; clones share state.
pub struct ComparisonStore<A, N> {
    inner: Arc<ComparisonStoreInner<A, N>>,
}

impl<A, N> Clone for ComparisonStore<A, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ComparisonStoreInner<A, N> {
    api: A,
    notifier: N,
    request_timeout: Duration,
    selection: RwLock<Selection>,
    /// Operations currently awaiting the remote API.
    in_flight: AtomicUsize,
    /// Last generation ticket handed out.
    generation: AtomicU64,
}

struct Selection {
    identity: Identity,
    properties: Vec<Property>,
    /// Ticket of the fetch (or clear) that produced `properties`.
    applied_generation: u64,
}

impl Selection {
    fn contains(&self, property_id: PropertyId) -> bool {
        self.properties.iter().any(|p| p.id == property_id)
    }
}

/// Decrements the in-flight counter when dropped.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<A: ComparisonApi, N: Notifier> ComparisonStore<A, N> {
    /// Create a store for `identity` with an empty selection.
    ///
    /// Call [`refresh`](Self::refresh) (or start
    /// [`spawn_identity_sync`](Self::spawn_identity_sync)) to load the
    /// persisted list.
    #[must_use]
    pub fn new(api: A, notifier: N, identity: Identity, request_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(ComparisonStoreInner {
                api,
                notifier,
                request_timeout,
                selection: RwLock::new(Selection {
                    identity,
                    properties: Vec::new(),
                    applied_generation: 0,
                }),
                in_flight: AtomicUsize::new(0),
                generation: AtomicU64::new(0),
            }),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns true if `property_id` is in the local selection.
    #[must_use]
    pub fn is_selected(&self, property_id: PropertyId) -> bool {
        self.read().contains(property_id)
    }

    /// Number of selected properties.
    #[must_use]
    pub fn count(&self) -> usize {
        self.read().properties.len()
    }

    /// Snapshot of the selected properties in list order.
    #[must_use]
    pub fn properties(&self) -> Vec<Property> {
        self.read().properties.clone()
    }

    /// The identity whose list this store mirrors.
    #[must_use]
    pub fn identity(&self) -> Identity {
        self.read().identity.clone()
    }

    /// Returns true while any refresh or mutation awaits the remote API.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Display summary of the current selection.
    #[must_use]
    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary::from_properties(&self.read().properties)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `property` to the comparison list.
    ///
    /// Rejected locally, without a remote call, when the property is already
    /// selected or the list is full.
    #[instrument(skip(self, property), fields(property_id = %property.id))]
    pub async fn add(&self, property: &Property) -> AddOutcome {
        let (selected, count) = {
            let selection = self.read();
            (selection.contains(property.id), selection.properties.len())
        };

        if selected {
            debug!("Property already in comparison");
            self.notify(NoticeKind::Info, messages::already_selected(&property.title));
            return AddOutcome::AlreadySelected;
        }

        if count >= MAX_COMPARISON_ITEMS {
            debug!(count, "Comparison list is full");
            self.notify(NoticeKind::Warning, messages::limit_reached());
            return AddOutcome::LimitReached;
        }

        let _loading = self.begin_loading();
        let identity = self.identity();

        if let Err(e) = self
            .remote(self.inner.api.add_to_comparison(property.id, &identity))
            .await
        {
            error!(error = %e, identity = %identity, "Failed to add property to comparison");
            self.notify(NoticeKind::Error, messages::add_failed());
            return AddOutcome::Failed(e);
        }

        self.resync().await;

        info!(identity = %identity, "Added property to comparison");
        add_breadcrumb(
            "comparison",
            "Added property to comparison",
            Some(&[("property_id", property.id.to_string().as_str())]),
        );
        self.notify(NoticeKind::Success, messages::added(&property.title));
        AddOutcome::Added
    }

    /// Remove `property_id` from the comparison list.
    ///
    /// The request is sent even if the property is not selected locally.
    #[instrument(skip(self), fields(property_id = %property_id))]
    pub async fn remove(&self, property_id: PropertyId) -> MutationOutcome {
        let _loading = self.begin_loading();
        let identity = self.identity();

        if let Err(e) = self
            .remote(self.inner.api.remove_from_comparison(property_id, &identity))
            .await
        {
            error!(error = %e, identity = %identity, "Failed to remove property from comparison");
            self.notify(NoticeKind::Error, messages::remove_failed());
            return MutationOutcome::Failed(e);
        }

        self.resync().await;

        info!(identity = %identity, "Removed property from comparison");
        add_breadcrumb(
            "comparison",
            "Removed property from comparison",
            Some(&[("property_id", property_id.to_string().as_str())]),
        );
        self.notify(NoticeKind::Success, messages::removed());
        MutationOutcome::Applied
    }

    /// Remove every property from the comparison list.
    ///
    /// On success the local selection is emptied directly, without a re-fetch.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> MutationOutcome {
        let _loading = self.begin_loading();
        let identity = self.identity();

        if let Err(e) = self
            .remote(self.inner.api.clear_comparison(&identity))
            .await
        {
            error!(error = %e, identity = %identity, "Failed to clear comparison");
            self.notify(NoticeKind::Error, messages::clear_failed());
            return MutationOutcome::Failed(e);
        }

        {
            let mut selection = self.write();
            // The visitor may have switched identity while the call was out;
            // that identity's list was not cleared.
            if selection.identity == identity {
                selection.properties.clear();
                selection.applied_generation = self.next_ticket();
            }
        }

        info!(identity = %identity, "Cleared comparison");
        add_breadcrumb("comparison", "Cleared comparison", None);
        self.notify(NoticeKind::Success, messages::cleared());
        MutationOutcome::Applied
    }

    /// Re-fetch the list for the current identity and replace local state.
    ///
    /// Failures are logged only; the stale selection is kept.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let _loading = self.begin_loading();
        self.resync().await
    }

    /// Switch to `identity` and re-fetch its list.
    ///
    /// When the identity actually changes the previous visitor's selection is
    /// dropped immediately and any fetch still in flight for it is discarded.
    #[instrument(skip(self), fields(identity = %identity))]
    pub async fn set_identity(&self, identity: Identity) -> RefreshOutcome {
        {
            let mut selection = self.write();
            if selection.identity != identity {
                info!(previous = %selection.identity, "Comparison identity changed");
                match &identity {
                    Identity::User(user_id) => set_sentry_user(user_id, None),
                    Identity::Anonymous(_) => clear_sentry_user(),
                }
                selection.identity = identity;
                selection.properties.clear();
                selection.applied_generation = self.next_ticket();
            }
        }

        self.refresh().await
    }

    /// Follow identity changes published by the authentication layer.
    ///
    /// Applies the channel's current value immediately, then calls
    /// [`set_identity`](Self::set_identity) for every change. The task ends
    /// when the sender is dropped.
    pub fn spawn_identity_sync(&self, mut identities: watch::Receiver<Identity>) -> JoinHandle<()>
    where
        A: 'static,
        N: 'static,
    {
        let store = self.clone();
        tokio::spawn(async move {
            let initial = identities.borrow_and_update().clone();
            store.set_identity(initial).await;

            while identities.changed().await.is_ok() {
                let identity = identities.borrow_and_update().clone();
                store.set_identity(identity).await;
            }

            debug!("Identity channel closed, stopping comparison sync");
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Fetch the remote list and apply it unless a newer result already landed.
    async fn resync(&self) -> RefreshOutcome {
        let (ticket, identity) = {
            let selection = self.read();
            (self.next_ticket(), selection.identity.clone())
        };

        match self
            .remote(self.inner.api.get_comparison_properties(&identity))
            .await
        {
            Ok(properties) => self.apply(ticket, &identity, properties),
            Err(e) => {
                error!(error = %e, identity = %identity, "Failed to refresh comparison list");
                RefreshOutcome::Failed(e)
            }
        }
    }

    fn apply(&self, ticket: u64, identity: &Identity, properties: Vec<Property>) -> RefreshOutcome {
        let properties = dedupe(properties);
        if properties.len() > MAX_COMPARISON_ITEMS {
            warn!(
                count = properties.len(),
                max = MAX_COMPARISON_ITEMS,
                "Remote comparison list exceeds the maximum size"
            );
        }

        let mut selection = self.write();
        if selection.applied_generation >= ticket || selection.identity != *identity {
            debug!(
                ticket,
                applied = selection.applied_generation,
                "Discarding stale comparison list"
            );
            return RefreshOutcome::Stale;
        }

        debug!(ticket, count = properties.len(), "Applied comparison list");
        selection.properties = properties;
        selection.applied_generation = ticket;
        RefreshOutcome::Applied
    }

    /// Run a remote call under the store's deadline.
    async fn remote<T>(
        &self,
        call: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ApiError> {
        let timeout = self.inner.request_timeout;
        tokio::time::timeout(timeout, call)
            .await
            .unwrap_or_else(|_| Err(ApiError::Timeout(timeout)))
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard(&self.inner.in_flight)
    }

    fn next_ticket(&self) -> u64 {
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn notify(&self, kind: NoticeKind, notice: Notice) {
        self.inner.notifier.notify(kind, notice);
    }

    fn read(&self) -> RwLockReadGuard<'_, Selection> {
        self.inner
            .selection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Selection> {
        self.inner
            .selection
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Drop repeated property ids, keeping the first occurrence.
fn dedupe(properties: Vec<Property>) -> Vec<Property> {
    let mut seen = HashSet::with_capacity(properties.len());
    let before = properties.len();
    let unique: Vec<Property> = properties.into_iter().filter(|p| seen.insert(p.id)).collect();

    if unique.len() != before {
        warn!(
            dropped = before - unique.len(),
            "Remote comparison list contained duplicate properties"
        );
    }

    unique
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;
    use stayhub_core::{AnonymousId, CurrencyCode, Price};

    use super::*;

    fn listing(title: &str) -> Property {
        Property::new(
            PropertyId::generate(),
            title,
            Price::new(Decimal::new(5000, 0), CurrencyCode::INR),
        )
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let a = listing("a");
        let b = listing("b");
        let mut a_again = a.clone();
        a_again.title = "a (renamed)".to_string();

        let result = dedupe(vec![a.clone(), b.clone(), a_again]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "a");
        assert_eq!(result[1].id, b.id);
    }

    #[test]
    fn test_loading_guard_releases_on_drop() {
        let counter = AtomicUsize::new(1);
        {
            let _guard = LoadingGuard(&counter);
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_outcome_helpers() {
        assert!(AddOutcome::Added.is_added());
        assert!(!AddOutcome::LimitReached.is_added());
        assert!(MutationOutcome::Applied.is_applied());
        assert!(!MutationOutcome::Failed(ApiError::RateLimited(1)).is_applied());
    }

    #[test]
    fn test_selection_contains() {
        let a = listing("a");
        let selection = Selection {
            identity: Identity::Anonymous(AnonymousId::parse("anon_1").unwrap()),
            properties: vec![a.clone()],
            applied_generation: 0,
        };
        assert!(selection.contains(a.id));
        assert!(!selection.contains(PropertyId::generate()));
    }
}
