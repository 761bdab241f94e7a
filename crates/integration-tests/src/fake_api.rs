//! In-memory stand-in for the marketplace comparison API.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use stayhub_core::{Identity, Property, PropertyId};
use stayhub_storefront::{ApiError, ComparisonApi};
use tokio::sync::oneshot;

/// A call received by the fake, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Get(Identity),
    Add(PropertyId, Identity),
    Remove(PropertyId, Identity),
    Clear(Identity),
}

impl ApiCall {
    /// Returns true for add, remove and clear calls.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::Get(_))
    }
}

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    Add,
    Remove,
    Clear,
}

/// Holds back one fetch until released.
pub struct FetchGate(oneshot::Sender<()>);

impl FetchGate {
    /// Let the held fetch return its snapshot.
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

#[derive(Default)]
struct FakeState {
    catalog: HashMap<PropertyId, Property>,
    lists: HashMap<Identity, Vec<PropertyId>>,
    calls: Vec<ApiCall>,
    failing: HashSet<Operation>,
    latency: Option<Duration>,
    fetch_gates: VecDeque<oneshot::Receiver<()>>,
}

impl FakeState {
    fn resolve(&self, identity: &Identity) -> Vec<Property> {
        self.lists
            .get(identity)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.catalog.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn check(&self, operation: Operation) -> Result<(), ApiError> {
        if self.failing.contains(&operation) {
            return Err(ApiError::Api {
                status: 503,
                message: format!("injected {operation:?} failure"),
            });
        }
        Ok(())
    }
}

/// Comparison API backed by a `HashMap`, with failure and latency injection.
///
/// Clones share state, so a test can keep a handle after giving one to the
/// store.
#[derive(Clone, Default)]
pub struct InMemoryComparisonApi {
    state: Arc<Mutex<FakeState>>,
}

impl InMemoryComparisonApi {
    /// Create an empty fake.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fake whose catalog holds `properties`.
    #[must_use]
    pub fn with_catalog(properties: impl IntoIterator<Item = Property>) -> Self {
        let api = Self::new();
        for property in properties {
            api.insert_property(property);
        }
        api
    }

    /// Add or replace a catalog entry.
    pub fn insert_property(&self, property: Property) {
        self.lock().catalog.insert(property.id, property);
    }

    /// Look up a catalog entry.
    #[must_use]
    pub fn property(&self, property_id: PropertyId) -> Option<Property> {
        self.lock().catalog.get(&property_id).cloned()
    }

    /// Overwrite the stored list for `identity`, bypassing the call log.
    pub fn seed_list(&self, identity: &Identity, ids: &[PropertyId]) {
        self.lock().lists.insert(identity.clone(), ids.to_vec());
    }

    /// The stored list for `identity`.
    #[must_use]
    pub fn list(&self, identity: &Identity) -> Vec<PropertyId> {
        self.lock().lists.get(identity).cloned().unwrap_or_default()
    }

    /// Every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Number of add, remove and clear calls received so far.
    #[must_use]
    pub fn mutation_calls(&self) -> usize {
        self.lock().calls.iter().filter(|c| c.is_mutation()).count()
    }

    /// Make `operation` fail until [`recover`](Self::recover) is called.
    pub fn fail(&self, operation: Operation) {
        self.lock().failing.insert(operation);
    }

    /// Stop failing `operation`.
    pub fn recover(&self, operation: Operation) {
        self.lock().failing.remove(&operation);
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.lock().latency = latency;
    }

    /// Hold the next fetch after it has taken its snapshot.
    ///
    /// The fetch returns the list as it was when the call arrived, once the
    /// returned gate is released.
    #[must_use]
    pub fn hold_next_fetch(&self) -> FetchGate {
        let (tx, rx) = oneshot::channel();
        self.lock().fetch_gates.push_back(rx);
        FetchGate(tx)
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn delay(&self) {
        let latency = self.lock().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl ComparisonApi for InMemoryComparisonApi {
    async fn get_comparison_properties(
        &self,
        identity: &Identity,
    ) -> Result<Vec<Property>, ApiError> {
        let (result, gate) = {
            let mut state = self.lock();
            state.calls.push(ApiCall::Get(identity.clone()));
            let gate = state.fetch_gates.pop_front();
            let result = state.check(Operation::Get).map(|()| state.resolve(identity));
            (result, gate)
        };

        self.delay().await;
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        result
    }

    async fn add_to_comparison(
        &self,
        property_id: PropertyId,
        identity: &Identity,
    ) -> Result<(), ApiError> {
        {
            let mut state = self.lock();
            state.calls.push(ApiCall::Add(property_id, identity.clone()));
            state.check(Operation::Add)?;
        }

        self.delay().await;

        let mut state = self.lock();
        let list = state.lists.entry(identity.clone()).or_default();
        if !list.contains(&property_id) {
            list.push(property_id);
        }
        Ok(())
    }

    async fn remove_from_comparison(
        &self,
        property_id: PropertyId,
        identity: &Identity,
    ) -> Result<(), ApiError> {
        {
            let mut state = self.lock();
            state
                .calls
                .push(ApiCall::Remove(property_id, identity.clone()));
            state.check(Operation::Remove)?;
        }

        self.delay().await;

        if let Some(list) = self.lock().lists.get_mut(identity) {
            list.retain(|id| *id != property_id);
        }
        Ok(())
    }

    async fn clear_comparison(&self, identity: &Identity) -> Result<(), ApiError> {
        {
            let mut state = self.lock();
            state.calls.push(ApiCall::Clear(identity.clone()));
            state.check(Operation::Clear)?;
        }

        self.delay().await;

        self.lock().lists.remove(identity);
        Ok(())
    }
}
