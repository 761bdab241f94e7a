//! Local HTTP server speaking the marketplace comparison REST dialect.
//!
//! Backed by an [`InMemoryComparisonApi`], so tests can drive the real
//! `HttpComparisonApi` over a socket and still inspect stored lists.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use stayhub_core::{AnonymousId, Identity, PropertyId, UserId};
use stayhub_storefront::ComparisonApi;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fake_api::InMemoryComparisonApi;

/// A request seen by the fake backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

/// Response returned for every request while set.
#[derive(Debug, Clone, Copy)]
struct ForcedResponse {
    status: StatusCode,
    retry_after: Option<u64>,
}

#[derive(Clone)]
struct BackendState {
    api: InMemoryComparisonApi,
    forced: Arc<Mutex<Option<ForcedResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl BackendState {
    fn forced(&self) -> Option<ForcedResponse> {
        *lock(&self.forced)
    }

    fn record(&self, method: Method, uri: &Uri, headers: &HeaderMap) {
        lock(&self.requests).push(RecordedRequest {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            authorization: headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });
    }

    /// Record the request and return the forced response, if one is set.
    fn intercept(&self, method: Method, uri: &Uri, headers: &HeaderMap) -> Option<Response> {
        self.record(method, uri, headers);
        self.forced().map(forced_response)
    }
}

/// A running fake backend. The server stops when this is dropped.
pub struct FakeBackend {
    addr: SocketAddr,
    state: BackendState,
    handle: JoinHandle<()>,
}

impl FakeBackend {
    /// Bind to an ephemeral localhost port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn spawn(api: InMemoryComparisonApi) -> std::io::Result<Self> {
        let state = BackendState {
            api,
            forced: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = router(state.clone());

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// Base URL to configure the client with, including an `/api/v1` prefix.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    /// The store behind the server.
    #[must_use]
    pub fn api(&self) -> &InMemoryComparisonApi {
        &self.state.api
    }

    /// Answer every request with `status` until [`reset`](Self::reset).
    pub fn force_status(&self, status: StatusCode, retry_after: Option<u64>) {
        *lock(&self.state.forced) = Some(ForcedResponse {
            status,
            retry_after,
        });
    }

    /// Stop forcing a status.
    pub fn reset(&self) {
        *lock(&self.state.forced) = None;
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(state: BackendState) -> Router {
    Router::new()
        .route(
            "/api/v1/comparisons",
            get(list_comparisons)
                .post(add_comparison)
                .delete(clear_comparisons),
        )
        .route(
            "/api/v1/comparisons/{property_id}",
            axum::routing::delete(remove_comparison),
        )
        .route("/api/v1/properties/{property_id}", get(get_property))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct IdentityQuery {
    user_id: Option<UserId>,
    anonymous_id: Option<AnonymousId>,
}

impl IdentityQuery {
    fn into_identity(self) -> Option<Identity> {
        match (self.user_id, self.anonymous_id) {
            (Some(user_id), None) => Some(Identity::User(user_id)),
            (None, Some(anonymous_id)) => Some(Identity::Anonymous(anonymous_id)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AddBody {
    property_id: PropertyId,
    user_id: Option<UserId>,
    anonymous_id: Option<AnonymousId>,
}

async fn list_comparisons(
    State(state): State<BackendState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<IdentityQuery>,
) -> Response {
    if let Some(response) = state.intercept(method, &uri, &headers) {
        return response;
    }
    let Some(identity) = query.into_identity() else {
        return bad_request("exactly one of user_id or anonymous_id is required");
    };

    match state.api.get_comparison_properties(&identity).await {
        Ok(properties) => Json(json!({ "data": properties })).into_response(),
        Err(e) => server_error(&e),
    }
}

async fn add_comparison(
    State(state): State<BackendState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<AddBody>,
) -> Response {
    if let Some(response) = state.intercept(method, &uri, &headers) {
        return response;
    }
    let query = IdentityQuery {
        user_id: body.user_id,
        anonymous_id: body.anonymous_id,
    };
    let Some(identity) = query.into_identity() else {
        return bad_request("exactly one of user_id or anonymous_id is required");
    };

    match state.api.add_to_comparison(body.property_id, &identity).await {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => server_error(&e),
    }
}

async fn remove_comparison(
    State(state): State<BackendState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(property_id): Path<PropertyId>,
    Query(query): Query<IdentityQuery>,
) -> Response {
    if let Some(response) = state.intercept(method, &uri, &headers) {
        return response;
    }
    let Some(identity) = query.into_identity() else {
        return bad_request("exactly one of user_id or anonymous_id is required");
    };

    if !state.api.list(&identity).contains(&property_id) {
        return (StatusCode::NOT_FOUND, "comparison entry not found").into_response();
    }

    match state
        .api
        .remove_from_comparison(property_id, &identity)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => server_error(&e),
    }
}

async fn clear_comparisons(
    State(state): State<BackendState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<IdentityQuery>,
) -> Response {
    if let Some(response) = state.intercept(method, &uri, &headers) {
        return response;
    }
    let Some(identity) = query.into_identity() else {
        return bad_request("exactly one of user_id or anonymous_id is required");
    };

    match state.api.clear_comparison(&identity).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => server_error(&e),
    }
}

async fn get_property(
    State(state): State<BackendState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(property_id): Path<PropertyId>,
) -> Response {
    if let Some(response) = state.intercept(method, &uri, &headers) {
        return response;
    }

    match state.api.property(property_id) {
        Some(property) => Json(json!({ "data": property })).into_response(),
        None => (StatusCode::NOT_FOUND, "property not found").into_response(),
    }
}

fn forced_response(forced: ForcedResponse) -> Response {
    let mut response = (forced.status, "forced response").into_response();
    if let Some(secs) = forced.retry_after {
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(secs));
    }
    response
}

fn bad_request(message: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

fn server_error(e: &impl std::fmt::Display) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
