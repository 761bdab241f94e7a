//! `HttpComparisonApi` against the local fake backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use axum::http::{Method, StatusCode};
use secrecy::SecretString;
use stayhub_core::{Identity, PropertyId, UserId};
use stayhub_integration_tests::{
    FakeBackend, InMemoryComparisonApi, RecordingNotifier, anonymous, listing,
};
use stayhub_storefront::config::ApiConfig;
use stayhub_storefront::{
    AddOutcome, ApiError, ComparisonApi, ComparisonStore, HttpComparisonApi, NoticeKind,
};

fn client(backend: &FakeBackend) -> HttpComparisonApi {
    let config = ApiConfig::new(&backend.base_url(), Duration::from_secs(5)).unwrap();
    HttpComparisonApi::new(&config).unwrap()
}

#[tokio::test]
async fn test_get_sends_anonymous_id_query() {
    let a = listing("Green Nest PG", 6500);
    let api = InMemoryComparisonApi::with_catalog([a.clone()]);
    let visitor = anonymous("anon_http");
    api.seed_list(&visitor, &[a.id]);
    let backend = FakeBackend::spawn(api).await.unwrap();

    let properties = client(&backend)
        .get_comparison_properties(&visitor)
        .await
        .unwrap();

    assert_eq!(properties, vec![a]);
    let requests = backend.requests();
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].path, "/api/v1/comparisons");
    assert_eq!(requests[0].query.as_deref(), Some("anonymous_id=anon_http"));
}

#[tokio::test]
async fn test_get_sends_user_id_query() {
    let backend = FakeBackend::spawn(InMemoryComparisonApi::new()).await.unwrap();
    let user_id = UserId::generate();

    let properties = client(&backend)
        .get_comparison_properties(&Identity::User(user_id))
        .await
        .unwrap();

    assert!(properties.is_empty());
    assert_eq!(
        backend.requests()[0].query,
        Some(format!("user_id={user_id}"))
    );
}

#[tokio::test]
async fn test_add_remove_and_clear_reach_backend() {
    let a = listing("A", 6000);
    let b = listing("B", 7000);
    let backend = FakeBackend::spawn(InMemoryComparisonApi::with_catalog([a.clone(), b.clone()]))
        .await
        .unwrap();
    let http = client(&backend);
    let user: Identity = UserId::generate().into();

    http.add_to_comparison(a.id, &user).await.unwrap();
    http.add_to_comparison(b.id, &user).await.unwrap();
    assert_eq!(backend.api().list(&user), vec![a.id, b.id]);

    http.remove_from_comparison(a.id, &user).await.unwrap();
    assert_eq!(backend.api().list(&user), vec![b.id]);

    http.clear_comparison(&user).await.unwrap();
    assert!(backend.api().list(&user).is_empty());

    let paths: Vec<(Method, String)> = backend
        .requests()
        .into_iter()
        .map(|r| (r.method, r.path))
        .collect();
    assert_eq!(
        paths,
        vec![
            (Method::POST, "/api/v1/comparisons".to_string()),
            (Method::POST, "/api/v1/comparisons".to_string()),
            (Method::DELETE, format!("/api/v1/comparisons/{}", a.id)),
            (Method::DELETE, "/api/v1/comparisons".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_remove_missing_entry_is_success() {
    let backend = FakeBackend::spawn(InMemoryComparisonApi::new()).await.unwrap();

    let result = client(&backend)
        .remove_from_comparison(PropertyId::generate(), &anonymous("anon_gone"))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_rate_limit_maps_retry_after() {
    let backend = FakeBackend::spawn(InMemoryComparisonApi::new()).await.unwrap();
    backend.force_status(StatusCode::TOO_MANY_REQUESTS, Some(7));

    let result = client(&backend)
        .get_comparison_properties(&anonymous("anon_429"))
        .await;

    assert!(matches!(result, Err(ApiError::RateLimited(7))));
}

#[tokio::test]
async fn test_rate_limit_without_header_defaults_to_one_second() {
    let backend = FakeBackend::spawn(InMemoryComparisonApi::new()).await.unwrap();
    backend.force_status(StatusCode::TOO_MANY_REQUESTS, None);

    let result = client(&backend).clear_comparison(&anonymous("anon_429")).await;

    assert!(matches!(result, Err(ApiError::RateLimited(1))));
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let backend = FakeBackend::spawn(InMemoryComparisonApi::new()).await.unwrap();
    backend.force_status(StatusCode::INTERNAL_SERVER_ERROR, None);

    let result = client(&backend)
        .add_to_comparison(PropertyId::generate(), &anonymous("anon_500"))
        .await;

    match result {
        Err(ApiError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "forced response");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_backend_maps_to_timeout() {
    let api = InMemoryComparisonApi::new();
    api.set_latency(Some(Duration::from_secs(2)));
    let backend = FakeBackend::spawn(api).await.unwrap();
    let config = ApiConfig::new(&backend.base_url(), Duration::from_millis(100)).unwrap();
    let http = HttpComparisonApi::new(&config).unwrap();

    let result = http.get_comparison_properties(&anonymous("anon_slow")).await;

    assert!(matches!(result, Err(ApiError::Timeout(_))));
}

#[tokio::test]
async fn test_get_property() {
    let a = listing("Sunrise Hostel", 4500);
    let backend = FakeBackend::spawn(InMemoryComparisonApi::with_catalog([a.clone()]))
        .await
        .unwrap();
    let http = client(&backend);

    assert_eq!(http.get_property(a.id).await.unwrap(), a);
    assert!(matches!(
        http.get_property(PropertyId::generate()).await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_api_key_sent_as_bearer_token() {
    let backend = FakeBackend::spawn(InMemoryComparisonApi::new()).await.unwrap();
    let mut config = ApiConfig::new(&backend.base_url(), Duration::from_secs(5)).unwrap();
    config.api_key = Some(SecretString::from("sk_test_123"));
    let http = HttpComparisonApi::new(&config).unwrap();

    http.get_comparison_properties(&anonymous("anon_auth"))
        .await
        .unwrap();

    assert_eq!(
        backend.requests()[0].authorization.as_deref(),
        Some("Bearer sk_test_123")
    );
}

#[tokio::test]
async fn test_store_over_http() {
    let catalog: Vec<_> = (0..5).map(|i| listing(&format!("L{i}"), 5000)).collect();
    let backend = FakeBackend::spawn(InMemoryComparisonApi::with_catalog(catalog.clone()))
        .await
        .unwrap();
    let visitor = anonymous("anon_e2e");
    let notifier = RecordingNotifier::new();
    let store = ComparisonStore::new(
        client(&backend),
        notifier.clone(),
        visitor.clone(),
        Duration::from_secs(5),
    );

    for property in &catalog[..4] {
        assert!(store.add(property).await.is_added());
    }
    assert!(matches!(
        store.add(&catalog[4]).await,
        AddOutcome::LimitReached
    ));
    assert_eq!(
        notifier.titles(NoticeKind::Warning),
        vec!["Comparison Limit Reached".to_string()]
    );

    assert!(store.remove(catalog[1].id).await.is_applied());
    assert_eq!(store.count(), 3);
    assert_eq!(backend.api().list(&visitor).len(), 3);

    backend.force_status(StatusCode::SERVICE_UNAVAILABLE, None);
    assert!(!store.clear().await.is_applied());
    assert_eq!(store.count(), 3);

    backend.reset();
    assert!(store.clear().await.is_applied());
    assert_eq!(store.count(), 0);
}
