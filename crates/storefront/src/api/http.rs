//! REST client for the marketplace comparison API.
//!
//! Uses `reqwest` with a per-request timeout taken from [`ApiConfig`].
//! Responses are wrapped in a `{"data": ...}` envelope.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use stayhub_core::{AnonymousId, Identity, Property, PropertyId, UserId};
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, ComparisonApi};
use crate::config::ApiConfig;

/// Maximum number of body characters kept in error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// Client for the marketplace comparison endpoints.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct HttpComparisonApi {
    inner: Arc<HttpComparisonApiInner>,
}

struct HttpComparisonApiInner {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

/// Wrapper for single-resource and list responses.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    data: T,
}

/// Body of `POST /comparisons`.
#[derive(Debug, Serialize)]
struct AddComparisonBody<'a> {
    property_id: PropertyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    anonymous_id: Option<&'a AnonymousId>,
}

impl<'a> AddComparisonBody<'a> {
    fn new(property_id: PropertyId, identity: &'a Identity) -> Self {
        match identity {
            Identity::User(id) => Self {
                property_id,
                user_id: Some(*id),
                anonymous_id: None,
            },
            Identity::Anonymous(id) => Self {
                property_id,
                user_id: None,
                anonymous_id: Some(id),
            },
        }
    }
}

impl HttpComparisonApi {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let auth_value = format!("Bearer {}", key.expose_secret());
            headers.insert(
                "Authorization",
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| ApiError::Config(format!("Invalid API key format: {e}")))?,
            );
        }

        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpComparisonApiInner {
                client,
                base_url: config.base_url.clone(),
                timeout: config.request_timeout,
            }),
        })
    }

    /// Fetch a single listing from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the listing does not exist, or another
    /// error if the request fails.
    #[instrument(skip(self), fields(property_id = %property_id))]
    pub async fn get_property(&self, property_id: PropertyId) -> Result<Property, ApiError> {
        let url = self.url(&format!("properties/{property_id}"))?;
        let response = self.send(self.inner.client.get(url)).await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(format!("Property not found: {property_id}")));
        }

        let body = check_status(response).await?.text().await?;
        let parsed: ApiResponse<Property> = parse_body(&body)?;
        Ok(parsed.data)
    }

    /// Resolve a path relative to the configured base URL.
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a request, mapping client-side deadline expiry to `ApiError::Timeout`.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.inner.timeout)
            } else {
                ApiError::Http(e)
            }
        })
    }
}

impl ComparisonApi for HttpComparisonApi {
    #[instrument(skip(self), fields(identity = %identity))]
    async fn get_comparison_properties(
        &self,
        identity: &Identity,
    ) -> Result<Vec<Property>, ApiError> {
        let url = self.url("comparisons")?;
        let request = self
            .inner
            .client
            .get(url)
            .query(&[identity.query_pair()]);

        let body = check_status(self.send(request).await?).await?.text().await?;
        let parsed: ApiResponse<Vec<Property>> = parse_body(&body)?;

        debug!(count = parsed.data.len(), "Fetched comparison list");
        Ok(parsed.data)
    }

    #[instrument(skip(self), fields(property_id = %property_id, identity = %identity))]
    async fn add_to_comparison(
        &self,
        property_id: PropertyId,
        identity: &Identity,
    ) -> Result<(), ApiError> {
        let url = self.url("comparisons")?;
        let request = self
            .inner
            .client
            .post(url)
            .json(&AddComparisonBody::new(property_id, identity));

        check_status(self.send(request).await?).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(property_id = %property_id, identity = %identity))]
    async fn remove_from_comparison(
        &self,
        property_id: PropertyId,
        identity: &Identity,
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("comparisons/{property_id}"))?;
        let request = self
            .inner
            .client
            .delete(url)
            .query(&[identity.query_pair()]);

        let response = self.send(request).await?;

        // Removing an entry that is already gone is not a failure
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("Property was not in the comparison list");
            return Ok(());
        }

        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(identity = %identity))]
    async fn clear_comparison(&self, identity: &Identity) -> Result<(), ApiError> {
        let url = self.url("comparisons")?;
        let request = self
            .inner
            .client
            .delete(url)
            .query(&[identity.query_pair()]);

        check_status(self.send(request).await?).await?;
        Ok(())
    }
}

/// Turn rate limiting and non-success statuses into errors.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(ApiError::RateLimited(retry_after));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Marketplace API returned non-success status"
        );
        return Err(ApiError::Api {
            status: status.as_u16(),
            message: body.chars().take(ERROR_BODY_LIMIT).collect(),
        });
    }

    Ok(response)
}

/// Parse a JSON body, logging a prefix of it on failure.
fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse marketplace API response"
        );
        ApiError::Parse(e)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_add_body_for_user() {
        let property_id = PropertyId::generate();
        let user_id = UserId::generate();
        let identity = Identity::User(user_id);

        let json = serde_json::to_value(AddComparisonBody::new(property_id, &identity)).unwrap();
        assert_eq!(json["property_id"], property_id.to_string());
        assert_eq!(json["user_id"], user_id.to_string());
        assert!(json.get("anonymous_id").is_none());
    }

    #[test]
    fn test_add_body_for_anonymous() {
        let property_id = PropertyId::generate();
        let identity = Identity::Anonymous(AnonymousId::parse("anon_42").unwrap());

        let json = serde_json::to_value(AddComparisonBody::new(property_id, &identity)).unwrap();
        assert_eq!(json["anonymous_id"], "anon_42");
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_parse_list_envelope() {
        let body = r#"{"data": [{
            "id": "6f1c2a4e-8a7b-4c1d-9e2f-3a4b5c6d7e8f",
            "title": "Green Nest PG",
            "price": {"amount": "6500", "currency_code": "INR"}
        }]}"#;

        let parsed: ApiResponse<Vec<Property>> = parse_body(body).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].title, "Green Nest PG");
    }

    #[test]
    fn test_parse_body_error() {
        let result: Result<ApiResponse<Vec<Property>>, _> = parse_body("<html>oops</html>");
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }

    #[test]
    fn test_url_join_keeps_prefix() {
        let config = ApiConfig::new("http://localhost:9000/api/v2", Duration::from_secs(1)).unwrap();
        let api = HttpComparisonApi::new(&config).unwrap();
        assert_eq!(
            api.url("comparisons/abc").unwrap().as_str(),
            "http://localhost:9000/api/v2/comparisons/abc"
        );
    }
}
