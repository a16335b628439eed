//! REST client for the BacklinkVista server.

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use backlink_vista_core::api::{
    AddFundsRequest, AuthResponse, CreateOrderRequest, ErrorBody, ListingQuery, LoginRequest,
    RegisterRequest, UpdateOrderStatusRequest, UpdateProfileRequest,
};
use backlink_vista_core::{
    Facets, FundsOffer, Listing, ListingId, Order, OrderId, OrderQuery, OrderStatus, OrderSummary,
    UserProfile, Wallet,
};

use crate::error::ApiError;

/// REST client.
///
/// Cheap to clone. Requests carry the bearer token given at construction.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl ApiClient {
    /// Create a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: Url, token: Option<SecretString>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("bv/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                token,
            }),
        })
    }

    /// Whether a bearer token is attached.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner.token.is_some()
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.send(Method::POST, "api/auth/register", Some(request)).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.send(Method::POST, "api/auth/login", Some(request)).await
    }

    /// Revoke the attached token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self.request(Method::POST, self.endpoint("api/auth/logout")?).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(error_from_response(status, &response.text().await?))
        }
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.get("api/auth/profile", &()).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn update_profile(
        &self,
        update: &UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        self.send(Method::PUT, "api/auth/profile", Some(update)).await
    }

    // =========================================================================
    // Marketplace
    // =========================================================================

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn websites(&self, query: &ListingQuery) -> Result<Vec<Listing>, ApiError> {
        self.get("api/marketplace/websites", query).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn website(&self, id: ListingId) -> Result<Listing, ApiError> {
        self.get(&format!("api/marketplace/websites/{id}"), &()).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn facets(&self) -> Result<Facets, ApiError> {
        self.get("api/marketplace/facets", &()).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        self.send(Method::POST, "api/orders", Some(request)).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn orders(&self, query: &OrderQuery) -> Result<Vec<Order>, ApiError> {
        self.get("api/orders", query).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.get(&format!("api/orders/{id}"), &()).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn order_summary(&self) -> Result<OrderSummary, ApiError> {
        self.get("api/orders/summary", &()).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn set_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let body = UpdateOrderStatusRequest { status };
        self.send(Method::PATCH, &format!("api/orders/{id}/status"), Some(&body))
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.send::<(), _>(Method::POST, &format!("api/orders/{id}/cancel"), None)
            .await
    }

    // =========================================================================
    // Billing
    // =========================================================================

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn wallet(&self) -> Result<Wallet, ApiError> {
        self.get("api/billing", &()).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn offers(&self) -> Result<Vec<FundsOffer>, ApiError> {
        self.get("api/billing/offers", &()).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or an error response.
    pub async fn add_funds(&self, amount: Decimal) -> Result<Wallet, ApiError> {
        self.send(Method::POST, "api/billing/funds", Some(&AddFundsRequest { amount }))
            .await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match &self.inner.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    #[instrument(skip(self, query))]
    async fn get<Q, T>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        Q: Serialize + Sync,
        T: DeserializeOwned,
    {
        let mut url = self.endpoint(path)?;
        let pairs = query_pairs(query)?;
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        let response = self.request(Method::GET, url).send().await?;
        handle_response(response).await
    }

    #[instrument(skip(self, body))]
    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let mut request = self.request(method, self.endpoint(path)?);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        handle_response(response).await
    }
}

/// Decode a success body, or turn an error status into `ApiError`.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    tracing::debug!(status = status.as_u16(), bytes = body.len(), "Response received");

    if status.is_success() {
        serde_json::from_str(&body)
            .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")))
    } else {
        Err(error_from_response(status, &body))
    }
}

/// Map an error status and its `{message, errors}` envelope to `ApiError`.
fn error_from_response(status: StatusCode, body: &str) -> ApiError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return ApiError::RateLimited;
    }

    let envelope = serde_json::from_str::<ErrorBody>(body).unwrap_or_else(|_| {
        let text = body.trim();
        ErrorBody::new(if text.is_empty() {
            status.canonical_reason().unwrap_or("Request failed")
        } else {
            text
        })
    });

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(envelope.message),
        StatusCode::NOT_FOUND => ApiError::NotFound(envelope.message),
        _ => ApiError::Api {
            status: status.as_u16(),
            message: envelope.message,
            errors: envelope.errors,
        },
    }
}

/// Flatten a query struct into string pairs, skipping nulls.
fn query_pairs<Q: Serialize>(query: &Q) -> Result<Vec<(String, String)>, ApiError> {
    let value = serde_json::to_value(query)
        .map_err(|e| ApiError::Parse(format!("Failed to encode query: {e}")))?;

    let serde_json::Value::Object(map) = value else {
        return Ok(Vec::new());
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

/// Parse and normalize the server base URL.
///
/// # Errors
///
/// Returns a message if the URL is malformed or not http(s).
pub fn parse_server_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| format!("invalid server URL: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme `{}`", url.scheme()));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err("server URL needs a host".to_string());
    }
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use backlink_vista_core::OrderPeriod;

    use super::*;

    #[test]
    fn test_parse_server_url_normalizes() {
        let url = parse_server_url("http://localhost:3000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/");
        assert_eq!(
            url.join("api/health").unwrap().as_str(),
            "http://localhost:3000/api/health"
        );

        let prefixed = parse_server_url("https://example.com/market?x=1").unwrap();
        assert_eq!(
            prefixed.join("api/orders").unwrap().as_str(),
            "https://example.com/market/api/orders"
        );
    }

    #[test]
    fn test_parse_server_url_rejects_bad_input() {
        assert!(parse_server_url("not a url").is_err());
        assert!(parse_server_url("ftp://example.com").is_err());
        assert!(parse_server_url("mailto:a@example.com").is_err());
    }

    #[test]
    fn test_listing_query_pairs_use_wire_names() {
        let query = ListingQuery {
            min_dr: Some(50),
            language: Some("English,German".to_string()),
            max_price: Some(Decimal::from_str("99.50").unwrap()),
            ..ListingQuery::default()
        };
        let mut pairs = query_pairs(&query).unwrap();
        pairs.sort();

        assert_eq!(
            pairs,
            vec![
                ("language".to_string(), "English,German".to_string()),
                ("maxPrice".to_string(), "99.50".to_string()),
                ("minDR".to_string(), "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_order_query_pairs() {
        let query = OrderQuery {
            status: Some(OrderStatus::InProgress),
            period: Some(OrderPeriod::Last30Days),
            search: None,
        };
        let mut pairs = query_pairs(&query).unwrap();
        pairs.sort();

        assert_eq!(
            pairs,
            vec![
                ("period".to_string(), "30d".to_string()),
                ("status".to_string(), "in-progress".to_string()),
            ]
        );
        assert!(query_pairs(&()).unwrap().is_empty());
    }

    #[test]
    fn test_error_mapping() {
        let err = error_from_response(StatusCode::UNAUTHORIZED, r#"{"message":"Unauthorized"}"#);
        assert!(matches!(err, ApiError::Unauthorized(m) if m == "Unauthorized"));

        let err = error_from_response(StatusCode::NOT_FOUND, r#"{"message":"Order not found"}"#);
        assert!(matches!(err, ApiError::NotFound(m) if m == "Order not found"));

        let err = error_from_response(
            StatusCode::BAD_REQUEST,
            r#"{"message":"User already exists","errors":{"email":"taken"}}"#,
        );
        match err {
            ApiError::Api {
                status,
                message,
                errors,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "User already exists");
                assert_eq!(errors.get("email").map(String::as_str), Some("taken"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_error_mapping_non_json_bodies() {
        assert!(matches!(
            error_from_response(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests! Wait for 1s"),
            ApiError::RateLimited
        ));

        let err = error_from_response(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.to_string(), "Bad Gateway");
    }
}
