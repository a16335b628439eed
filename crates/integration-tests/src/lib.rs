//! Integration tests for BacklinkVista.
//!
//! Each test boots the real router on an ephemeral port and drives it over
//! HTTP with `reqwest`, so extractors, middleware and error envelopes are
//! exercised exactly as a client sees them.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p backlink-vista-integration-tests
//! ```

use std::net::SocketAddr;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use uuid::Uuid;

use backlink_vista_core::api::AuthResponse;
use backlink_vista_server::app;
use backlink_vista_server::config::ServerConfig;
use backlink_vista_server::state::AppState;
use backlink_vista_server::store::Catalog;

/// Password used by every test account.
pub const PASSWORD: &str = "correct horse battery";

/// A running server and an HTTP client pointed at it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Boot a server with the built-in catalog and no auth rate limit.
    pub async fn new() -> Self {
        Self::with_config(ServerConfig {
            auth_rate_limit: false,
            ..ServerConfig::default()
        })
        .await
    }

    /// Boot a server with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the catalog cannot be loaded or no port can be bound.
    pub async fn with_config(config: ServerConfig) -> Self {
        let catalog = Catalog::builtin().expect("built-in catalog loads");
        let state = AppState::new(config, catalog);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local address");

        tokio::spawn(async move {
            axum::serve(
                listener,
                app(state).into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("server runs");
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Start a request, with a bearer token when one is given.
    #[must_use]
    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str, token: &str) -> Response {
        self.request(Method::GET, path, Some(token))
            .send()
            .await
            .expect("request sent")
    }

    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Response {
        self.request(method, path, token)
            .json(body)
            .send()
            .await
            .expect("request sent")
    }

    /// Register a fresh account with a unique email.
    ///
    /// # Panics
    ///
    /// Panics if registration does not succeed.
    pub async fn register_user(&self) -> AuthResponse {
        let email = format!("buyer-{}@example.com", Uuid::new_v4().simple());
        let response = self
            .send_json(
                Method::POST,
                "/api/auth/register",
                None,
                &json!({
                    "email": email,
                    "password": PASSWORD,
                    "firstName": "Test",
                    "lastName": "Buyer",
                }),
            )
            .await;
        assert_eq!(response.status(), 201, "registration failed");
        response.json().await.expect("auth response")
    }

    /// Register an account and return only its token.
    pub async fn token(&self) -> String {
        self.register_user().await.token
    }
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not JSON.
pub async fn body(response: Response) -> Value {
    response.json().await.expect("JSON body")
}
