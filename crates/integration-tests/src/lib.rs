//! Integration tests for the Bloom storefront.
//!
//! Each test spawns the full storefront router on an ephemeral port and
//! drives it over HTTP with a cookie-aware client, so sessions behave
//! exactly as they do in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bloom-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_pages` - Home, shop and product pages
//! - `storefront_cart` - Cart mutations and HTMX fragments
//! - `storefront_checkout` - Checkout flow and order confirmation
//! - `storefront_api` - `/api/arrangements` against a mocked Supabase

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use bloom_storefront::config::{StorefrontConfig, SupabaseConfig};
use bloom_storefront::services::OrderGateway;
use bloom_storefront::state::AppState;
use reqwest::{Client, redirect};
use secrecy::SecretString;
use url::Url;

/// Anon key used against the mock Supabase server.
pub const TEST_ANON_KEY: &str = "test-anon-key";

/// A storefront instance listening on a local port.
pub struct TestApp {
    pub address: SocketAddr,
    pub client: Client,
}

impl TestApp {
    /// Spawn a storefront with default services and no Supabase.
    pub async fn spawn() -> Self {
        Self::builder().spawn().await
    }

    /// Start configuring a storefront instance.
    #[must_use]
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder::default()
    }

    /// Absolute URL for a path on this instance.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.address)
    }

    /// GET a path.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request")
    }

    /// POST a form to a path.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to send POST request")
    }

    /// POST a form to a path as an HTMX request.
    pub async fn htmx_post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .expect("Failed to send HTMX request")
    }
}

/// Builder for [`TestApp`].
#[derive(Default)]
pub struct TestAppBuilder {
    supabase_url: Option<String>,
    orders: Option<Arc<dyn OrderGateway>>,
}

impl TestAppBuilder {
    /// Point `/api/arrangements` at a (mock) Supabase base URL.
    #[must_use]
    pub fn supabase(mut self, base_url: &str) -> Self {
        self.supabase_url = Some(base_url.to_string());
        self
    }

    /// Replace the order gateway.
    #[must_use]
    pub fn orders(mut self, orders: Arc<dyn OrderGateway>) -> Self {
        self.orders = Some(orders);
        self
    }

    /// Bind to an ephemeral port and serve in the background.
    pub async fn spawn(self) -> TestApp {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let address = listener.local_addr().expect("Failed to read local address");

        let mut config = StorefrontConfig::local(&format!("http://{address}"));
        config.port = address.port();
        config.static_dir = static_dir();
        config.supabase = self.supabase_url.map(|url| SupabaseConfig {
            url: Url::parse(&url).expect("Invalid Supabase URL"),
            anon_key: SecretString::from(TEST_ANON_KEY),
            table: "arrangements".to_string(),
            limit: 20,
        });

        let mut builder = AppState::builder(config);
        if let Some(orders) = self.orders {
            builder = builder.orders(orders);
        }
        let state = builder.build().expect("Failed to build app state");
        let app = bloom_storefront::app(state);

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        TestApp { address, client }
    }
}

/// The storefront's static asset directory.
fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/static")
}

/// Read the `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
