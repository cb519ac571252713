//! Hosted table service client for the arrangements endpoint.
//!
//! Talks to Supabase's `PostgREST` interface with `reqwest` 0.13. Rows are
//! returned exactly as the service sends them. Responses are cached using
//! `moka` (60-second TTL).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::SupabaseConfig;

/// Errors that can occur when querying the hosted table service.
#[derive(Debug, Error)]
pub enum ArrangementsError {
    /// No service configured.
    #[error("Arrangements service is not configured")]
    NotConfigured,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Response body was not a JSON array of rows.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The table URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Client for the arrangements table.
#[derive(Clone)]
pub struct ArrangementsClient {
    inner: Arc<ArrangementsClientInner>,
}

struct ArrangementsClientInner {
    client: reqwest::Client,
    endpoint: Url,
    anon_key: String,
    limit: u32,
    cache: Cache<u32, Arc<Vec<Value>>>,
}

impl ArrangementsClient {
    /// Create a new client for the configured table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table URL cannot be built from the project URL.
    pub fn new(config: &SupabaseConfig) -> Result<Self, ArrangementsError> {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(60))
            .build();

        let endpoint = config
            .url
            .join(&format!("rest/v1/{}", config.table))?;

        Ok(Self {
            inner: Arc::new(ArrangementsClientInner {
                client: reqwest::Client::new(),
                endpoint,
                anon_key: config.anon_key.expose_secret().to_string(),
                limit: config.limit,
                cache,
            }),
        })
    }

    /// Fetch up to the configured number of rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service answers with a
    /// non-success status, or the body is not a JSON array.
    #[instrument(skip(self), fields(limit = self.inner.limit))]
    pub async fn list(&self) -> Result<Arc<Vec<Value>>, ArrangementsError> {
        let limit = self.inner.limit;

        if let Some(rows) = self.inner.cache.get(&limit).await {
            debug!("Cache hit for arrangements");
            return Ok(rows);
        }

        let mut url = self.inner.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("limit", &limit.to_string());

        let response = self
            .inner
            .client
            .get(url)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(&self.inner.anon_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Arrangements service returned non-success status"
            );
            return Err(ArrangementsError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        let rows: Vec<Value> = serde_json::from_str(&body)?;
        let rows = Arc::new(rows);

        self.inner.cache.insert(limit, Arc::clone(&rows)).await;
        debug!(count = rows.len(), "Fetched arrangements");

        Ok(rows)
    }
}

/// Pull the `message` field out of a `PostgREST` error body, if any.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use secrecy::SecretString;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(server: &MockServer) -> SupabaseConfig {
        SupabaseConfig {
            url: Url::parse(&server.uri()).unwrap(),
            anon_key: SecretString::from("anon-key-for-tests"),
            table: "arrangements".to_string(),
            limit: 12,
        }
    }

    #[test]
    fn test_upstream_message_prefers_json_message() {
        let body = r#"{"code":"42P01","message":"relation does not exist"}"#;
        assert_eq!(upstream_message(body), "relation does not exist");
        assert_eq!(upstream_message("plain failure"), "plain failure");
    }

    #[tokio::test]
    async fn test_list_sends_query_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/arrangements"))
            .and(query_param("select", "*"))
            .and(query_param("limit", "12"))
            .and(header("apikey", "anon-key-for-tests"))
            .and(header("authorization", "Bearer anon-key-for-tests"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"id": 1, "name": "Peony Cloud"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ArrangementsClient::new(&config(&server)).unwrap();
        let rows = client.list().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Peony Cloud");
    }

    #[tokio::test]
    async fn test_list_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/arrangements"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ArrangementsClient::new(&config(&server)).unwrap();
        client.list().await.unwrap();
        client.list().await.unwrap();
    }

    #[tokio::test]
    async fn test_list_maps_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"message": "relation does not exist"})),
            )
            .mount(&server)
            .await;

        let client = ArrangementsClient::new(&config(&server)).unwrap();
        let err = client.list().await.unwrap_err();

        assert!(matches!(
            err,
            ArrangementsError::Upstream { status: 404, ref message } if message == "relation does not exist"
        ));
    }
}
