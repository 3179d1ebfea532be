//! Remote Fetcher
//!
//! The remote data-fetch collaborator and its HTTP implementation.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{CacheError, Result};

// == Remote Fetcher ==
/// Fetches the value for a request that missed the cache.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Fails with [`CacheError::FetchFailure`]. Callers do not retry.
    async fn fetch(&self, name: &str, params: &Value, body: &Value) -> Result<String>;
}

// == HTTP Fetcher ==
/// Posts `{ "params", "body" }` as JSON to `{base_url}/{name}`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, name: &str, params: &Value, body: &Value) -> Result<String> {
        let url = self.url_for(name);
        debug!("Fetching {}", url);

        let response = self
            .client
            .post(url.as_str())
            .json(&json!({ "params": params, "body": body }))
            .send()
            .await
            .map_err(|e| CacheError::FetchFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::FetchFailure(format!("{} returned {}", url, status)));
        }

        let document: Value = response
            .json()
            .await
            .map_err(|e| CacheError::FetchFailure(format!("invalid JSON from {}: {}", url, e)))?;

        extract_payload(&url, document)
    }
}

/// Turns an upstream JSON document into the cached value.
///
/// A non-null `errors` member is a failure; otherwise `data` is returned, or
/// the whole document when there is no `data`.
fn extract_payload(url: &str, mut document: Value) -> Result<String> {
    if let Some(errors) = document.get("errors").filter(|e| !e.is_null()) {
        let message = errors
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Something went wrong for {}!", url));
        return Err(CacheError::FetchFailure(message));
    }

    if let Some(data) = document.get_mut("data") {
        return Ok(data.take().to_string());
    }
    Ok(document.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, routing::post, Json, Router};

    #[test]
    fn test_extract_payload_data() {
        let doc = json!({"data": {"users": [1, 2]}});
        assert_eq!(extract_payload("u", doc).unwrap(), r#"{"users":[1,2]}"#);
    }

    #[test]
    fn test_extract_payload_without_data() {
        let doc = json!({"users": []});
        assert_eq!(extract_payload("u", doc).unwrap(), r#"{"users":[]}"#);
    }

    #[test]
    fn test_extract_payload_errors() {
        let doc = json!({"errors": {"message": "forbidden"}});
        assert_eq!(
            extract_payload("u", doc),
            Err(CacheError::FetchFailure("forbidden".to_string()))
        );

        let doc = json!({"errors": [1]});
        assert_eq!(
            extract_payload("http://up/x", doc),
            Err(CacheError::FetchFailure("Something went wrong for http://up/x!".to_string()))
        );
    }

    #[test]
    fn test_null_errors_is_success() {
        let doc = json!({"data": 1, "errors": null});
        assert_eq!(extract_payload("u", doc).unwrap(), "1");
    }

    async fn spawn_upstream() -> String {
        let app = Router::new().route(
            "/:name",
            post(|Path(name): Path<String>, Json(req): Json<Value>| async move {
                if name == "broken" {
                    return (
                        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({})),
                    );
                }
                (
                    axum::http::StatusCode::OK,
                    Json(json!({"data": {"name": name, "page": req["params"]["page"]}})),
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_http_fetcher_posts_request() {
        let fetcher = HttpFetcher::new(spawn_upstream().await);

        let value = fetcher
            .fetch("getUsers", &json!({"page": 2}), &Value::Null)
            .await
            .unwrap();

        let parsed: Value = serde_json::from_str(&value).unwrap();
        assert_eq!(parsed, json!({"name": "getUsers", "page": 2}));
    }

    #[tokio::test]
    async fn test_http_fetcher_status_failure() {
        let fetcher = HttpFetcher::new(spawn_upstream().await);

        let result = fetcher.fetch("broken", &Value::Null, &Value::Null).await;

        assert!(matches!(result, Err(CacheError::FetchFailure(msg)) if msg.contains("500")));
    }
}
