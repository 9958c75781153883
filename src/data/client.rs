//! REST data API client
//!
//! Fetches every record of an endpoint by walking `limit`/`offset` pages until
//! the server reports no more data. Pages are requested strictly one after the
//! other in increasing offset order.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use thiserror::Error;

use super::Record;
use crate::config::ApiConfig;

/// Timeout for the connectivity probe, independent of the fetch timeout
const CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Page size and record cap for one endpoint fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Records requested per page
    pub limit: usize,
    /// Stop once this many records have been accumulated
    pub max_records: Option<usize>,
}

/// Errors that can occur when talking to the data API
#[derive(Debug, Error)]
pub enum DataError {
    /// The HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, DNS or timeout failure
    #[error("request to '{endpoint}' at offset {offset} failed: {source}")]
    Transport {
        endpoint: String,
        offset: usize,
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("'{endpoint}' at offset {offset} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        offset: usize,
        status: u16,
        body: String,
    },

    /// The body was not a JSON object
    #[error("could not decode '{endpoint}' page at offset {offset}: {reason}")]
    Decode {
        endpoint: String,
        offset: usize,
        reason: String,
    },
}

/// A failed endpoint fetch together with the records received before the failure
#[derive(Debug, Error)]
#[error("{cause} ({} records fetched before the failure)", .partial.len())]
pub struct FetchError {
    #[source]
    pub cause: DataError,
    pub partial: Vec<Record>,
}

impl FetchError {
    /// Discards the cause and keeps whatever was fetched
    pub fn into_partial(self) -> Vec<Record> {
        self.partial
    }
}

/// Anything that can produce the raw records of an endpoint
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetches all records of `endpoint`, honoring the page size and record cap
    async fn fetch_endpoint(
        &self,
        endpoint: &str,
        page: PageRequest,
    ) -> Result<Vec<Record>, FetchError>;
}

/// One decoded page
struct Page {
    /// `None` when the `items` field is missing or not an array
    items: Option<Vec<Record>>,
    /// Entries in `items` before non-objects were skipped
    raw_len: usize,
    has_more: bool,
}

/// Client for an ORDS-style REST API (`items` + `hasMore` pages, Basic auth)
#[derive(Debug, Clone)]
pub struct OrdsClient {
    client: Client,
    base_url: String,
    username: String,
    password: SecretString,
}

impl OrdsClient {
    /// Create a client from the API settings
    ///
    /// # Arguments
    /// * `config` - Base URL, credentials and per-request timeout
    ///
    /// # Returns
    /// * `Ok(OrdsClient)` - Ready to fetch
    /// * `Err(DataError::Client)` - If the TLS backend cannot be initialized
    pub fn new(config: &ApiConfig) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(DataError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: SecretString::new(config.password.expose_secret().clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe the base URL to see whether the server is up
    ///
    /// A `401` still counts as reachable: the server answered, it only wants
    /// credentials.
    pub async fn check_connection(&self) -> Result<(), DataError> {
        let response = self
            .client
            .get(&self.base_url)
            .timeout(CHECK_TIMEOUT)
            .send()
            .await
            .map_err(|source| DataError::Transport {
                endpoint: String::new(),
                offset: 0,
                source,
            })?;

        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::info!(base_url = %self.base_url, status = status.as_u16(), "Data API reachable");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(base_url = %self.base_url, status = status.as_u16(), "Data API check failed");
        Err(DataError::Status {
            endpoint: String::new(),
            offset: 0,
            status: status.as_u16(),
            body,
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}/", self.base_url, endpoint)
    }

    async fn fetch_page(
        &self,
        endpoint: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Page, DataError> {
        let response = self
            .client
            .get(self.endpoint_url(endpoint))
            .query(&[("limit", limit), ("offset", offset)])
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| DataError::Transport {
                endpoint: endpoint.to_string(),
                offset,
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| DataError::Transport {
            endpoint: endpoint.to_string(),
            offset,
            source,
        })?;

        if !status.is_success() {
            return Err(DataError::Status {
                endpoint: endpoint.to_string(),
                offset,
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| DataError::Decode {
            endpoint: endpoint.to_string(),
            offset,
            reason: e.to_string(),
        })?;

        parse_page(value).ok_or_else(|| DataError::Decode {
            endpoint: endpoint.to_string(),
            offset,
            reason: "response body is not a JSON object".to_string(),
        })
    }
}

#[async_trait]
impl RecordSource for OrdsClient {
    async fn fetch_endpoint(
        &self,
        endpoint: &str,
        page: PageRequest,
    ) -> Result<Vec<Record>, FetchError> {
        let limit = page.limit.max(1);
        let mut records: Vec<Record> = Vec::new();
        let mut offset = 0;

        tracing::debug!(endpoint, limit, max_records = ?page.max_records, "Fetching endpoint");

        loop {
            let current = match self.fetch_page(endpoint, limit, offset).await {
                Ok(current) => current,
                Err(cause) => {
                    match &cause {
                        DataError::Transport { source, .. } => tracing::error!(
                            endpoint,
                            offset,
                            timeout = source.is_timeout(),
                            error = %source,
                            "Request failed"
                        ),
                        DataError::Status { status, body, .. } => tracing::error!(
                            endpoint,
                            offset,
                            status,
                            body = %body,
                            "Unexpected HTTP status"
                        ),
                        other => tracing::error!(endpoint, offset, error = %other, "Fetch failed"),
                    }
                    return Err(FetchError {
                        cause,
                        partial: records,
                    });
                }
            };

            let Some(items) = current.items else {
                if records.is_empty() {
                    tracing::warn!(endpoint, offset, "Response has no 'items' array");
                }
                break;
            };
            if current.raw_len == 0 {
                break;
            }

            tracing::debug!(endpoint, offset, records = items.len(), "Received page");
            records.extend(items);

            if let Some(max) = page.max_records {
                if records.len() >= max {
                    records.truncate(max);
                    tracing::info!(endpoint, max_records = max, "Record cap reached");
                    break;
                }
            }

            if !current.has_more {
                break;
            }
            offset += limit;
        }

        tracing::info!(endpoint, records = records.len(), "Fetched endpoint");
        Ok(records)
    }
}

/// Splits a page body into its items and continuation flag
///
/// Returns `None` when the body is not a JSON object.
fn parse_page(value: Value) -> Option<Page> {
    let Value::Object(mut body) = value else {
        return None;
    };

    let has_more = body.get("hasMore").is_some_and(truthy);
    let (items, raw_len) = match body.remove("items") {
        Some(Value::Array(entries)) => {
            let raw_len = entries.len();
            let items = entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Value::Object(record) => Some(record),
                    _ => None,
                })
                .collect();
            (Some(items), raw_len)
        }
        _ => (None, 0),
    };

    Some(Page {
        items,
        raw_len,
        has_more,
    })
}

/// Boolean-ish reading of `hasMore`
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            username: "user".to_string(),
            password: SecretString::new("pass".to_string()),
            page_size: 10,
            max_records: None,
            request_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_endpoint_url_keeps_trailing_slash() {
        let client = OrdsClient::new(&test_config("http://localhost:8080/ords/h/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/ords/h");
        assert_eq!(
            client.endpoint_url("peso_vs_estancia"),
            "http://localhost:8080/ords/h/peso_vs_estancia/"
        );
    }

    #[test]
    fn test_parse_page_reads_items_and_has_more() {
        let page = parse_page(json!({"items": [{"a": 1}, {"a": 2}], "hasMore": true})).unwrap();
        assert_eq!(page.items.unwrap().len(), 2);
        assert_eq!(page.raw_len, 2);
        assert!(page.has_more);
    }

    #[test]
    fn test_parse_page_skips_non_object_items() {
        let page = parse_page(json!({"items": [{"a": 1}, 7, "x", null]})).unwrap();
        assert_eq!(page.items.unwrap().len(), 1);
        assert_eq!(page.raw_len, 4);
        assert!(!page.has_more);
    }

    #[test]
    fn test_parse_page_missing_items() {
        let page = parse_page(json!({"hasMore": true})).unwrap();
        assert!(page.items.is_none());

        let page = parse_page(json!({"items": "nope"})).unwrap();
        assert!(page.items.is_none());
    }

    #[test]
    fn test_parse_page_rejects_non_object_body() {
        assert!(parse_page(json!([1, 2, 3])).is_none());
    }

    #[test]
    fn test_has_more_is_boolean_ish() {
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!("true")));
        assert!(truthy(&json!("TRUE")));
        assert!(truthy(&json!("1")));
        assert!(truthy(&json!(1)));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!("false")));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!({})));
    }

    #[test]
    fn test_fetch_error_keeps_partial_records() {
        let err = FetchError {
            cause: DataError::Decode {
                endpoint: "e".to_string(),
                offset: 20,
                reason: "bad".to_string(),
            },
            partial: vec![Record::new(), Record::new()],
        };
        assert!(err.to_string().contains("2 records fetched"));
        assert_eq!(err.into_partial().len(), 2);
    }
}
