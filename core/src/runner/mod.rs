#![deny(missing_docs)]

//! # Endpoint Test Runner
//!
//! Issues one HTTP request for an endpoint definition and reports the raw
//! outcome. Non-2xx statuses are outcomes, not errors.
//!
//! - **request**: Pure request construction (URL, headers, body).
//! - **transport**: The network seam.

pub mod request;
pub mod transport;

use crate::endpoint::EndpointDefinition;
use crate::error::AppResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub use request::{build_request, PreparedRequest};
pub use transport::{HttpTransport, Transport, TransportResponse};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default cap on captured response bodies (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Runner limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Response bodies longer than this are truncated.
    pub max_body_bytes: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Result of one test invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Method sent.
    pub method: String,
    /// Fully built URL.
    pub url: String,
    /// Response status; absent when the request was not delivered.
    pub status_code: Option<u16>,
    /// Response headers.
    pub headers: IndexMap<String, String>,
    /// Response body text.
    pub body: String,
    /// Wall-clock time of the exchange.
    pub elapsed_ms: u64,
    /// Whether `body` was cut at the configured maximum.
    pub truncated: bool,
    /// Delivery failure, when the request never got a response.
    pub error: Option<String>,
}

impl TestOutcome {
    /// Outcome for a request that was built but not delivered.
    pub fn undelivered(request: &PreparedRequest, elapsed: Duration, error: String) -> Self {
        Self {
            method: request.method.clone(),
            url: request.url.to_string(),
            status_code: None,
            headers: IndexMap::new(),
            body: String::new(),
            elapsed_ms: millis(elapsed),
            truncated: false,
            error: Some(error),
        }
    }
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Builds requests from endpoint definitions and sends them through `T`.
#[derive(Debug, Clone)]
pub struct TestRunner<T> {
    transport: T,
}

impl TestRunner<HttpTransport> {
    /// A runner backed by a real HTTP client.
    pub fn http(config: &RunnerConfig) -> AppResult<Self> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: Transport> TestRunner<T> {
    /// Wraps a transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Validates inputs and builds the request without sending it.
    pub fn prepare(&self, endpoint: &EndpointDefinition, base_url: &str) -> AppResult<PreparedRequest> {
        build_request(endpoint, base_url)
    }

    /// Sends a prepared request. Delivery failures are `AppError::Network`.
    pub async fn execute(&self, request: &PreparedRequest) -> AppResult<TestOutcome> {
        log::info!("testing {} {}", request.method, request.url);
        let started = Instant::now();
        let response = self.transport.send(request).await?;
        let elapsed_ms = millis(started.elapsed());
        log::debug!(
            "{} {} -> {} in {} ms",
            request.method,
            request.url,
            response.status,
            elapsed_ms
        );

        Ok(TestOutcome {
            method: request.method.clone(),
            url: request.url.to_string(),
            status_code: Some(response.status),
            headers: response.headers,
            body: response.body,
            elapsed_ms,
            truncated: response.truncated,
            error: None,
        })
    }

    /// Builds and sends the request for `endpoint`.
    ///
    /// Errors: `InvalidBaseUrl`, `MissingRequiredParameter` and
    /// `InvalidRequest` before any network call; `Network` when not delivered.
    pub async fn test(&self, endpoint: &EndpointDefinition, base_url: &str) -> AppResult<TestOutcome> {
        let request = self.prepare(endpoint, base_url)?;
        self.execute(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::HttpMethod;
    use crate::error::AppError;
    use std::cell::RefCell;

    struct Recording {
        sent: RefCell<Vec<PreparedRequest>>,
        reply: AppResult<TransportResponse>,
    }

    impl Transport for Recording {
        async fn send(&self, request: &PreparedRequest) -> AppResult<TransportResponse> {
            self.sent.borrow_mut().push(request.clone());
            match &self.reply {
                Ok(response) => Ok(response.clone()),
                Err(e) => Err(AppError::Network(e.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_non_2xx_is_an_outcome() {
        let runner = TestRunner::new(Recording {
            sent: RefCell::new(Vec::new()),
            reply: Ok(TransportResponse {
                status: 404,
                body: "not here".into(),
                ..Default::default()
            }),
        });
        let ep = EndpointDefinition::new(HttpMethod::Delete, "/items", "x");

        let outcome = runner.test(&ep, "http://localhost:9").await.unwrap();
        assert_eq!(outcome.status_code, Some(404));
        assert_eq!(outcome.body, "not here");
        assert_eq!(outcome.method, "DELETE");
        assert_eq!(outcome.url, "http://localhost:9/items");
        assert!(outcome.error.is_none());
        assert_eq!(runner.transport.sent.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_build_errors_skip_transport() {
        let runner = TestRunner::new(Recording {
            sent: RefCell::new(Vec::new()),
            reply: Ok(TransportResponse::default()),
        });
        let ep = EndpointDefinition::new(HttpMethod::Get, "/users/{id}", "x");

        let err = runner.test(&ep, "http://localhost").await.unwrap_err();
        assert!(matches!(err, AppError::MissingRequiredParameter(_)));
        assert!(runner.transport.sent.borrow().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_body_bytes, 1_048_576);
    }
}
