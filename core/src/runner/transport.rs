//! # Transport
//!
//! The single network seam of the test runner. `HttpTransport` sends through
//! `reqwest`; tests substitute their own implementation to observe calls.

use crate::error::{AppError, AppResult};
use crate::runner::request::PreparedRequest;
use crate::runner::RunnerConfig;
use indexmap::map::Entry;
use indexmap::IndexMap;
use reqwest::redirect::Policy;
use reqwest::{Client, Method};

/// Raw response captured from one request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers; repeated names joined with `", "`.
    pub headers: IndexMap<String, String>,
    /// Body text (lossy UTF-8), cut at the configured limit.
    pub body: String,
    /// Whether the body was cut.
    pub truncated: bool,
}

/// Sends exactly one request per call.
///
/// A returned `Err` must be `AppError::Network` when the request was not
/// delivered; any HTTP status is a successful response.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Sends `request` and captures the response.
    async fn send(&self, request: &PreparedRequest) -> AppResult<TransportResponse>;
}

/// `reqwest`-backed transport. Redirects are not followed.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    max_body_bytes: usize,
}

impl HttpTransport {
    /// Builds a client with the configured timeout.
    pub fn new(config: &RunnerConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|e| AppError::Network(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &PreparedRequest) -> AppResult<TransportResponse> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| AppError::InvalidRequest(format!("invalid method '{}'", request.method)))?;

        let mut builder = self.client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let mut response = builder.send().await.map_err(network_error)?;
        let status = response.status().as_u16();

        let mut headers: IndexMap<String, String> = IndexMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            match headers.entry(name.as_str().to_string()) {
                Entry::Occupied(mut existing) => {
                    let joined = existing.get_mut();
                    joined.push_str(", ");
                    joined.push_str(&value);
                }
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
            }
        }

        let mut body = Vec::new();
        let mut truncated = false;
        while let Some(chunk) = response.chunk().await.map_err(network_error)? {
            let remaining = self.max_body_bytes.saturating_sub(body.len());
            if chunk.len() > remaining {
                body.extend_from_slice(&chunk[..remaining]);
                truncated = true;
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(TransportResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
            truncated,
        })
    }
}

fn network_error(err: reqwest::Error) -> AppError {
    let kind = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };

    let mut detail = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    AppError::Network(format!("{}: {}", kind, detail))
}
