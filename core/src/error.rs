//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// Every variant except `Io` carries a user-facing diagnostic, so String
/// conversions are opted out of `From` and variants are built explicitly.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Input is not UTF-8 text or not a JSON/YAML document.
    #[from(ignore)]
    #[display("Unsupported format: {_0}")]
    UnsupportedFormat(String),

    /// Parsed document is not OpenAPI 3.x (Swagger 2.0 or no `openapi` field).
    #[from(ignore)]
    #[display("Unsupported specification version: {_0}")]
    UnsupportedSpecVersion(String),

    /// Document parsed but is structurally invalid OpenAPI.
    #[from(ignore)]
    #[display("Malformed document: {_0}")]
    MalformedDocument(String),

    /// A required path parameter has no value.
    #[from(ignore)]
    #[display("Missing required parameter: {_0}")]
    MissingRequiredParameter(String),

    /// The base URL is not an absolute HTTP(S) URL.
    #[from(ignore)]
    #[display("Invalid base URL: {_0}")]
    InvalidBaseUrl(String),

    /// A request could not be built from the endpoint definition (e.g. bad header).
    #[from(ignore)]
    #[display("Invalid request: {_0}")]
    InvalidRequest(String),

    /// The test request could not be delivered.
    #[from(ignore)]
    #[display("Network error: {_0}")]
    Network(String),

    /// No stored endpoint has the requested id.
    #[from(ignore)]
    #[display("Endpoint not found: {_0}")]
    EndpointNotFound(i64),

    /// Opaque failure reported by an endpoint store.
    #[from(ignore)]
    #[display("Storage error: {_0}")]
    Storage(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
