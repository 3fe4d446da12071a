#![deny(missing_docs)]

//! # oasprobe Core
//!
//! Core library for importing OpenAPI 3.x documents into an endpoint catalog
//! and test-invoking cataloged endpoints.

/// Shared error types.
pub mod error;

/// Endpoint record and its enums.
pub mod endpoint;

/// OpenAPI loading, validation and extraction.
pub mod oas;

/// Endpoint storage.
pub mod store;

/// Endpoint test execution.
pub mod runner;

/// Import and test orchestration.
pub mod pipeline;

pub use endpoint::{EndpointDefinition, EndpointParameter, HttpMethod, ParamLocation};
pub use error::{AppError, AppResult};
pub use oas::{
    extract, load, validate, DocumentSource, ExtractedEndpoints, RawDocument, Syntax,
    ValidationResult,
};
pub use pipeline::{import_document, ImportSummary, Pipeline};
pub use runner::{
    HttpTransport, PreparedRequest, RunnerConfig, TestOutcome, TestRunner, Transport,
    TransportResponse,
};
pub use store::{EndpointStore, MemoryStore};
