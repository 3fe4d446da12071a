#![deny(missing_docs)]

//! # Pipeline
//!
//! Sequences Loader -> Validator -> Extractor -> Store for imports, and
//! Store lookup -> Test Runner for test invocations.

use crate::endpoint::EndpointDefinition;
use crate::error::{AppError, AppResult};
use crate::oas::{extract, load, validate, DocumentSource, ValidationResult};
use crate::runner::{TestOutcome, TestRunner, Transport};
use crate::store::EndpointStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Result of extracting a document and persisting its endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Document id the endpoints were stored under.
    pub document_id: i64,
    /// Stored endpoints, with ids assigned.
    pub endpoints: Vec<EndpointDefinition>,
    /// Number of operations that could not be extracted.
    pub skipped_count: usize,
    /// One line per skipped operation.
    pub warnings: Vec<String>,
}

/// Loads and validates a document. Loader failures become an invalid result.
pub fn import_document(source: DocumentSource) -> ValidationResult {
    match load(source) {
        Ok(document) => validate(&document),
        Err(err) => {
            log::debug!("document not loaded: {}", err);
            ValidationResult::failure(err.to_string())
        }
    }
}

/// Ties a store and a test runner together.
pub struct Pipeline<S: ?Sized, T> {
    store: Arc<S>,
    runner: TestRunner<T>,
}

impl<S: EndpointStore + ?Sized, T: Transport> Pipeline<S, T> {
    /// Creates a pipeline over `store` and `runner`.
    pub fn new(store: Arc<S>, runner: TestRunner<T>) -> Self {
        Self { store, runner }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Loads and validates a document.
    pub fn import_document(&self, source: DocumentSource) -> ValidationResult {
        import_document(source)
    }

    /// Extracts validated content and persists the endpoints.
    ///
    /// Without `owner` the store allocates a fresh document id.
    pub fn extract_and_store(&self, content: &str, owner: Option<i64>) -> AppResult<ImportSummary> {
        let extracted = extract(content)?;
        let (document_id, endpoints) = self.store.create_many(owner, extracted.endpoints)?;
        log::info!(
            "stored {} endpoints for document {} ({} skipped)",
            endpoints.len(),
            document_id,
            extracted.skipped
        );

        Ok(ImportSummary {
            document_id,
            endpoints,
            skipped_count: extracted.skipped,
            warnings: extracted.warnings,
        })
    }

    /// Test-invokes a stored endpoint.
    pub async fn run_test(&self, endpoint_id: i64, base_url: &str) -> AppResult<TestOutcome> {
        let endpoint = self
            .store
            .get(endpoint_id)?
            .ok_or(AppError::EndpointNotFound(endpoint_id))?;
        self.test_endpoint(&endpoint, base_url).await
    }

    /// Test-invokes an unsaved or edited definition.
    ///
    /// Delivery failures are reported in `TestOutcome::error`; input errors
    /// (`InvalidBaseUrl`, `MissingRequiredParameter`, `InvalidRequest`) are returned.
    pub async fn test_endpoint(
        &self,
        endpoint: &EndpointDefinition,
        base_url: &str,
    ) -> AppResult<TestOutcome> {
        let request = self.runner.prepare(endpoint, base_url)?;
        let started = Instant::now();

        match self.runner.execute(&request).await {
            Err(AppError::Network(message)) => {
                log::warn!("{} {} not delivered: {}", request.method, request.url, message);
                Ok(TestOutcome::undelivered(&request, started.elapsed(), message))
            }
            other => other,
        }
    }
}
