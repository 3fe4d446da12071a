#![deny(missing_docs)]

//! # Endpoint Store
//!
//! Keyed storage for endpoint definitions. Writes are last-write-wins per id.
//! `MemoryStore` backs the CLI and tests; persistent backends implement the
//! same trait.

use crate::endpoint::EndpointDefinition;
use crate::error::{AppError, AppResult};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Durable keyed storage for endpoint definitions.
pub trait EndpointStore: Send + Sync {
    /// Persists a batch extracted from one document.
    ///
    /// With `document_id` absent a fresh id is allocated (max existing + 1).
    /// Returns the owning document id and the stored definitions with ids and
    /// timestamps set.
    fn create_many(
        &self,
        document_id: Option<i64>,
        endpoints: Vec<EndpointDefinition>,
    ) -> AppResult<(i64, Vec<EndpointDefinition>)>;

    /// All endpoints of one document, ordered by id.
    fn list(&self, document_id: i64) -> AppResult<Vec<EndpointDefinition>>;

    /// Looks up one endpoint.
    fn get(&self, id: i64) -> AppResult<Option<EndpointDefinition>>;

    /// Replaces a stored endpoint, keeping its id and `created_at`.
    ///
    /// Fails with `InvalidRequest` when `id` is absent and `EndpointNotFound`
    /// when it is unknown.
    fn update(&self, endpoint: EndpointDefinition) -> AppResult<EndpointDefinition>;

    /// Removes an endpoint. Returns whether it existed.
    fn delete(&self, id: i64) -> AppResult<bool>;
}

#[derive(Default)]
struct MemoryInner {
    last_id: i64,
    rows: BTreeMap<i64, EndpointDefinition>,
}

/// In-process store behind a read/write lock.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EndpointStore for MemoryStore {
    fn create_many(
        &self,
        document_id: Option<i64>,
        endpoints: Vec<EndpointDefinition>,
    ) -> AppResult<(i64, Vec<EndpointDefinition>)> {
        let mut inner = self.inner.write();
        let document_id = match document_id {
            Some(id) => id,
            None => {
                inner
                    .rows
                    .values()
                    .map(|e| e.owner_document_id)
                    .max()
                    .unwrap_or(0)
                    + 1
            }
        };

        let now = Utc::now();
        let mut stored = Vec::with_capacity(endpoints.len());
        for mut endpoint in endpoints {
            inner.last_id += 1;
            let id = inner.last_id;
            endpoint.id = Some(id);
            endpoint.owner_document_id = document_id;
            endpoint.created_at = Some(now);
            endpoint.updated_at = Some(now);
            inner.rows.insert(id, endpoint.clone());
            stored.push(endpoint);
        }
        Ok((document_id, stored))
    }

    fn list(&self, document_id: i64) -> AppResult<Vec<EndpointDefinition>> {
        Ok(self
            .inner
            .read()
            .rows
            .values()
            .filter(|e| e.owner_document_id == document_id)
            .cloned()
            .collect())
    }

    fn get(&self, id: i64) -> AppResult<Option<EndpointDefinition>> {
        Ok(self.inner.read().rows.get(&id).cloned())
    }

    fn update(&self, mut endpoint: EndpointDefinition) -> AppResult<EndpointDefinition> {
        let id = endpoint
            .id
            .ok_or_else(|| AppError::InvalidRequest("endpoint id is required for update".into()))?;

        let mut inner = self.inner.write();
        let existing = inner
            .rows
            .get_mut(&id)
            .ok_or(AppError::EndpointNotFound(id))?;

        endpoint.owner_document_id = existing.owner_document_id;
        endpoint.created_at = existing.created_at;
        endpoint.updated_at = Some(Utc::now());
        *existing = endpoint.clone();
        Ok(endpoint)
    }

    fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.inner.write().rows.remove(&id).is_some())
    }
}
