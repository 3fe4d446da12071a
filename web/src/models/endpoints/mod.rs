//! Endpoint table models and conversions to the core record.

use crate::schema::api_endpoints;
use chrono::{DateTime, NaiveDateTime, Utc};
use oasprobe_core::{AppError, AppResult, EndpointDefinition, HttpMethod};

/// Struct representing a row in table `api_endpoints`
#[derive(Debug, Clone, diesel::Queryable, diesel::Selectable, diesel::Identifiable)]
#[diesel(table_name = api_endpoints, primary_key(id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EndpointRow {
    /// Field representing column `id`
    pub id: i64,
    /// Field representing column `owner_document_id`
    pub owner_document_id: i64,
    /// Field representing column `operation_id`
    pub operation_id: String,
    /// Field representing column `method`
    pub method: String,
    /// Field representing column `path`
    pub path: String,
    /// Field representing column `summary`
    pub summary: String,
    /// Field representing column `description`
    pub description: String,
    /// Field representing column `tags`
    pub tags: String,
    /// Field representing column `parameters`
    pub parameters: String,
    /// Field representing column `headers`
    pub headers: String,
    /// Field representing column `request_body`
    pub request_body: Option<String>,
    /// Field representing column `responses`
    pub responses: String,
    /// Field representing column `created_at`
    pub created_at: NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: NaiveDateTime,
}

/// Create Struct for a row in table `api_endpoints` for [`EndpointRow`]
#[derive(Debug, Clone, diesel::Insertable)]
#[diesel(table_name = api_endpoints)]
pub struct NewEndpointRow {
    /// Field representing column `owner_document_id`
    pub owner_document_id: i64,
    /// Field representing column `operation_id`
    pub operation_id: String,
    /// Field representing column `method`
    pub method: String,
    /// Field representing column `path`
    pub path: String,
    /// Field representing column `summary`
    pub summary: String,
    /// Field representing column `description`
    pub description: String,
    /// Field representing column `tags`
    pub tags: String,
    /// Field representing column `parameters`
    pub parameters: String,
    /// Field representing column `headers`
    pub headers: String,
    /// Field representing column `request_body`
    pub request_body: Option<String>,
    /// Field representing column `responses`
    pub responses: String,
    /// Field representing column `created_at`
    pub created_at: NaiveDateTime,
    /// Field representing column `updated_at`
    pub updated_at: NaiveDateTime,
}

/// Update Struct for a row in table `api_endpoints` for [`EndpointRow`]
///
/// Ownership and `created_at` are never rewritten.
#[derive(Debug, Clone, diesel::AsChangeset)]
#[diesel(table_name = api_endpoints, treat_none_as_null = true)]
pub struct EndpointChangeset {
    /// Field representing column `operation_id`
    pub operation_id: String,
    /// Field representing column `method`
    pub method: String,
    /// Field representing column `path`
    pub path: String,
    /// Field representing column `summary`
    pub summary: String,
    /// Field representing column `description`
    pub description: String,
    /// Field representing column `tags`
    pub tags: String,
    /// Field representing column `parameters`
    pub parameters: String,
    /// Field representing column `headers`
    pub headers: String,
    /// Field representing column `request_body`
    pub request_body: Option<String>,
    /// Field representing column `responses`
    pub responses: String,
    /// Field representing column `updated_at`
    pub updated_at: NaiveDateTime,
}

fn encode<T: serde::Serialize>(column: &str, value: &T) -> AppResult<String> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Storage(format!("cannot encode {}: {}", column, e)))
}

fn decode<T: serde::de::DeserializeOwned>(id: i64, column: &str, text: &str) -> AppResult<T> {
    serde_json::from_str(text).map_err(|e| {
        AppError::Storage(format!("endpoint {} has corrupt {}: {}", id, column, e))
    })
}

impl NewEndpointRow {
    /// Builds an insert row owned by `document_id`.
    pub fn from_definition(
        endpoint: &EndpointDefinition,
        document_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<Self> {
        Ok(Self {
            owner_document_id: document_id,
            operation_id: endpoint.operation_id.clone(),
            method: endpoint.method.to_string(),
            path: endpoint.path.clone(),
            summary: endpoint.summary.clone(),
            description: endpoint.description.clone(),
            tags: endpoint.tags.clone(),
            parameters: encode("parameters", &endpoint.parameters)?,
            headers: encode("headers", &endpoint.headers)?,
            request_body: endpoint.request_body.clone(),
            responses: endpoint.responses.clone(),
            created_at: now,
            updated_at: now,
        })
    }
}

impl EndpointChangeset {
    /// Builds the changeset for an edited definition.
    pub fn from_definition(endpoint: &EndpointDefinition, now: NaiveDateTime) -> AppResult<Self> {
        Ok(Self {
            operation_id: endpoint.operation_id.clone(),
            method: endpoint.method.to_string(),
            path: endpoint.path.clone(),
            summary: endpoint.summary.clone(),
            description: endpoint.description.clone(),
            tags: endpoint.tags.clone(),
            parameters: encode("parameters", &endpoint.parameters)?,
            headers: encode("headers", &endpoint.headers)?,
            request_body: endpoint.request_body.clone(),
            responses: endpoint.responses.clone(),
            updated_at: now,
        })
    }
}

impl EndpointRow {
    /// Converts the row back into the core record.
    pub fn into_definition(self) -> AppResult<EndpointDefinition> {
        let method: HttpMethod = self.method.parse().map_err(|e: String| {
            AppError::Storage(format!("endpoint {} has corrupt method: {}", self.id, e))
        })?;

        Ok(EndpointDefinition {
            id: Some(self.id),
            owner_document_id: self.owner_document_id,
            operation_id: self.operation_id,
            method,
            path: self.path,
            summary: self.summary,
            description: self.description,
            tags: self.tags,
            parameters: decode(self.id, "parameters", &self.parameters)?,
            headers: decode(self.id, "headers", &self.headers)?,
            request_body: self.request_body,
            responses: self.responses,
            created_at: Some(utc(self.created_at)),
            updated_at: Some(utc(self.updated_at)),
        })
    }
}

fn utc(timestamp: NaiveDateTime) -> DateTime<Utc> {
    timestamp.and_utc()
}
