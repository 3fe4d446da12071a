//! Database Schema.

diesel::table! {
    /// Stored endpoint definitions.
    api_endpoints (id) {
        /// Primary Key.
        id -> BigInt,
        /// Imported document the endpoint belongs to (`swagger_id` on the wire).
        owner_document_id -> BigInt,
        /// Operation id.
        operation_id -> Text,
        /// Upper-case HTTP method.
        method -> Text,
        /// Path template.
        path -> Text,
        /// Operation summary.
        summary -> Text,
        /// Operation description.
        description -> Text,
        /// Comma-joined tags.
        tags -> Text,
        /// Parameters as a JSON array.
        parameters -> Text,
        /// Headers as a JSON object.
        headers -> Text,
        /// Serialized request body.
        request_body -> Nullable<Text>,
        /// Serialized response payload.
        responses -> Text,
        /// Creation timestamp.
        created_at -> Timestamp,
        /// Update timestamp.
        updated_at -> Timestamp,
    }
}

/// DDL applied when a store is opened.
pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS api_endpoints (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    owner_document_id BIGINT NOT NULL,
    operation_id TEXT NOT NULL,
    method TEXT NOT NULL,
    path TEXT NOT NULL,
    summary TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    tags TEXT NOT NULL DEFAULT '',
    parameters TEXT NOT NULL DEFAULT '[]',
    headers TEXT NOT NULL DEFAULT '{}',
    request_body TEXT,
    responses TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_api_endpoints_owner ON api_endpoints (owner_document_id);
";
