//! Database models.

/// Rows of the `api_endpoints` table.
pub mod endpoints;
