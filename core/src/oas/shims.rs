#![deny(missing_docs)]

//! # Operation Shims
//!
//! Lenient deserialization targets for the parts of an OpenAPI 3.x Path Item
//! the extractor reads. Unknown fields are ignored; `$ref`-or-inline values
//! use `utoipa::openapi::RefOr` and are resolved by the extractor.
//!
//! Note: shims holding a `RefOr` do not derive `Debug` because `RefOr` only
//! implements it behind a utoipa feature.

use crate::endpoint::ParamLocation;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use utoipa::openapi::RefOr;

/// Fixed Path Item fields that are not operations.
pub const PATH_ITEM_FIELDS: [&str; 5] = ["summary", "description", "servers", "parameters", "$ref"];

/// A single Operation Object.
#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ShimOperation {
    /// Unique identifier for the operation.
    pub operation_id: Option<String>,
    /// A short summary of what the operation does.
    pub summary: Option<String>,
    /// A verbose explanation of the operation behavior.
    pub description: Option<String>,
    /// Tags in declaration order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Operation-level parameters.
    #[serde(default)]
    pub parameters: Vec<RefOr<ShimParameter>>,
    /// Request Body.
    pub request_body: Option<RefOr<ShimRequestBody>>,
    /// Responses keyed by status code, range (`2XX`) or `default`.
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<ShimResponse>>,
}

/// A Parameter Object.
#[derive(Deserialize, Clone, Debug)]
pub struct ShimParameter {
    /// Name of the parameter.
    pub name: String,
    /// Location; anything outside path/query/header/cookie fails deserialization.
    #[serde(rename = "in")]
    pub location: ParamLocation,
    /// Whether the parameter is required.
    #[serde(default)]
    pub required: bool,
    /// Schema, kept raw so `$ref` and type arrays can be inspected.
    pub schema: Option<Value>,
    /// Single example value.
    pub example: Option<Value>,
    /// Named Example Objects (or references to them).
    pub examples: Option<IndexMap<String, Value>>,
}

/// A Request Body Object.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ShimRequestBody {
    /// Media types in declaration order.
    #[serde(default)]
    pub content: IndexMap<String, ShimMediaType>,
    /// Whether the body is required.
    #[serde(default)]
    pub required: bool,
}

/// A Response Object.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ShimResponse {
    /// Response description.
    pub description: Option<String>,
    /// Media types in declaration order.
    #[serde(default)]
    pub content: IndexMap<String, ShimMediaType>,
}

/// A Media Type Object.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ShimMediaType {
    /// Schema, kept raw for `$ref` inlining.
    pub schema: Option<Value>,
    /// Single example value.
    pub example: Option<Value>,
    /// Named Example Objects (or references to them).
    pub examples: Option<IndexMap<String, Value>>,
}
