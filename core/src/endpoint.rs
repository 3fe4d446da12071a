#![deny(missing_docs)]

//! # Endpoint Model
//!
//! The storable record produced by extraction and consumed by the test runner,
//! plus the closed enums for HTTP methods and parameter locations.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP methods an endpoint definition may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `OPTIONS`
    Options,
    /// `HEAD`
    Head,
    /// `PATCH`
    Patch,
}

impl HttpMethod {
    /// Order in which operations of one path item are emitted by the extractor.
    pub const CANONICAL_ORDER: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
    ];

    /// Upper-case wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Key of this method inside an OpenAPI Path Item Object.
    pub fn path_item_key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
        }
    }

    /// Whether a stored request body is sent with this method.
    pub fn permits_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::CANONICAL_ORDER
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported HTTP method '{}'", s))
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Substituted into a `{name}` placeholder of the path template.
    Path,
    /// Appended to the query string.
    Query,
    /// Sent as a request header.
    Header,
    /// Sent inside the `Cookie` header.
    Cookie,
}

impl ParamLocation {
    /// Lower-case wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Header => "header",
            ParamLocation::Cookie => "cookie",
        }
    }
}

/// One parameter of an endpoint, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointParameter {
    /// Parameter name as declared in the document.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParamLocation,
    /// Schema type name (`string`, `integer`, ...).
    #[serde(rename = "type", default = "default_param_type")]
    pub ty: String,
    /// Whether the parameter must carry a value.
    #[serde(default)]
    pub required: bool,
    /// Value used when the endpoint is test-invoked. Empty counts as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

fn default_param_type() -> String {
    "string".to_string()
}

impl EndpointParameter {
    /// The value, if present and non-empty.
    pub fn effective_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }
}

/// The normalized, storable record of one OpenAPI operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDefinition {
    /// Store-assigned id; absent until persisted.
    #[serde(default)]
    pub id: Option<i64>,
    /// Imported document this endpoint belongs to.
    #[serde(rename = "swagger_id", alias = "owner_document_id", default)]
    pub owner_document_id: i64,
    /// `operationId`, or one derived from method and path.
    pub operation_id: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template including `{param}` placeholders.
    pub path: String,
    /// Operation summary.
    #[serde(default)]
    pub summary: String,
    /// Operation description.
    #[serde(default)]
    pub description: String,
    /// Comma-joined tags in declaration order.
    #[serde(default)]
    pub tags: String,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<EndpointParameter>,
    /// Extra request headers (name -> default value).
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    /// Serialized request body example or schema.
    #[serde(rename = "body", alias = "request_body", default)]
    pub request_body: Option<String>,
    /// Serialized example or schema of the first documented response.
    #[serde(default)]
    pub responses: String,
    /// Set by the store on creation.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Set by the store on every write.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EndpointDefinition {
    /// Creates an unsaved definition with only method, path and operation id set.
    pub fn new(method: HttpMethod, path: impl Into<String>, operation_id: impl Into<String>) -> Self {
        Self {
            id: None,
            owner_document_id: 0,
            operation_id: operation_id.into(),
            method,
            path: path.into(),
            summary: String::new(),
            description: String::new(),
            tags: String::new(),
            parameters: Vec::new(),
            headers: IndexMap::new(),
            request_body: None,
            responses: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Iterates the parameters carried in `location`, in declaration order.
    pub fn parameters_in(
        &self,
        location: ParamLocation,
    ) -> impl Iterator<Item = &EndpointParameter> + '_ {
        self.parameters
            .iter()
            .filter(move |p| p.location == location)
    }
}
