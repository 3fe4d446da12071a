#![deny(missing_docs)]

//! # Endpoint Extraction
//!
//! Walks a validated document's `paths` tree and produces one
//! [`EndpointDefinition`] per (path, method).
//!
//! - Paths are visited in document order; methods in canonical order.
//! - A malformed operation is skipped and reported, it never aborts the walk.
//! - The same input always yields byte-identical output.

use crate::endpoint::{EndpointDefinition, EndpointParameter, HttpMethod};
use crate::error::{AppError, AppResult};
use crate::oas::examples::{media_payload, parameter_type, parameter_value};
use crate::oas::naming::derive_operation_id;
use crate::oas::ref_utils::{deref_value, resolve_ref_or};
use crate::oas::shims::{ShimOperation, ShimParameter, ShimResponse, PATH_ITEM_FIELDS};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use utoipa::openapi::RefOr;

/// Endpoints found in one document plus the operations that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedEndpoints {
    /// Extracted definitions, unsaved.
    pub endpoints: Vec<EndpointDefinition>,
    /// Number of skipped operations (or path items).
    pub skipped: usize,
    /// One line per skipped entry.
    pub warnings: Vec<String>,
}

impl ExtractedEndpoints {
    fn skip(&mut self, warning: String) {
        log::warn!("skipping {}", warning);
        self.skipped += 1;
        self.warnings.push(warning);
    }
}

/// Extracts endpoint definitions from validated JSON content.
///
/// Fails only when the content is not JSON or has no `paths` mapping.
pub fn extract(content: &str) -> AppResult<ExtractedEndpoints> {
    let root: Value = serde_json::from_str(content)
        .map_err(|e| AppError::MalformedDocument(format!("content is not JSON: {}", e)))?;

    let paths = root
        .get("paths")
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::MalformedDocument("document has no 'paths' mapping".into()))?;

    let mut result = ExtractedEndpoints::default();

    for (path, item) in paths {
        if path.starts_with("x-") {
            continue;
        }
        if !path.starts_with('/') {
            result.skip(format!(
                "path '{}': path templates must start with '/'",
                path
            ));
            continue;
        }
        let Some(item) = deref_value(&root, item) else {
            result.skip(format!("path '{}': unresolvable path item reference", path));
            continue;
        };
        let Some(item) = item.as_object() else {
            result.skip(format!("path '{}': path item is not a mapping", path));
            continue;
        };

        extract_path_item(&root, path, item, &mut result);
    }

    log::debug!(
        "extracted {} endpoints ({} skipped)",
        result.endpoints.len(),
        result.skipped
    );
    Ok(result)
}

fn extract_path_item(
    root: &Value,
    path: &str,
    item: &Map<String, Value>,
    result: &mut ExtractedEndpoints,
) {
    let shared_params = match item.get("parameters") {
        None => Ok(Vec::new()),
        Some(raw) => serde_json::from_value::<Vec<RefOr<ShimParameter>>>(raw.clone())
            .map_err(|e| e.to_string())
            .and_then(|params| resolve_parameters(root, params)),
    };

    for method in HttpMethod::CANONICAL_ORDER {
        let Some(raw) = item.get(method.path_item_key()) else {
            continue;
        };
        let label = format!("{} {}", method, path);

        let shared = match &shared_params {
            Ok(params) => params,
            Err(e) => {
                result.skip(format!("{}: invalid path-level parameters: {}", label, e));
                continue;
            }
        };
        if !raw.is_object() {
            result.skip(format!("{}: operation is not a mapping", label));
            continue;
        }

        match build_endpoint(root, method, path, raw, shared) {
            Ok(endpoint) => result.endpoints.push(endpoint),
            Err(e) => result.skip(format!("{}: {}", label, e)),
        }
    }

    for key in item.keys() {
        let known = PATH_ITEM_FIELDS.contains(&key.as_str())
            || key.starts_with("x-")
            || HttpMethod::CANONICAL_ORDER
                .iter()
                .any(|m| m.path_item_key() == key);
        if !known {
            result.skip(format!(
                "{} {}: unsupported operation",
                key.to_ascii_uppercase(),
                path
            ));
        }
    }
}

fn build_endpoint(
    root: &Value,
    method: HttpMethod,
    path: &str,
    raw: &Value,
    shared: &[ShimParameter],
) -> Result<EndpointDefinition, String> {
    let op: ShimOperation = serde_json::from_value(raw.clone()).map_err(|e| e.to_string())?;

    let operation_id = op
        .operation_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| derive_operation_id(method, path));

    let mut endpoint = EndpointDefinition::new(method, path, operation_id);
    endpoint.summary = op.summary.unwrap_or_default();
    endpoint.description = op.description.unwrap_or_default();
    endpoint.tags = op.tags.join(",");

    let mut params = shared.to_vec();
    for param in resolve_parameters(root, op.parameters)? {
        match params
            .iter_mut()
            .find(|p| p.name == param.name && p.location == param.location)
        {
            Some(existing) => *existing = param,
            None => params.push(param),
        }
    }
    endpoint.parameters = params
        .iter()
        .map(|p| EndpointParameter {
            name: p.name.clone(),
            location: p.location,
            ty: parameter_type(root, p),
            required: p.required,
            value: parameter_value(root, p),
        })
        .collect();

    if let Some(body) = op.request_body {
        let body = resolve_ref_or(root, body)?;
        endpoint.request_body = media_payload(root, &body.content);
    }

    endpoint.responses = match first_response(op.responses) {
        Some(response) => {
            let response: ShimResponse = resolve_ref_or(root, response)?;
            media_payload(root, &response.content).unwrap_or_default()
        }
        None => String::new(),
    };

    Ok(endpoint)
}

fn resolve_parameters(
    root: &Value,
    params: Vec<RefOr<ShimParameter>>,
) -> Result<Vec<ShimParameter>, String> {
    params
        .into_iter()
        .map(|p| resolve_ref_or(root, p))
        .collect()
}

/// Rank of a response key: exact codes by value, then `NXX` ranges, then `default`.
fn status_rank(key: &str) -> Option<(u8, u16)> {
    if key == "default" {
        return Some((2, 0));
    }
    if let Ok(code) = key.parse::<u16>() {
        return Some((0, code));
    }
    let upper = key.to_ascii_uppercase();
    let mut chars = upper.chars();
    match (chars.next(), chars.as_str()) {
        (Some(d @ '1'..='5'), "XX") => Some((1, d as u16 - '0' as u16)),
        _ => None,
    }
}

fn first_response(responses: IndexMap<String, RefOr<ShimResponse>>) -> Option<RefOr<ShimResponse>> {
    responses
        .into_iter()
        .filter_map(|(key, response)| status_rank(&key).map(|rank| (rank, response)))
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, response)| response)
}
