#![deny(missing_docs)]

//! # OpenAPI Validation
//!
//! Root-level checks run before a document is handed to extraction:
//! - The text parses with its detected syntax.
//! - The root declares `openapi: "3.x"` (Swagger 2.0 is refused with a conversion hint).
//! - `paths` is a non-empty mapping.
//!
//! Individual operations are not inspected here; the extractor reports those
//! one by one.

use crate::error::{AppError, AppResult};
use crate::oas::loader::{RawDocument, Syntax};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Appended to every version diagnostic.
pub const CONVERSION_HINT: &str = "Only OpenAPI 3.x documents are supported. \
Swagger/OpenAPI 2.0 documents (`swagger: \"2.0\"`) must be converted to OpenAPI 3.0 \
before import, e.g. with https://converter.swagger.io or the `swagger2openapi` tool.";

/// Outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the document may be handed to extraction.
    pub valid: bool,
    /// Human-readable diagnostic or success message.
    pub message: String,
    /// Normalized JSON text for extraction; only present when `valid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ValidationResult {
    /// A passing result carrying the normalized content.
    pub fn success(message: impl Into<String>, content: String) -> Self {
        Self {
            valid: true,
            message: message.into(),
            content: Some(content),
        }
    }

    /// A failing result.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
            content: None,
        }
    }
}

/// Validates a loaded document. Never fails; problems are reported in the result.
pub fn validate(document: &RawDocument) -> ValidationResult {
    match check_document(document) {
        Ok((message, content)) => {
            log::debug!("{}", message);
            ValidationResult::success(message, content)
        }
        Err(err) => {
            log::debug!("document rejected: {}", err);
            ValidationResult::failure(err.to_string())
        }
    }
}

fn check_document(document: &RawDocument) -> AppResult<(String, String)> {
    let value = parse_document(document)?;
    let version = check_version(&value)?;
    let path_count = check_paths(&value)?;

    let content = match document.syntax {
        Syntax::Json => document.content.clone(),
        Syntax::Yaml => serde_json::to_string_pretty(&value).map_err(|e| {
            AppError::MalformedDocument(format!("cannot re-serialize document as JSON: {}", e))
        })?,
    };

    Ok((
        format!(
            "OpenAPI {} document validated successfully ({} paths)",
            version, path_count
        ),
        content,
    ))
}

/// Parses the document text into a JSON value tree according to its syntax.
pub fn parse_document(document: &RawDocument) -> AppResult<Value> {
    match document.syntax {
        Syntax::Json => serde_json::from_str(&document.content)
            .map_err(|e| AppError::UnsupportedFormat(format!("invalid JSON: {}", e))),
        Syntax::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&document.content)
                .map_err(|e| AppError::UnsupportedFormat(describe_yaml_error(&e)))?;
            Ok(yaml_to_json(yaml))
        }
    }
}

fn describe_yaml_error(err: &serde_yaml::Error) -> String {
    match err.location() {
        Some(loc) => format!(
            "invalid YAML at line {}, column {}: {}",
            loc.line(),
            loc.column(),
            err
        ),
        None => format!("invalid YAML: {}", err),
    }
}

/// Converts a YAML tree to JSON. Non-string keys (e.g. unquoted `200:`) are stringified.
pub(crate) fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(n.to_string()))
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(k, v)| (yaml_key(k), yaml_to_json(v)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => s,
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        other => yaml_to_json(other).to_string(),
    }
}

/// Returns the declared `openapi` version, or the reason the document is not 3.x.
fn check_version(root: &Value) -> AppResult<String> {
    let Some(map) = root.as_object() else {
        return Err(AppError::MalformedDocument(format!(
            "document root must be a mapping. {}",
            CONVERSION_HINT
        )));
    };

    if let Some(swagger) = map.get("swagger") {
        let version = match swagger {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(AppError::UnsupportedSpecVersion(format!(
            "Detected a Swagger {} document. {}",
            version, CONVERSION_HINT
        )));
    }

    match map.get("openapi") {
        None => Err(AppError::UnsupportedSpecVersion(format!(
            "Missing 'openapi' version field. {}",
            CONVERSION_HINT
        ))),
        Some(Value::String(version)) if version.trim().is_empty() => {
            Err(AppError::UnsupportedSpecVersion(format!(
                "The 'openapi' version field is empty. {}",
                CONVERSION_HINT
            )))
        }
        Some(Value::String(version)) if version.starts_with("3.") => Ok(version.clone()),
        Some(Value::String(version)) => Err(AppError::UnsupportedSpecVersion(format!(
            "Unsupported OpenAPI version '{}'. {}",
            version, CONVERSION_HINT
        ))),
        Some(other) => Err(AppError::UnsupportedSpecVersion(format!(
            "The 'openapi' version field must be a string such as \"3.0.3\" (found {}). {}",
            other, CONVERSION_HINT
        ))),
    }
}

/// Returns the number of path entries.
fn check_paths(root: &Value) -> AppResult<usize> {
    match root.get("paths").and_then(Value::as_object) {
        Some(paths) if !paths.is_empty() => Ok(paths.len()),
        _ => Err(AppError::MalformedDocument(
            "document contains no operations".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::loader::{load, DocumentSource};

    fn validate_text(text: &str) -> ValidationResult {
        validate(&load(DocumentSource::text(text)).unwrap())
    }

    #[test]
    fn test_minimal_json_document_passes() {
        let text = r#"{"openapi":"3.0.0","paths":{"/users":{"get":{"summary":"List users"}}}}"#;
        let result = validate_text(text);
        assert!(result.valid, "{}", result.message);
        assert_eq!(result.content.as_deref(), Some(text));
    }

    #[test]
    fn test_yaml_is_reserialized_as_json() {
        let result = validate_text(
            r#"
openapi: 3.1.0
info: {title: T, version: 1.0}
paths:
  /ping:
    get:
      responses:
        200: {description: OK}
"#,
        );
        assert!(result.valid, "{}", result.message);

        let content = result.content.unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["openapi"], "3.1.0");
        // Integer YAML keys become strings
        assert!(value["paths"]["/ping"]["get"]["responses"]["200"].is_object());
    }

    #[test]
    fn test_swagger_2_rejected_with_hint() {
        let result = validate_text(r#"{"swagger":"2.0","paths":{}}"#);
        assert!(!result.valid);
        assert!(result.content.is_none());
        assert!(result.message.contains("Swagger 2.0"));
        assert!(result.message.contains("OpenAPI 3"));
        assert!(result.message.contains("converted"));
    }

    #[test]
    fn test_swagger_field_wins_over_openapi() {
        let result = validate_text(
            r#"{"swagger":"2.0","openapi":"3.0.0","paths":{"/a":{"get":{}}}}"#,
        );
        assert!(!result.valid);
        assert!(result.message.contains("Swagger 2.0"));
    }

    #[test]
    fn test_missing_or_wrong_version() {
        let missing = validate_text(r#"{"paths":{"/a":{"get":{}}}}"#);
        assert!(!missing.valid);
        assert!(missing.message.contains("Missing 'openapi'"));
        assert!(missing.message.contains(CONVERSION_HINT));

        let numeric = validate_text("openapi: 3.1\npaths:\n  /a:\n    get: {}\n");
        assert!(!numeric.valid);
        assert!(numeric.message.contains("must be a string"));

        let future = validate_text(r#"{"openapi":"4.0.0","paths":{"/a":{"get":{}}}}"#);
        assert!(!future.valid);
        assert!(future.message.contains("'4.0.0'"));
    }

    #[test]
    fn test_empty_paths_rejected() {
        let result = validate_text(r#"{"openapi":"3.0.0","paths":{}}"#);
        assert!(!result.valid);
        assert!(result.message.contains("document contains no operations"));

        let absent = validate_text(r#"{"openapi":"3.0.0"}"#);
        assert!(absent.message.contains("document contains no operations"));
    }

    #[test]
    fn test_parse_error_reports_position() {
        let raw = load(DocumentSource::file(
            Some("broken.json".into()),
            None,
            b"{\n  \"openapi\": \"3.0.0\",\n  \"paths\": }".to_vec(),
        ))
        .unwrap();
        let result = validate(&raw);
        assert!(!result.valid);
        assert!(result.message.contains("invalid JSON"));
        assert!(result.message.contains("line 3"));

        let yaml = validate_text("openapi: 3.0.0\npaths: [unclosed\n");
        assert!(!yaml.valid);
        assert!(yaml.message.contains("invalid YAML"));
    }

    #[test]
    fn test_non_mapping_root_rejected() {
        let result = validate_text("- just\n- a list\n");
        assert!(!result.valid);
        assert!(result.message.contains("root must be a mapping"));
        assert!(result.message.contains("Only OpenAPI 3.x documents are supported"));
    }
}
