#![deny(missing_docs)]

//! # Example Selection
//!
//! Picks the sample values stored on an endpoint definition: parameter
//! values, the request body and the first response payload.
//!
//! Priority for media types: the first declared example across content types
//! (`example`, then the first usable `examples` entry), otherwise the first
//! schema's own example, otherwise the schema with local references inlined.

use crate::oas::ref_utils::{deref_value, inline_refs, MAX_REF_DEPTH};
use crate::oas::shims::{ShimMediaType, ShimParameter};
use indexmap::IndexMap;
use serde_json::Value;

/// Schema type of a parameter, `"string"` when undeclared.
pub(crate) fn parameter_type(root: &Value, param: &ShimParameter) -> String {
    param
        .schema
        .as_ref()
        .and_then(|schema| deref_value(root, schema))
        .and_then(|schema| schema.get("type"))
        .and_then(|ty| match ty {
            Value::String(s) => Some(s.clone()),
            Value::Array(types) => types
                .iter()
                .filter_map(Value::as_str)
                .find(|t| *t != "null")
                .map(str::to_string),
            _ => None,
        })
        .unwrap_or_else(|| "string".to_string())
}

/// Sample value of a parameter: `example` > first `examples` value > schema `example` > schema `default`.
pub(crate) fn parameter_value(root: &Value, param: &ShimParameter) -> Option<String> {
    let schema = param.schema.as_ref().and_then(|s| deref_value(root, s));

    non_null(param.example.as_ref())
        .cloned()
        .or_else(|| first_named_example(root, param.examples.as_ref()))
        .or_else(|| non_null(schema.and_then(|s| s.get("example"))).cloned())
        .or_else(|| non_null(schema.and_then(|s| s.get("default"))).cloned())
        .map(|value| match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
}

/// Serialized payload for a content map, or `None` when it declares nothing usable.
pub(crate) fn media_payload(root: &Value, content: &IndexMap<String, ShimMediaType>) -> Option<String> {
    let declared = content.values().find_map(|media| {
        non_null(media.example.as_ref())
            .cloned()
            .or_else(|| first_named_example(root, media.examples.as_ref()))
    });

    let payload = match declared {
        Some(example) => example,
        None => {
            let schema = content.values().find_map(|media| media.schema.as_ref())?;
            schema_sample(root, schema)
        }
    };

    Some(render_payload(payload))
}

fn schema_sample(root: &Value, schema: &Value) -> Value {
    let target = deref_value(root, schema).unwrap_or(schema);

    let own_example = non_null(target.get("example")).or_else(|| {
        target
            .get("examples")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
    });

    match own_example {
        Some(example) => example.clone(),
        None => inline_refs(root, schema, MAX_REF_DEPTH),
    }
}

/// First entry of an `examples` map carrying a `value`, following `$ref`s.
fn first_named_example(root: &Value, examples: Option<&IndexMap<String, Value>>) -> Option<Value> {
    examples?.values().find_map(|entry| {
        deref_value(root, entry)
            .and_then(|example| example.get("value"))
            .cloned()
    })
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn render_payload(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::ParamLocation;
    use serde_json::json;

    fn root() -> Value {
        json!({
            "components": {
                "schemas": {
                    "Id": {"type": ["null", "integer"], "example": 7},
                    "User": {
                        "type": "object",
                        "properties": {"name": {"type": "string"}}
                    },
                    "Wrapper": {
                        "type": "object",
                        "properties": {"user": {"$ref": "#/components/schemas/User"}}
                    }
                },
                "examples": {
                    "Alice": {"summary": "A user", "value": {"name": "alice"}}
                }
            }
        })
    }

    fn param(value: Value) -> ShimParameter {
        let mut base = json!({"name": "id", "in": "path"});
        if let (Some(base), Some(extra)) = (base.as_object_mut(), value.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn test_parameter_type_follows_refs_and_arrays() {
        let root = root();
        let p = param(json!({"schema": {"$ref": "#/components/schemas/Id"}}));
        assert_eq!(p.location, ParamLocation::Path);
        assert_eq!(parameter_type(&root, &p), "integer");
        assert_eq!(parameter_type(&root, &param(json!({}))), "string");
    }

    #[test]
    fn test_parameter_value_priority() {
        let root = root();

        let explicit = param(json!({
            "example": "abc",
            "examples": {"x": {"value": "zzz"}},
            "schema": {"example": "schema", "default": "dflt"}
        }));
        assert_eq!(parameter_value(&root, &explicit).as_deref(), Some("abc"));

        let named = param(json!({
            "examples": {"x": {"summary": "no value"}, "y": {"value": 12}},
            "schema": {"example": "schema"}
        }));
        assert_eq!(parameter_value(&root, &named).as_deref(), Some("12"));

        let from_schema_ref = param(json!({"schema": {"$ref": "#/components/schemas/Id"}}));
        assert_eq!(parameter_value(&root, &from_schema_ref).as_deref(), Some("7"));

        let from_default = param(json!({"schema": {"type": "boolean", "default": false}}));
        assert_eq!(parameter_value(&root, &from_default).as_deref(), Some("false"));

        assert!(parameter_value(&root, &param(json!({}))).is_none());
    }

    #[test]
    fn test_media_payload_prefers_first_declared_example() {
        let root = root();
        let content: IndexMap<String, ShimMediaType> = serde_json::from_value(json!({
            "application/xml": {"schema": {"type": "string"}},
            "application/json": {
                "examples": {"alice": {"$ref": "#/components/examples/Alice"}}
            }
        }))
        .unwrap();

        let payload = media_payload(&root, &content).unwrap();
        assert_eq!(payload, "{\n  \"name\": \"alice\"\n}");
    }

    #[test]
    fn test_media_payload_inlines_schema() {
        let root = root();
        let content: IndexMap<String, ShimMediaType> = serde_json::from_value(json!({
            "application/json": {"schema": {"$ref": "#/components/schemas/Wrapper"}}
        }))
        .unwrap();

        let payload = media_payload(&root, &content).unwrap();
        let value: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["properties"]["user"]["properties"]["name"]["type"], "string");
    }

    #[test]
    fn test_media_payload_string_verbatim_and_empty() {
        let root = root();
        let content: IndexMap<String, ShimMediaType> = serde_json::from_value(json!({
            "text/plain": {"example": "hello"}
        }))
        .unwrap();
        assert_eq!(media_payload(&root, &content).as_deref(), Some("hello"));

        let empty: IndexMap<String, ShimMediaType> =
            serde_json::from_value(json!({"application/json": {}})).unwrap();
        assert!(media_payload(&root, &empty).is_none());
    }
}
