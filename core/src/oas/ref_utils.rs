#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Resolution of local `$ref` pointers (`#/components/...`) against the
//! document being extracted. External documents are never fetched.

use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde_json::Value;
use utoipa::openapi::RefOr;

/// Upper bound on `$ref` -> `$ref` chains and on schema inlining depth.
pub(crate) const MAX_REF_DEPTH: usize = 8;

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent-encoding).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Looks up a local reference (`#/a/b`) inside `root`.
///
/// Returns `None` for external references or when a segment does not exist.
pub(crate) fn lookup_local<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer = reference.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root);
    }
    let pointer = pointer.strip_prefix('/')?;

    pointer
        .split('/')
        .map(decode_pointer_segment)
        .try_fold(root, |node, segment| match node {
            Value::Object(map) => map.get(&segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Follows a chain of references until an inline value of type `T` is reached.
pub(crate) fn resolve_ref_or<T: DeserializeOwned>(
    root: &Value,
    item: RefOr<T>,
) -> Result<T, String> {
    let mut current = item;
    for _ in 0..MAX_REF_DEPTH {
        match current {
            RefOr::T(value) => return Ok(value),
            RefOr::Ref(reference) => {
                let location = reference.ref_location;
                let target = lookup_local(root, &location)
                    .ok_or_else(|| format!("unresolvable reference '{}'", location))?;
                current = serde_json::from_value(target.clone())
                    .map_err(|e| format!("invalid target of reference '{}': {}", location, e))?;
            }
        }
    }
    Err(format!(
        "reference chain deeper than {} levels",
        MAX_REF_DEPTH
    ))
}

/// Follows a raw JSON `{"$ref": ...}` value to its target. Non-reference values are returned as-is.
pub(crate) fn deref_value<'a>(root: &'a Value, value: &'a Value) -> Option<&'a Value> {
    let mut current = value;
    for _ in 0..MAX_REF_DEPTH {
        match current.get("$ref").and_then(Value::as_str) {
            Some(reference) => current = lookup_local(root, reference)?,
            None => return Some(current),
        }
    }
    None
}

/// Returns a copy of `value` with resolvable local `$ref`s inlined, up to `depth` levels.
///
/// Unresolvable or too-deep references are left in place, which also bounds
/// recursive schemas.
pub(crate) fn inline_refs(root: &Value, value: &Value, depth: usize) -> Value {
    match value {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                if depth == 0 {
                    return value.clone();
                }
                return match lookup_local(root, reference) {
                    Some(target) => inline_refs(root, target, depth - 1),
                    None => value.clone(),
                };
            }
            Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), inline_refs(root, v, depth)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| inline_refs(root, item, depth))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Named {
        name: String,
    }

    fn doc() -> Value {
        json!({
            "components": {
                "parameters": {
                    "Limit": {"name": "limit"},
                    "Alias": {"$ref": "#/components/parameters/Limit"}
                },
                "schemas": {
                    "User Profile/details": {"type": "object"},
                    "Node": {
                        "type": "object",
                        "properties": {"next": {"$ref": "#/components/schemas/Node"}}
                    }
                }
            }
        })
    }

    #[test]
    fn test_decode_pointer_segment_percent_encoding() {
        let encoded = "User%20Profile~1details";
        let decoded = decode_pointer_segment(encoded);
        assert_eq!(decoded, "User Profile/details");
    }

    #[test]
    fn test_lookup_local() {
        let root = doc();
        let found = lookup_local(&root, "#/components/schemas/User%20Profile~1details").unwrap();
        assert_eq!(found["type"], "object");
        assert!(lookup_local(&root, "#/components/schemas/Missing").is_none());
        assert!(lookup_local(&root, "other.yaml#/components/schemas/Node").is_none());
    }

    #[test]
    fn test_resolve_ref_chain() {
        let root = doc();
        let item: RefOr<Named> =
            serde_json::from_value(json!({"$ref": "#/components/parameters/Alias"})).unwrap();
        let named = resolve_ref_or(&root, item).unwrap();
        assert_eq!(named.name, "limit");

        let missing: RefOr<Named> =
            serde_json::from_value(json!({"$ref": "#/components/parameters/Nope"})).unwrap();
        assert!(resolve_ref_or(&root, missing)
            .unwrap_err()
            .contains("unresolvable reference"));
    }

    #[test]
    fn test_inline_refs_is_depth_bounded() {
        let root = doc();
        let inlined = inline_refs(&root, &json!({"$ref": "#/components/schemas/Node"}), 2);
        assert_eq!(inlined["properties"]["next"]["type"], "object");
        assert_eq!(
            inlined["properties"]["next"]["properties"]["next"],
            json!({"$ref": "#/components/schemas/Node"})
        );
    }
}
