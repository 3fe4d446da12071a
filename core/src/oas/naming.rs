#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Derives an `operation_id` from the HTTP method and path when the document
//! does not declare one.

use crate::endpoint::HttpMethod;

/// Derives an operation id from the HTTP Method and URL path.
///
/// e.g. `GET /users/{id}` -> `get_users_id`
pub fn derive_operation_id(method: HttpMethod, path: &str) -> String {
    let mut clean_path = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '{' | '}' => {}
            c if c.is_ascii_alphanumeric() => clean_path.push(c.to_ascii_lowercase()),
            _ => {
                if !clean_path.ends_with('_') {
                    clean_path.push('_');
                }
            }
        }
    }

    let clean_path = clean_path.trim_matches('_');
    let method = method.path_item_key();
    if clean_path.is_empty() {
        format!("{}_root", method)
    } else {
        format!("{}_{}", method, clean_path)
    }
}
