#![deny(missing_docs)]

//! # OpenAPI Document Handling
//!
//! - **loader**: Turns text or an uploaded file into a UTF-8 buffer with a detected syntax.
//! - **validation**: Root-level OpenAPI 3.x checks.
//! - **extract**: Walks the paths tree into endpoint definitions.
//! - **shims**, **ref_utils**, **examples**, **naming**: Extraction helpers.

pub mod examples;
pub mod extract;
pub mod loader;
pub mod naming;
pub mod ref_utils;
pub mod shims;
pub mod validation;

pub use extract::{extract, ExtractedEndpoints};
pub use loader::{load, DocumentSource, RawDocument, Syntax};
pub use validation::{validate, ValidationResult, CONVERSION_HINT};
