#![deny(missing_docs)]

//! # Document Loader
//!
//! Normalizes raw text or an uploaded file into a UTF-8 buffer and decides
//! whether it should be parsed as JSON or YAML. Pure transform.

use crate::error::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// File extensions accepted for uploaded documents.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Text pasted by the user.
    Text(String),
    /// An uploaded file.
    File {
        /// Original file name, used for extension sniffing.
        name: Option<String>,
        /// Declared content type (e.g. from a multipart field).
        content_type: Option<String>,
        /// Raw file bytes.
        bytes: Vec<u8>,
    },
}

impl DocumentSource {
    /// Wraps pasted text.
    pub fn text(content: impl Into<String>) -> Self {
        DocumentSource::Text(content.into())
    }

    /// Wraps an uploaded file.
    pub fn file(name: Option<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        DocumentSource::File {
            name,
            content_type,
            bytes,
        }
    }

    /// Reads a file from disk, keeping its name for extension sniffing.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        Ok(Self::file(name, None, bytes))
    }
}

/// Concrete syntax of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// JSON text.
    Json,
    /// YAML text.
    Yaml,
}

/// A loaded document, ready for validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// UTF-8 content with any BOM removed.
    pub content: String,
    /// Detected syntax.
    pub syntax: Syntax,
    /// File name, when the document was uploaded.
    pub source_name: Option<String>,
}

/// Loads a document source into a [`RawDocument`].
///
/// Extension decides first, then the declared content type; otherwise the
/// syntax is sniffed (JSON attempted first, YAML as fallback).
pub fn load(source: DocumentSource) -> AppResult<RawDocument> {
    let (name, content_type, bytes) = match source {
        DocumentSource::Text(text) => (None, None, text.into_bytes()),
        DocumentSource::File {
            name,
            content_type,
            bytes,
        } => (name, content_type, bytes),
    };

    let declared = match name.as_deref() {
        Some(file_name) => Some(syntax_from_file_name(file_name)?),
        None => content_type.as_deref().and_then(syntax_from_content_type),
    };

    let content = String::from_utf8(bytes).map_err(|e| {
        AppError::UnsupportedFormat(format!(
            "document is not valid UTF-8 text (invalid byte at offset {})",
            e.utf8_error().valid_up_to()
        ))
    })?;
    let content = content
        .strip_prefix('\u{feff}')
        .map(str::to_string)
        .unwrap_or(content);

    if content.trim().is_empty() {
        return Err(AppError::UnsupportedFormat("document is empty".into()));
    }

    let syntax = declared.unwrap_or_else(|| sniff_syntax(&content));

    Ok(RawDocument {
        content,
        syntax,
        source_name: name,
    })
}

fn syntax_from_file_name(file_name: &str) -> AppResult<Syntax> {
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => Ok(Syntax::Json),
        Some("yaml") | Some("yml") => Ok(Syntax::Yaml),
        _ => Err(AppError::UnsupportedFormat(format!(
            "'{}' is not a supported document; expected one of: .{}",
            file_name,
            ACCEPTED_EXTENSIONS.join(", .")
        ))),
    }
}

fn syntax_from_content_type(content_type: &str) -> Option<Syntax> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "application/json" => Some(Syntax::Json),
        "application/yaml" | "application/x-yaml" | "text/yaml" | "text/x-yaml" => {
            Some(Syntax::Yaml)
        }
        _ => None,
    }
}

fn sniff_syntax(content: &str) -> Syntax {
    if serde_json::from_str::<serde_json::Value>(content).is_ok() {
        return Syntax::Json;
    }
    // Broken JSON that is not a YAML flow mapping either keeps the JSON diagnostic.
    let looks_like_json = content.trim_start().starts_with('{');
    if looks_like_json && serde_yaml::from_str::<serde_yaml::Value>(content).is_err() {
        return Syntax::Json;
    }
    Syntax::Yaml
}
