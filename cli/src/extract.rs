#![deny(missing_docs)]

//! # Extract Command
//!
//! Prints the endpoint definitions of a document as a JSON array.

use crate::error::{CliError, CliResult};
use oasprobe_core::{extract, import_document, DocumentSource, ExtractedEndpoints};
use std::path::{Path, PathBuf};

/// Arguments for the extract command.
#[derive(clap::Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Document to extract (`.json`, `.yaml` or `.yml`).
    pub file: PathBuf,
}

/// Validates then extracts `path`.
pub fn extract_file(path: &Path) -> CliResult<ExtractedEndpoints> {
    let validated = import_document(DocumentSource::from_path(path)?);
    match validated.content {
        Some(content) if validated.valid => Ok(extract(&content)?),
        _ => Err(CliError::General(validated.message)),
    }
}

/// Writes the endpoints to stdout and skip warnings to stderr.
pub fn execute(args: &ExtractArgs) -> CliResult<()> {
    let extracted = extract_file(&args.file)?;
    for warning in &extracted.warnings {
        eprintln!("skipped: {}", warning);
    }

    let json = serde_json::to_string_pretty(&extracted.endpoints)
        .map_err(|e| CliError::General(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
