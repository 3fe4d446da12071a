#![deny(missing_docs)]

//! # Validate Command
//!
//! Loads a document from disk and reports whether it can be imported.

use crate::error::{CliError, CliResult};
use oasprobe_core::{import_document, DocumentSource};
use std::path::PathBuf;

/// Arguments for the validate command.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Document to check (`.json`, `.yaml` or `.yml`).
    pub file: PathBuf,
}

/// Validates `args.file`, printing the diagnostic. Invalid documents fail.
pub fn execute(args: &ValidateArgs) -> CliResult<()> {
    let result = import_document(DocumentSource::from_path(&args.file)?);
    if !result.valid {
        return Err(CliError::General(result.message));
    }
    println!("{}", result.message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn file_with(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_validate_accepts_openapi3() {
        let file = file_with(".yaml", "openapi: 3.1.0\ninfo: {title: t, version: '1'}\npaths: {}\n");
        let args = ValidateArgs {
            file: file.path().to_path_buf(),
        };
        assert!(execute(&args).is_ok());
    }

    #[test]
    fn test_validate_rejects_swagger2() {
        let file = file_with(".json", r#"{"swagger": "2.0", "paths": {}}"#);
        let args = ValidateArgs {
            file: file.path().to_path_buf(),
        };
        let err = execute(&args).unwrap_err();
        assert!(err.to_string().contains("Swagger 2.0"));
    }

    #[test]
    fn test_validate_missing_file() {
        let args = ValidateArgs {
            file: PathBuf::from("/nonexistent/api.json"),
        };
        assert!(execute(&args).is_err());
    }
}
