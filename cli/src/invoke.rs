#![deny(missing_docs)]

//! # Test Command
//!
//! Extracts a document into a throwaway memory store, fills parameter values
//! from the command line and test-invokes one operation.

use crate::error::{CliError, CliResult};
use crate::extract::extract_file;
use oasprobe_core::{EndpointStore, MemoryStore, Pipeline, RunnerConfig, TestOutcome, TestRunner};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Arguments for the test command.
#[derive(clap::Args, Debug, Clone)]
pub struct InvokeArgs {
    /// Document holding the operation.
    pub file: PathBuf,

    /// `operationId` (declared or derived) of the endpoint to call.
    #[clap(long)]
    pub operation: String,

    /// Origin the request is sent to, e.g. `http://localhost:8080`.
    #[clap(long, env = "OASPROBE_BASE_URL")]
    pub base_url: String,

    /// Parameter value, `name=value`. Repeatable.
    #[clap(long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Request timeout in seconds.
    #[clap(long, default_value_t = oasprobe_core::runner::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// Helper to parse "key=value" arguments.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid name=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Runs the invocation and returns its outcome.
pub fn run(args: &InvokeArgs) -> CliResult<TestOutcome> {
    let extracted = extract_file(&args.file)?;
    let config = RunnerConfig {
        timeout: Duration::from_secs(args.timeout_secs),
        ..RunnerConfig::default()
    };
    let pipeline = Pipeline::new(Arc::new(MemoryStore::new()), TestRunner::http(&config)?);
    let (_, stored) = pipeline.store().create_many(None, extracted.endpoints)?;

    let mut endpoint = stored
        .into_iter()
        .find(|e| e.operation_id == args.operation)
        .ok_or_else(|| CliError::General(format!("no operation named '{}'", args.operation)))?;

    for (name, value) in &args.params {
        let param = endpoint
            .parameters
            .iter_mut()
            .find(|p| &p.name == name)
            .ok_or_else(|| {
                CliError::General(format!(
                    "operation '{}' has no parameter '{}'",
                    args.operation, name
                ))
            })?;
        param.value = Some(value.clone());
    }

    let endpoint = pipeline.store().update(endpoint)?;
    let id = endpoint
        .id
        .ok_or_else(|| CliError::General("stored endpoint has no id".into()))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(pipeline.run_test(id, &args.base_url))?)
}

/// Prints the outcome as JSON. Undelivered requests fail the command.
pub fn execute(args: &InvokeArgs) -> CliResult<()> {
    let outcome = run(args)?;
    let json =
        serde_json::to_string_pretty(&outcome).map_err(|e| CliError::General(e.to_string()))?;
    println!("{}", json);

    match outcome.error {
        Some(error) => Err(CliError::General(error)),
        None => Ok(()),
    }
}
