// src/report.rs
//! Shared plumbing for the `get_*` report binaries: argument checks and the
//! JSON-on-stdout contract.
use log::error;
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, Result};

/// Logs go to stderr so stdout carries nothing but the JSON document.
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

/// Positional arguments after the program name, checked against `names`.
pub fn positional_args<I>(args: I, names: &[&str]) -> Result<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let values: Vec<String> = args.into_iter().skip(1).collect();
    if values.len() < names.len() {
        return Err(AppError::MissingArgument(names.join(" ")));
    }
    Ok(values.into_iter().take(names.len()).collect())
}

/// Renders a report outcome. Failures become `{"error": msg}`.
pub fn render<T: Serialize>(outcome: &Result<T>) -> String {
    let value = match outcome {
        Ok(report) => serde_json::to_value(report)
            .unwrap_or_else(|e| json!({ "error": format!("serialization failed: {}", e) })),
        Err(e) => json!({ "error": e.to_string() }),
    };
    value.to_string()
}

/// Prints the outcome and returns the process exit code.
pub fn emit<T: Serialize>(outcome: Result<T>) -> i32 {
    println!("{}", render(&outcome));
    match outcome {
        Ok(_) => 0,
        Err(e) => {
            error!("report failed: {}", e);
            1
        }
    }
}
