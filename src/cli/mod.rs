//! CLI support for resfilter-lang
//!
//! Provides programmatic access to the `resfilter` commands so other tools
//! can run filters over JSON result dumps without shelling out.

mod check;
mod convert;
mod docs;

pub use check::{CheckOptions, CheckResult, execute_check, list_placeholders};
pub use convert::{json_to_result, json_to_value, result_to_json, value_to_json};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Filter parse or evaluation error
    #[error("{0}")]
    Filter(#[from] crate::FilterError),

    /// JSON parsing error
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Input JSON is not shaped like a result
    #[error("Invalid result at position {position}: {reason}")]
    InvalidResult { position: usize, reason: String },

    /// No input provided
    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    /// Unknown documentation category
    #[error("Unknown category: '{0}'\nRun 'resfilter docs' to see available categories.")]
    UnknownCategory(String),
}
