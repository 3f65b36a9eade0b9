//! Run a filter over JSON results

use crate::{FuzzResult, ResFilter, filter::placeholders_in, parser::parse_filter};
use super::{CliError, json_to_result, result_to_json};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter expression to apply
    pub filter: String,
    /// JSON input: one result object or an array of them
    pub input: Option<String>,
    /// JSON baseline result for `BBB`
    pub baseline: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only validate syntax, don't execute
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Visible results, after any rewrites the filter applied
    Success(serde_json::Value),
}

fn parse_results(input: &str) -> Result<Vec<FuzzResult>, CliError> {
    let json: serde_json::Value = serde_json::from_str(input)?;
    let items = match json {
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| json_to_result(i + 1, item))
        .collect()
}

/// Execute a resfilter check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.syntax_only {
        parse_filter(&options.filter).map_err(crate::FilterError::from)?;
        return Ok(CheckResult::SyntaxValid);
    }

    let input = options.input.as_ref().ok_or(CliError::NoInput)?;
    let results = parse_results(input)?;

    let mut filter = ResFilter::with_filter(&options.filter)?;
    if let Some(baseline) = &options.baseline {
        let json: serde_json::Value = serde_json::from_str(baseline)?;
        filter.set_baseline(json_to_result(0, json)?);
    }

    let mut visible = Vec::new();
    for mut result in results {
        if filter.is_visible(&mut result, None)? {
            visible.push(result_to_json(&result));
        }
    }
    log::info!("{} result(s) visible", visible.len());

    Ok(CheckResult::Success(serde_json::Value::Array(visible)))
}

/// Placeholders a filter refers to, without evaluating it
pub fn list_placeholders(filter: &str) -> Vec<String> {
    placeholders_in(filter)
}
