//! Validate JSON input against an expression

use super::CliError;
use crate::{Validator, output::Report};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The expression to validate against
    pub expr: String,
    /// JSON input string
    pub input: Option<String>,
    /// Only validate syntax and function names, don't evaluate
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// The input was validated
    Validated(Report),
}

/// Execute a vally check operation
pub fn execute_check(validator: &Validator, options: &CheckOptions) -> Result<CheckResult, CliError> {
    validator.check(&options.expr)?;
    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let value: serde_json::Value = serde_json::from_str(json_str)?;

    let report = Report::from_result(validator.validate_value(&options.expr, &value))?;
    Ok(CheckResult::Validated(report))
}
