//! Validate scripts without running them

use super::CliError;
use crate::Parser;

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The script to validate
    pub script: String,
    /// Print the parsed statements instead of a verdict
    pub ast: bool,
    /// Pretty-print the JSON syntax tree
    pub pretty: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Canonical rendering of each statement, then the JSON syntax tree
    Ast { rendered: String, tree: String },
}

/// Execute a sqlface check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let tree = Parser::new(&options.script).parse()?;

    if !options.ast {
        return Ok(CheckResult::SyntaxValid);
    }

    let json = if options.pretty {
        serde_json::to_string_pretty(&tree)
    } else {
        serde_json::to_string(&tree)
    }?;

    Ok(CheckResult::Ast {
        rendered: tree.to_string(),
        tree: json,
    })
}
