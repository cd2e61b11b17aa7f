//! CLI support for sqlface
//!
//! Provides programmatic access to the sqlface command-line functionality
//! for embedding in other tools.

mod check;
mod docs;
mod run;
mod sources;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use run::{RunOptions, execute_run};
pub use sources::{FieldConfig, FieldType, ShapeConfig, SourceConfig, SourcesFile};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Script failed to parse, compile or run
    #[error("{0}")]
    Query(#[from] crate::Error),

    /// JSON parsing or serialization error
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed sources file
    #[error("Invalid sources file: {0}")]
    Config(String),

    /// No script provided
    #[error("No script provided. Pass it as an argument or pipe it to stdin.")]
    NoScript,

    /// Unknown documentation category
    #[error("Unknown category: '{0}'\nRun 'sqlface docs' to see available categories.")]
    UnknownCategory(String),
}

impl From<crate::ParseError> for CliError {
    fn from(e: crate::ParseError) -> Self {
        CliError::Query(crate::Error::Parse(e))
    }
}
