//! Run scripts against the sources of a sources file

use std::path::PathBuf;

use super::{CliError, SourcesFile};

/// Options for the run command
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// The script to run
    pub script: String,
    /// Path of the sources file
    pub sources: PathBuf,
}

/// Execute a sqlface run operation, returning the JSON result map
pub async fn execute_run(options: &RunOptions) -> Result<serde_json::Value, CliError> {
    let text = std::fs::read_to_string(&options.sources)?;
    let context = SourcesFile::from_json(&text)?.into_context()?.build();

    let results = context.execute(&options.script).await?;
    Ok(serde_json::to_value(&results)?)
}
