//! A light look inside converted artifacts.
//!
//! wast2json writes a JSON document naming the script it came from and listing
//! its commands. The refresh only counts them for its report; a document that
//! does not parse is worth a warning, never a failed run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("cannot read artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("artifact is not a wast2json document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct Document {
    source_filename: String,
    commands: Vec<Command>,
}

#[derive(Deserialize)]
struct Command {
    r#type: String,
}

/// Command counts for one converted script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    pub source_filename: String,
    pub commands: usize,
    pub modules: usize,
    pub assertions: usize,
}

pub fn summarize(json: &str) -> Result<ArtifactSummary, InspectError> {
    let document: Document = serde_json::from_str(json)?;
    let mut summary = ArtifactSummary {
        source_filename: document.source_filename,
        commands: document.commands.len(),
        ..ArtifactSummary::default()
    };
    for command in &document.commands {
        if command.r#type == "module" {
            summary.modules += 1;
        } else if command.r#type.starts_with("assert_") {
            summary.assertions += 1;
        }
    }
    Ok(summary)
}

pub fn inspect(path: &Path) -> Result<ArtifactSummary, InspectError> {
    summarize(&fs::read_to_string(path)?)
}
