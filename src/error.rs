//! Error types for a testsuite refresh.
//!
//! Every failure is fatal. Variants differ only in what went wrong; the
//! [`Step`] they carry says where.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The stage of a refresh an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Config,
    Cleanup,
    Clone,
    Checkout,
    Prepare,
    Enumerate,
    Convert,
    Publish,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Config => "config",
            Step::Cleanup => "cleanup",
            Step::Clone => "clone",
            Step::Checkout => "checkout",
            Step::Prepare => "prepare",
            Step::Enumerate => "enumerate",
            Step::Convert => "convert",
            Step::Publish => "publish",
        };
        f.write_str(name)
    }
}

/// Render an exit status the way a shell user would read it.
fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {}", code),
        None => "termination by signal".to_string(),
    }
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("invalid revision {0:?}")]
    InvalidRevision(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{step}: {}: {source}", .path.display())]
    Io {
        step: Step,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{step}: could not run {program}: {source}")]
    Spawn {
        step: Step,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{step}: `{command}` failed with {}", describe_status(.status))]
    ToolFailed {
        step: Step,
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("convert: converter succeeded but produced no {}", .path.display())]
    MissingArtifact { path: PathBuf },
}

impl UpdateError {
    pub(crate) fn io(step: Step, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UpdateError::Io {
            step,
            path: path.into(),
            source,
        }
    }

    pub fn step(&self) -> Step {
        match self {
            UpdateError::InvalidRevision(_) | UpdateError::InvalidConfig(_) => Step::Config,
            UpdateError::Io { step, .. }
            | UpdateError::Spawn { step, .. }
            | UpdateError::ToolFailed { step, .. } => *step,
            UpdateError::MissingArtifact { .. } => Step::Convert,
        }
    }

    /// Process exit code for this failure: the failing tool's own code when
    /// there is one, otherwise 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            UpdateError::ToolFailed { status: Some(code), .. } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// Diagnostic text emitted by a failing external tool, if any.
    pub fn tool_stderr(&self) -> Option<&str> {
        match self {
            UpdateError::ToolFailed { stderr, .. } if !stderr.trim().is_empty() => Some(stderr),
            _ => None,
        }
    }
}
