//! Synchronous execution of external tools.
//!
//! The refresh drives two programs it knows nothing about beyond their
//! command lines: the version-control tool and the converter. Both are run
//! through a [`ToolRunner`] so the orchestration can be exercised without a
//! network or a wabt install.

use crate::error::{Step, UpdateError};
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// A command line to execute, with an optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    /// Arguments exactly as the child sees them; paths keep their raw bytes.
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        ToolCommand {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.as_os_str())
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// What a finished tool left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs a command to completion and captures its output.
///
/// `Err` means the process could not be started at all; a process that ran
/// and failed is reported through [`ToolOutput::status`].
pub trait ToolRunner {
    fn run(&self, command: &ToolCommand) -> io::Result<ToolOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> io::Result<ToolOutput> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }
        let output = cmd.output()?;
        Ok(ToolOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Run `command`, turning anything but a zero exit into an error for `step`.
pub fn run_checked<R: ToolRunner + ?Sized>(
    runner: &R,
    step: Step,
    command: &ToolCommand,
) -> Result<ToolOutput, UpdateError> {
    debug!(%step, command = %command, "running");
    let output = runner.run(command).map_err(|source| UpdateError::Spawn {
        step,
        program: command.program.clone(),
        source,
    })?;

    if !output.stdout.trim().is_empty() {
        debug!(%step, stdout = %output.stdout.trim_end(), "tool output");
    }

    if output.success() {
        Ok(output)
    } else {
        Err(UpdateError::ToolFailed {
            step,
            command: command.to_string(),
            status: output.status,
            stderr: output.stderr,
        })
    }
}
