//! Converting test scripts with an external tool.
//!
//! Each script `<base>.wast` gets its own directory `<output>/<base>/` and the
//! converter writes `<base>.<ext>` into it. wast2json also drops the binary
//! modules it extracts next to that file, which is why every script needs a
//! directory of its own.

use crate::config::Config;
use crate::error::{Step, UpdateError};
use crate::process::{run_checked, ToolCommand, ToolRunner};
use crate::scan::TestScript;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The converter program and the kind of artifact it writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converter {
    pub program: String,
    pub extension: String,
}

impl Converter {
    pub fn from_config(config: &Config) -> Self {
        Converter {
            program: config.converter.clone(),
            extension: config.artifact_extension.clone(),
        }
    }

    /// `<output>/<base>/<base>.<ext>`
    pub fn artifact_path(&self, output: &Path, base_name: &str) -> PathBuf {
        output
            .join(base_name)
            .join(format!("{}.{}", base_name, self.extension))
    }

    /// `<program> <script> -o <artifact>`, run from the script's directory.
    pub fn command(&self, script: &TestScript, artifact: &Path) -> ToolCommand {
        let file = script.path.file_name().map(Path::new).unwrap_or(script.path.as_path());
        let command = ToolCommand::new(self.program.as_str())
            .path_arg(file)
            .arg("-o")
            .path_arg(artifact);
        match script.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => command.current_dir(dir),
            _ => command,
        }
    }

    /// Convert one script into a fresh directory under `output`, returning the
    /// artifact's path.
    pub fn convert<R: ToolRunner + ?Sized>(
        &self,
        runner: &R,
        script: &TestScript,
        output: &Path,
    ) -> Result<PathBuf, UpdateError> {
        let dir = output.join(&script.base_name);
        fs::create_dir(&dir).map_err(|e| UpdateError::io(Step::Convert, &dir, e))?;

        // The converter runs from the script's directory; it needs an absolute output path.
        let artifact = absolute(&self.artifact_path(output, &script.base_name))?;
        debug!(script = %script.path.display(), artifact = %artifact.display(), "converting");
        run_checked(runner, Step::Convert, &self.command(script, &artifact))?;

        if !artifact.is_file() {
            return Err(UpdateError::MissingArtifact { path: artifact });
        }
        Ok(artifact)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, UpdateError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| UpdateError::io(Step::Convert, path, e))?;
    Ok(cwd.join(path))
}
