//! The refresh itself.
//!
//! A run is a fixed sequence of steps, each finishing before the next starts:
//!
//! 1. remove the staging clone and the published output left by a previous run
//! 2. clone the corpus and check out the pinned revision
//! 3. create the output directory inside the clone
//! 4. convert every top-level test script into its own output subdirectory
//! 5. move the output directory out of the clone to its published location
//!
//! The first failure ends the run. Nothing is rolled back; whatever earlier
//! steps produced stays on disk until the next run cleans it up.

use crate::artifact::{self, ArtifactSummary};
use crate::config::{Config, Revision};
use crate::convert::Converter;
use crate::error::{Step, UpdateError};
use crate::git;
use crate::process::ToolRunner;
use crate::scan;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One converted test script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertedScript {
    pub base_name: String,
    /// Artifact location relative to the output directory.
    pub artifact: PathBuf,
    /// Command counts, when the artifact could be read.
    pub summary: Option<ArtifactSummary>,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub output_dir: PathBuf,
    pub revision: Revision,
    pub scripts: Vec<ConvertedScript>,
}

impl Report {
    /// Assertions across every artifact that could be read.
    pub fn assertions(&self) -> usize {
        self.scripts
            .iter()
            .filter_map(|s| s.summary.as_ref())
            .map(|s| s.assertions)
            .sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Remove `path` whatever it is. Absence is not an error.
fn remove_tree(path: &Path) -> io::Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

pub struct Updater<'a, R: ToolRunner + ?Sized> {
    config: &'a Config,
    runner: &'a R,
    converter: Converter,
}

impl<'a, R: ToolRunner + ?Sized> Updater<'a, R> {
    pub fn new(config: &'a Config, runner: &'a R) -> Self {
        Updater {
            config,
            runner,
            converter: Converter::from_config(config),
        }
    }

    /// Perform a complete refresh.
    pub fn run(&self) -> Result<Report, UpdateError> {
        self.config.validate()?;

        self.clean()?;
        self.acquire()?;
        let staged = self.prepare()?;
        let scripts = self.convert_all(&staged)?;
        self.publish(&staged)?;

        let report = Report {
            output_dir: self.config.output_dir(),
            revision: self.config.repository.revision.clone(),
            scripts,
        };
        info!(
            scripts = report.scripts.len(),
            assertions = report.assertions(),
            output = %report.output_dir.display(),
            "testsuite refreshed"
        );
        Ok(report)
    }

    /// Step 1: remove the staging clone and the published output.
    pub fn clean(&self) -> Result<(), UpdateError> {
        for dir in [self.config.staging_dir(), self.config.output_dir()] {
            info!(path = %dir.display(), "removing");
            remove_tree(&dir).map_err(|e| UpdateError::io(Step::Cleanup, &dir, e))?;
        }
        Ok(())
    }

    /// Step 2: clone into the staging directory and pin the revision.
    pub fn acquire(&self) -> Result<(), UpdateError> {
        let root = &self.config.root;
        fs::create_dir_all(root).map_err(|e| UpdateError::io(Step::Clone, root, e))?;
        git::fetch(
            self.runner,
            &self.config.git,
            &self.config.repository,
            &self.config.staging_dir(),
        )
    }

    /// Step 3: create the output directory inside the clone.
    pub fn prepare(&self) -> Result<PathBuf, UpdateError> {
        let staged = self.config.staged_output_dir();
        info!(path = %staged.display(), "creating output directory");
        fs::create_dir(&staged).map_err(|e| UpdateError::io(Step::Prepare, &staged, e))?;
        Ok(staged)
    }

    /// Step 4: convert every test script at the top of the clone.
    pub fn convert_all(&self, staged: &Path) -> Result<Vec<ConvertedScript>, UpdateError> {
        let scripts = scan::find_scripts(&self.config.staging_dir(), &self.config.source_suffix)?;
        info!(count = scripts.len(), "converting test scripts");

        let mut converted = Vec::with_capacity(scripts.len());
        for script in &scripts {
            let artifact = self.converter.convert(self.runner, script, staged)?;
            let summary = match artifact::inspect(&artifact) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    warn!(artifact = %artifact.display(), "{}", e);
                    None
                }
            };
            converted.push(ConvertedScript {
                base_name: script.base_name.clone(),
                artifact: self.converter.artifact_path(Path::new(""), &script.base_name),
                summary,
            });
        }
        Ok(converted)
    }

    /// Step 5: move the output directory to its published location.
    pub fn publish(&self, staged: &Path) -> Result<(), UpdateError> {
        let output = self.config.output_dir();
        info!(from = %staged.display(), to = %output.display(), "publishing");
        fs::rename(staged, &output).map_err(|e| UpdateError::io(Step::Publish, &output, e))
    }
}
