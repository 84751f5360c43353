//! Run configuration for a testsuite refresh.
//!
//! Everything the updater needs to know is fixed when the process starts: which
//! repository to clone, which revision to pin it to, where the corpus lives on
//! disk, and which external tools to call. [`Config::default`] carries the
//! values used by the `update-testsuite` binary; tests build their own.

use crate::error::UpdateError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Upstream home of the WebAssembly specification testsuite.
pub const TESTSUITE_URL: &str = "https://github.com/WebAssembly/testsuite";

/// Commit of the testsuite the local corpus is pinned to.
pub const TESTSUITE_REVISION: &str = "5fddf13f296cb08a7a8055f4f6d63632485cab14";

/// Hex commit ids (abbreviated or full), or tag and branch style names.
static REVISION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9a-f]{7,40}|[A-Za-z0-9_][A-Za-z0-9._/-]*)$").unwrap());

/// A revision identifier that git will accept as a checkout target.
///
/// Values that would be read as options (leading `-`) or that contain
/// whitespace are rejected before anything touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Revision(String);

impl Revision {
    pub fn new(revision: impl Into<String>) -> Result<Self, UpdateError> {
        let revision = revision.into();
        if REVISION_RE.is_match(&revision) && !revision.contains("..") {
            Ok(Revision(revision))
        } else {
            Err(UpdateError::InvalidRevision(revision))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Revision {
    type Error = UpdateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Revision::new(value)
    }
}

impl From<Revision> for String {
    fn from(revision: Revision) -> Self {
        revision.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The remote corpus: where it lives and which snapshot of it we want.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub url: String,
    pub revision: Revision,
}

/// Complete configuration for one refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub repository: Repository,
    /// Directory holding both the staging clone and the published output.
    pub root: PathBuf,
    /// Name of the staging clone under `root`.
    pub staging_name: String,
    /// Name of the output directory, both inside the staging clone and under `root`.
    pub output_name: String,
    /// Suffix marking a test script, including the leading dot.
    pub source_suffix: String,
    /// Extension of a converted artifact, without the leading dot.
    pub artifact_extension: String,
    /// Version-control program.
    pub git: String,
    /// Script-to-JSON converter program.
    pub converter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            repository: Repository {
                url: TESTSUITE_URL.to_string(),
                revision: Revision(TESTSUITE_REVISION.to_string()),
            },
            root: PathBuf::from("./res"),
            staging_name: "testsuite".to_string(),
            output_name: "spectest".to_string(),
            source_suffix: ".wast".to_string(),
            artifact_extension: "json".to_string(),
            git: "git".to_string(),
            converter: "wast2json".to_string(),
        }
    }
}

impl Config {
    /// Default configuration rooted somewhere other than `./res`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Config {
            root: root.into(),
            ..Config::default()
        }
    }

    /// Where the repository is cloned.
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(&self.staging_name)
    }

    /// Where converted artifacts are collected while the clone is still in place.
    pub fn staged_output_dir(&self) -> PathBuf {
        self.staging_dir().join(&self.output_name)
    }

    /// Final, published location of the converted corpus.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.output_name)
    }

    /// Rejects configurations that cannot produce a sensible run.
    pub fn validate(&self) -> Result<(), UpdateError> {
        Revision::new(self.repository.revision.as_str())?;
        if self.source_suffix.is_empty() {
            return Err(UpdateError::InvalidConfig("source suffix is empty".to_string()));
        }
        for (what, name) in [("staging", &self.staging_name), ("output", &self.output_name)] {
            if name.is_empty() || name.contains('/') || name == "." || name == ".." {
                let message = format!("bad {} directory name {:?}", what, name);
                return Err(UpdateError::InvalidConfig(message));
            }
        }
        if self.staging_name == self.output_name {
            return Err(UpdateError::InvalidConfig(
                "staging and output directories must differ".to_string(),
            ));
        }
        Ok(())
    }
}
