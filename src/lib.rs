//! Keeps a local copy of the WebAssembly specification testsuite up to date.
//!
//! The testsuite is published as `.wast` scripts. Runtimes that do not parse
//! scripts themselves consume them in the JSON form produced by wabt's
//! `wast2json`. This crate clones the testsuite at a pinned revision and
//! converts every script, leaving one directory per script:
//!
//! ```text
//! res/spectest/<name>/<name>.json
//! ```
//!
//! # Modules
//!
//! - [`config`] -- The repository, revision, paths and tool names for a run.
//! - [`update`] -- The refresh: clean, clone, convert, publish.
//! - [`git`] -- Clone and pinned checkout.
//! - [`scan`] -- Finding test scripts in the clone.
//! - [`convert`] -- Running the converter for one script.
//! - [`artifact`] -- Counting the commands in a converted script.
//! - [`process`] -- Running external tools, real or fake.
//! - [`error`] -- The error type shared by all of the above.
//!
//! # Example
//!
//! Run a refresh with a stand-in for git and wast2json:
//!
//! ```
//! use spectest_refresh::config::Config;
//! use spectest_refresh::process::{ToolCommand, ToolOutput, ToolRunner};
//! use spectest_refresh::update::Updater;
//!
//! struct Offline;
//!
//! impl ToolRunner for Offline {
//!     fn run(&self, cmd: &ToolCommand) -> std::io::Result<ToolOutput> {
//!         if cmd.args[0] == "clone" {
//!             let dest = cmd.cwd.as_ref().unwrap().join(&cmd.args[2]);
//!             std::fs::create_dir(&dest)?;
//!             std::fs::write(dest.join("nop.wast"), "(module)")?;
//!         } else if cmd.program == "wast2json" {
//!             std::fs::write(&cmd.args[2], r#"{"source_filename":"nop.wast","commands":[]}"#)?;
//!         }
//!         Ok(ToolOutput { status: Some(0), ..ToolOutput::default() })
//!     }
//! }
//!
//! let root = std::env::temp_dir().join(format!("spectest-doc-{}", std::process::id()));
//! let config = Config::with_root(&root);
//! let report = Updater::new(&config, &Offline).run().unwrap();
//! assert_eq!(report.scripts[0].base_name, "nop");
//! assert!(root.join("spectest/nop/nop.json").is_file());
//! std::fs::remove_dir_all(&root).unwrap();
//! ```

pub mod artifact;
pub mod config;
pub mod convert;
pub mod error;
pub mod git;
pub mod process;
pub mod scan;
pub mod update;

pub use config::Config;
pub use error::{Step, UpdateError};
pub use update::{Report, Updater};
