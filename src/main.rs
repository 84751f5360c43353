//! Refresh `./res/spectest` from the pinned WebAssembly testsuite.
//!
//! Usage: update-testsuite
//!
//! Needs `git` and wabt's `wast2json` on the PATH. Set `RUST_LOG=debug` to see
//! every command as it runs.

use spectest_refresh::process::SystemRunner;
use spectest_refresh::{Config, Updater};
use std::io::{IsTerminal, Write};
use std::process;
use tracing::{debug, error};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::default();
    match Updater::new(&config, &SystemRunner).run() {
        Ok(report) => {
            if let Ok(json) = report.to_json() {
                debug!("{}", json);
            }
        }
        Err(e) => {
            if let Some(stderr) = e.tool_stderr() {
                let _ = std::io::stderr().write_all(stderr.as_bytes());
            }
            error!("{}", e);
            process::exit(e.exit_code());
        }
    }
}
