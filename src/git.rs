//! Fetching the corpus with git.

use crate::config::Repository;
use crate::error::{Step, UpdateError};
use crate::process::{run_checked, ToolCommand, ToolRunner};
use std::path::Path;
use tracing::info;

/// `git clone <url> <dest>`, run from `dest`'s parent.
pub fn clone_command(git: &str, repository: &Repository, dest: &Path) -> ToolCommand {
    let mut command = ToolCommand::new(git).arg("clone").arg(repository.url.as_str());
    match (dest.parent(), dest.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            command = command.path_arg(Path::new(name)).current_dir(parent);
        }
        _ => command = command.path_arg(dest),
    }
    command
}

/// `git checkout -b <rev> <rev>`: a local branch named after the pinned revision.
pub fn checkout_command(git: &str, repository: &Repository, worktree: &Path) -> ToolCommand {
    let revision = repository.revision.as_str();
    ToolCommand::new(git)
        .arg("checkout")
        .arg("-b")
        .arg(revision)
        .arg(revision)
        .current_dir(worktree)
}

/// Clone `repository` into `dest` and pin it to its revision.
pub fn fetch<R: ToolRunner + ?Sized>(
    runner: &R,
    git: &str,
    repository: &Repository,
    dest: &Path,
) -> Result<(), UpdateError> {
    info!(url = %repository.url, dest = %dest.display(), "cloning");
    run_checked(runner, Step::Clone, &clone_command(git, repository, dest))?;

    info!(revision = %repository.revision, "checking out");
    run_checked(runner, Step::Checkout, &checkout_command(git, repository, dest))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::process::ToolOutput;
    use std::cell::RefCell;
    use std::io;

    #[test]
    fn clone_runs_from_parent() {
        let config = Config::default();
        let cmd = clone_command("git", &config.repository, &config.staging_dir());
        assert_eq!(
            cmd.to_string(),
            "git clone https://github.com/WebAssembly/testsuite testsuite"
        );
        assert_eq!(cmd.cwd.as_deref(), Some(Path::new("./res")));
    }

    #[test]
    fn clone_bare_destination() {
        let config = Config::default();
        let cmd = clone_command("git", &config.repository, Path::new("testsuite"));
        assert_eq!(cmd.args.last().and_then(|a| a.to_str()), Some("testsuite"));
        assert_eq!(cmd.cwd, None);
    }

    #[test]
    fn checkout_pins_revision() {
        let config = Config::default();
        let cmd = checkout_command("git", &config.repository, &config.staging_dir());
        let rev = config.repository.revision.as_str();
        assert_eq!(cmd.args, vec!["checkout", "-b", rev, rev]);
        assert_eq!(cmd.cwd.as_deref(), Some(Path::new("./res/testsuite")));
    }

    struct Recorder {
        seen: RefCell<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl ToolRunner for Recorder {
        fn run(&self, command: &ToolCommand) -> io::Result<ToolOutput> {
            let sub = command.args[0].to_string_lossy().into_owned();
            let failed = self.fail_on == Some(sub.as_str());
            self.seen.borrow_mut().push(sub);
            Ok(ToolOutput {
                status: Some(if failed { 128 } else { 0 }),
                ..ToolOutput::default()
            })
        }
    }

    #[test]
    fn fetch_clones_then_checks_out() {
        let runner = Recorder {
            seen: RefCell::new(vec![]),
            fail_on: None,
        };
        let config = Config::default();
        fetch(&runner, "git", &config.repository, &config.staging_dir()).unwrap();
        assert_eq!(*runner.seen.borrow(), vec!["clone", "checkout"]);
    }

    #[test]
    fn failed_clone_skips_checkout() {
        let runner = Recorder {
            seen: RefCell::new(vec![]),
            fail_on: Some("clone"),
        };
        let config = Config::default();
        let err = fetch(&runner, "git", &config.repository, &config.staging_dir()).unwrap_err();
        assert_eq!(err.step(), Step::Clone);
        assert_eq!(err.exit_code(), 128);
        assert_eq!(*runner.seen.borrow(), vec!["clone"]);
    }

    #[test]
    fn failed_checkout_is_checkout_step() {
        let runner = Recorder {
            seen: RefCell::new(vec![]),
            fail_on: Some("checkout"),
        };
        let config = Config::default();
        let err = fetch(&runner, "git", &config.repository, &config.staging_dir()).unwrap_err();
        assert_eq!(err.step(), Step::Checkout);
    }
}
