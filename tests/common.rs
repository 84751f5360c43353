//! Common test utilities shared between integration tests

use spectest_refresh::process::{ToolCommand, ToolOutput, ToolRunner};
use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::PathBuf;

/// An entry the fake clone leaves at the top of the corpus.
#[derive(Clone)]
pub enum Entry {
    File(&'static str),
    Dir(&'static str),
}

/// Stands in for both git and wast2json.
///
/// `git clone` materialises `corpus` in the destination, `git checkout`
/// succeeds, and each converter call writes a small JSON document to its `-o`
/// path, except for call number `fail_conversion` (1-based), which exits 1.
/// With `garbage` set the converter succeeds but writes something that is not JSON.
/// With `stray_file` set every conversion also leaves a plain file at that path.
pub struct FakeTools {
    pub corpus: Vec<Entry>,
    pub fail_conversion: Option<usize>,
    pub garbage: bool,
    pub stray_file: Option<PathBuf>,
    pub fail_git: Option<&'static str>,
    pub commands: RefCell<Vec<ToolCommand>>,
    conversions: Cell<usize>,
}

impl FakeTools {
    pub fn new(corpus: Vec<Entry>) -> Self {
        FakeTools {
            corpus,
            fail_conversion: None,
            garbage: false,
            stray_file: None,
            fail_git: None,
            commands: RefCell::new(Vec::new()),
            conversions: Cell::new(0),
        }
    }

    /// Source files handed to the converter, in call order.
    pub fn converted(&self) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .filter(|c| c.program == "wast2json")
            .map(|c| c.args[0].to_string_lossy().into_owned())
            .collect()
    }

    fn git(&self, command: &ToolCommand) -> io::Result<ToolOutput> {
        let sub = command.args[0].to_str().unwrap_or_default();
        if self.fail_git == Some(sub) {
            return Ok(failed(128, "fatal: unable to access remote\n"));
        }
        if sub == "clone" {
            let cwd = command.cwd.clone().unwrap_or_else(|| PathBuf::from("."));
            let dest = cwd.join(&command.args[2]);
            fs::create_dir(&dest)?;
            for entry in &self.corpus {
                match entry {
                    Entry::File(name) => fs::write(dest.join(name), "(module)\n")?,
                    Entry::Dir(name) => fs::create_dir_all(dest.join(name))?,
                }
            }
        }
        Ok(ok())
    }

    fn wast2json(&self, command: &ToolCommand) -> io::Result<ToolOutput> {
        let n = self.conversions.get() + 1;
        self.conversions.set(n);
        if self.fail_conversion == Some(n) {
            return Ok(failed(1, "wast2json: syntax error\n"));
        }
        if let Some(stray) = &self.stray_file {
            fs::write(stray, "not a directory")?;
        }
        if self.garbage {
            fs::write(&command.args[2], "garbage")?;
            return Ok(ok());
        }
        let document = format!(
            concat!(
                r#"{{"source_filename": "{}", "#,
                r#""commands": [{{"type": "module", "line": 1, "filename": "x.0.wasm"}}]}}"#,
            ),
            command.args[0].to_string_lossy()
        );
        fs::write(&command.args[2], document)?;
        Ok(ok())
    }
}

impl ToolRunner for FakeTools {
    fn run(&self, command: &ToolCommand) -> io::Result<ToolOutput> {
        self.commands.borrow_mut().push(command.clone());
        match command.program.as_str() {
            "git" => self.git(command),
            "wast2json" => self.wast2json(command),
            other => Err(io::Error::new(io::ErrorKind::NotFound, format!("{other}: not found"))),
        }
    }
}

fn ok() -> ToolOutput {
    ToolOutput {
        status: Some(0),
        ..ToolOutput::default()
    }
}

fn failed(code: i32, stderr: &str) -> ToolOutput {
    ToolOutput {
        status: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// Sorted names of the directory entries under `dir`.
pub fn listing(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
