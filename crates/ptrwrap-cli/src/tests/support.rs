//! Test support utilities for CLI behavioural coverage.
//!
//! Supplies a fixed configuration loader and a world that owns a scratch
//! directory, so step definitions and unit tests stay focused on their
//! assertions.

use std::ffi::OsString;
use std::fs;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use ptrwrap_config::Config;
use tempfile::TempDir;

use crate::{AppError, ConfigLoader, IoStreams, run_with_loader};

/// A config loader that returns a fixed configuration for tests.
pub(super) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(super) const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Test world holding configuration, scratch files and captured output.
pub(super) struct TestWorld {
    pub config: Config,
    pub temp_dir: TempDir,
    pub arguments: Vec<OsString>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self {
            config: Config::default(),
            temp_dir: TempDir::new().expect("create temp dir"),
            arguments: Vec::new(),
            stdout: Vec::new(),
            stderr: Vec::new(),
            exit_code: None,
        }
    }
}

impl TestWorld {
    /// Writes `content` to `name` inside the scratch directory.
    pub(super) fn write_file(&self, name: &str, content: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(self.temp_dir.path().join(name))
            .expect("utf-8 temp path");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(&path, content).expect("write scratch file");
        path
    }

    /// Path of `name` inside the scratch directory.
    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.temp_dir.path().join(name)).expect("utf-8 temp path")
    }

    /// Runs the CLI with the stored arguments and a fixed configuration.
    pub(super) fn run(&mut self) {
        let mut args = vec![OsString::from("rewrite-raw-ptr-fields")];
        args.extend(self.arguments.iter().cloned());
        let loader = StaticConfigLoader::new(self.config.clone());
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let exit = {
            let mut io = IoStreams::new(&mut stdout, &mut stderr);
            run_with_loader(args, &mut io, &loader)
        };
        self.stdout = stdout;
        self.stderr = stderr;
        self.exit_code = Some(exit);
    }

    pub(super) fn stdout_text(&self) -> String {
        String::from_utf8(self.stdout.clone()).expect("stdout utf8")
    }

    pub(super) fn stderr_text(&self) -> String {
        String::from_utf8(self.stderr.clone()).expect("stderr utf8")
    }
}
