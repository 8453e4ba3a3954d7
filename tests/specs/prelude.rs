//! Test helpers for fm's behavioral specifications.
//!
//! Provides a high-level DSL for testing the `fm` CLI's black-box
//! behavior: stdout, stderr, exit code.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }
    standard
}

fn fm_binary() -> PathBuf {
    binary_path("fm")
}

pub fn fm_cmd() -> Command {
    Command::new(fm_binary())
}

pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            dir: None,
            envs: Vec::new(),
        }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((key.to_string(), value.as_ref().to_string_lossy().to_string()));
        self
    }

    pub fn command(self) -> Command {
        let mut cmd = fm_cmd();
        cmd.args(&self.args);
        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }
        for (key, value) in self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    pub fn passes(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    pub fn fails(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    pub fn run(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        RunAssert { output }
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(expected), "stdout does not contain '{expected}'\nstdout: {stdout}");
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(!stdout.contains(unexpected), "stdout should not contain '{unexpected}'\nstdout: {stdout}");
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(expected), "stderr does not contain '{expected}'\nstderr: {stderr}");
        self
    }

    /// Asserts stdout matches exactly, with a readable diff on mismatch.
    pub fn stdout_is(self, expected: &str) -> Self {
        let stdout = self.stdout();
        similar_asserts::assert_eq!(stdout.trim_end(), expected.trim_end());
        self
    }
}

/// Temporary project directory for a test run: a workflow location
/// plus an isolated log root so runs never touch a developer's real
/// `~/.cache/fm`.
pub struct Project {
    dir: tempfile::TempDir,
    log_root: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            log_root: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn log_root(&self) -> &Path {
        self.log_root.path()
    }

    /// Writes a `ktests.yaml` at the project root.
    pub fn workflow(&self, content: &str) {
        std::fs::write(self.dir.path().join("ktests.yaml"), content).unwrap();
    }

    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.dir.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full_path, content).unwrap();
    }

    /// Runs `fm` in this project's directory, with an isolated log
    /// root so runs/report assertions don't depend on host state.
    pub fn fm(&self) -> CliBuilder {
        cli().pwd(self.path()).env("FM_LOG_ROOT", self.log_root())
    }

    pub fn latest_report(&self) -> String {
        let path = self.log_root.path().join("runs").join("latest").join("report.yaml");
        std::fs::read_to_string(&path).unwrap_or_else(|_| "(no report)".to_string())
    }
}

pub const LINEAR_WORKFLOW: &str = r#"
jobs:
  fetch:
    steps:
      - run: echo fetching
  build:
    needs: fetch
    steps:
      - run: echo building
  test:
    needs: build
    steps:
      - run: echo testing
"#;
