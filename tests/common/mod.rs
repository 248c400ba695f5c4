//! Shared testing utilities for initiatep CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Testing harness providing an isolated environment for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        Self { root, work_dir }
    }

    /// Absolute path to the emulated `$HOME` directory.
    pub fn home(&self) -> &Path {
        self.root.path()
    }

    /// Path to the working directory used for CLI invocations.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Build a command for invoking the compiled `initiatep` binary.
    ///
    /// The API key is removed from the inherited environment so runs only see
    /// what the test provides.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("initiatep").expect("Failed to locate initiatep binary");
        cmd.current_dir(self.work_dir())
            .env("HOME", self.home())
            .env_remove("GROQ_API_KEY")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Write `~/.initiatep/config.toml` pointing the client at `api_url`.
    pub fn write_config(&self, api_url: &str) {
        let dir = self.home().join(".initiatep");
        fs::create_dir_all(&dir).expect("Failed to create config directory");
        let content = format!(
            r#"[api]
api_url = "{}"
timeout_secs = 5
max_attempts = 2
retry_delay_ms = 1

[generation]
feature_delay_ms = 0
"#,
            api_url
        );
        fs::write(dir.join("config.toml"), content).expect("Failed to write config.toml");
    }

    /// Write a `.env` file into the home config directory.
    pub fn write_home_env(&self, content: &str) {
        let dir = self.home().join(".initiatep");
        fs::create_dir_all(&dir).expect("Failed to create config directory");
        fs::write(dir.join(".env"), content).expect("Failed to write .env");
    }

    /// Read a file below the work directory.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.work_dir.join(relative))
            .unwrap_or_else(|err| panic!("Failed to read {}: {}", relative, err))
    }
}
