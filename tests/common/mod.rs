//! Common test utilities for folio integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's real data directory or config file.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with isolated data and config directories.
///
/// The `folio()` method returns a `Command` that sets `FOLIO_DATA_DIR` and
/// `XDG_CONFIG_HOME` per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub config_home: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            config_home: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment with `alice` registered and logged in.
    pub fn logged_in() -> Self {
        let env = Self::new();
        env.folio()
            .args(["register", "alice", "Alice Smith", "--password", "secret1"])
            .assert()
            .success();
        env.folio()
            .args(["login", "alice", "--password", "secret1"])
            .assert()
            .success();
        env
    }

    /// Get a Command for the folio binary with isolated directories.
    pub fn folio(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_folio"));
        cmd.env("FOLIO_DATA_DIR", self.data_dir.path());
        cmd.env("XDG_CONFIG_HOME", self.config_home.path());
        cmd.env_remove("FOLIO_LOG");
        cmd
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Path of the config file folio reads by default in this environment.
    pub fn config_file(&self) -> std::path::PathBuf {
        self.config_home.path().join("folio").join("config.kdl")
    }

    /// Create a project and return its id.
    pub fn create_project(&self, name: &str, extra: &[&str]) -> String {
        let output = self
            .folio()
            .args(["project", "create", name])
            .args(["--description", "A sufficiently long description"])
            .args(["--start", "2030-01-01", "--end", "2030-12-31"])
            .args(extra)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "project create failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        json["id"].as_str().unwrap().to_string()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
