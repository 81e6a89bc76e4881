#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Sandboxed data directory plus a pinned "today" for CLI tests.
pub struct TestData {
    dir: TempDir,
    today: String,
}

impl TestData {
    pub fn new(today: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self {
            dir,
            today: today.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn set_today(&mut self, today: &str) {
        self.today = today.to_string();
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.path().join(key)
    }

    pub fn read_record(&self, key: &str) -> String {
        fs::read_to_string(self.record_path(key)).expect("read record")
    }

    pub fn write_record(&self, key: &str, contents: &str) {
        fs::write(self.record_path(key), contents).expect("write record");
    }

    /// `levelup` command bound to this data dir and date.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("levelup").expect("binary");
        cmd.env_remove("LEVELUP_DIR")
            .env_remove("LEVELUP_TODAY")
            .env_remove("RUST_LOG")
            .arg("--data-dir")
            .arg(self.path())
            .arg("--today")
            .arg(&self.today);
        cmd
    }

    /// Run with `--json` and parse stdout, asserting success.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .output()
            .expect("run levelup");
        assert!(
            output.status.success(),
            "levelup {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        serde_json::from_slice(&output.stdout).expect("json output")
    }

    /// Run with `--json`, expect failure, and return (exit code, payload).
    pub fn json_err(&self, args: &[&str]) -> (i32, Value) {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .output()
            .expect("run levelup");
        assert!(!output.status.success(), "levelup {:?} unexpectedly succeeded", args);
        let code = output.status.code().expect("exit code");
        let payload = serde_json::from_slice(&output.stdout).expect("json error output");
        (code, payload)
    }

    /// Answer the defaults offer and dismiss every info panel.
    pub fn setup_defaults(&self) {
        self.json(&["setup", "yes"]);
        for panel in ["stats", "tasks", "rewards"] {
            self.json(&["dismiss", panel]);
        }
    }
}
