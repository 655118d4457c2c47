//! Common test utilities shared across integration tests.
//!
//! Clippy cannot track usage across integration test files,
//! hence the `allow(dead_code)` annotation.
#![cfg(test)]
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use matchfeed_types::FeedPage;

pub struct TestFixture {
    temp_dir: TempDir,
    data_dir: PathBuf,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join(".matchfeed");

        Self { temp_dir, data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Write a replay recording next to the data directory
    pub fn recording(&self, pages: Vec<FeedPage>) -> PathBuf {
        matchfeed_testing::write_recording(self.temp_dir.path(), "feed.json", pages)
            .expect("Failed to write recording")
    }

    /// `matchfeed --data-dir <tmp>` with a clean logging environment
    #[allow(deprecated)]
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("matchfeed").expect("Failed to find matchfeed binary");
        cmd.arg("--data-dir")
            .arg(&self.data_dir)
            .env_remove("RUST_LOG")
            .env_remove("MATCHFEED_PATH");
        cmd
    }
}
