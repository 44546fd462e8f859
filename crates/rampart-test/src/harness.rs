//! Test harness helpers.

use std::path::PathBuf;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Create a temporary directory for testing.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
pub fn test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Create a file within a temporary directory, creating parents as needed.
///
/// # Panics
///
/// Panics if the file cannot be created or written.
#[must_use]
pub fn test_file_in_dir(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    std::fs::write(&path, content).expect("Failed to write file");
    path
}

/// Write a policy document into a fresh temporary directory.
///
/// The extension of `name` selects the format the loader will use. Keep the
/// returned `TempDir` alive for as long as the path is needed.
///
/// # Panics
///
/// Panics if the directory or file cannot be created.
#[must_use]
pub fn policy_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = test_dir();
    let path = test_file_in_dir(&dir, name, content);
    (dir, path)
}

/// Set up test logging with the given filter.
///
/// Safe to call from several tests; only the first call installs the
/// subscriber.
pub fn setup_test_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

/// Set up test logging at `warn`.
pub fn setup_test_logging_default() {
    setup_test_logging("warn");
}
