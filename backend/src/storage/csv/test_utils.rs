//! Test utilities for CSV storage tests
//!
//! Provides an RAII environment whose temporary data directory is removed
//! even if the test panics.

use anyhow::Result;
use std::path::Path;
use tempfile::TempDir;

use super::connection::CsvConnection;

/// RAII test environment that cleans up on drop
pub struct TestEnvironment {
    /// Kept alive so the directory survives until the environment is dropped
    _temp_dir: TempDir,
    pub connection: CsvConnection,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
        })
    }

    /// Same as [`new`](Self::new) with a recognizable directory prefix
    pub fn new_with_prefix(prefix: &str) -> Result<Self> {
        let temp_dir = TempDir::with_prefix(prefix)?;
        let connection = CsvConnection::new(temp_dir.path())?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
        })
    }

    pub fn base_directory(&self) -> &Path {
        self.connection.base_directory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_removed_on_drop() {
        let env = TestEnvironment::new_with_prefix("chestnut_calendar_").unwrap();
        let path = env.base_directory().to_path_buf();
        assert!(path.exists());

        drop(env);
        assert!(!path.exists());
    }
}
