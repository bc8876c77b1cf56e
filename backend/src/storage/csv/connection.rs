use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Column order of `events.csv`
pub const EVENTS_HEADER: [&str; 4] = ["id", "title", "timestamp", "color"];

const EVENTS_FILE_NAME: &str = "events.csv";

/// CsvConnection manages the data directory holding `events.csv`
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {:?}", base_path);
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Connection in `<user data dir>/chestnut-map`
    pub fn new_default() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine user data directory"))?;
        Self::new(data_dir.join("chestnut-map"))
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn events_file_path(&self) -> PathBuf {
        self.base_directory.join(EVENTS_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");

        let connection = CsvConnection::new(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(connection.base_directory(), nested.as_path());
    }
}
