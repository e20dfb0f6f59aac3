//! Table configuration loaded from TOML
//!
//! ```toml
//! path = "data/people.csv"
//! max_cached = 250
//! ```

use crate::error::{CsvError, Result};
use crate::file_table::{FileTable, DEFAULT_MAX_CACHED};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

fn default_max_cached() -> usize {
    DEFAULT_MAX_CACHED
}

/// Settings needed to open a [`FileTable`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    /// Backing CSV file
    pub path: PathBuf,

    /// Flush once cached rows plus pending deletions reach this many
    #[serde(default = "default_max_cached")]
    pub max_cached: usize,
}

impl TableConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TableConfig {
            path: path.into(),
            max_cached: DEFAULT_MAX_CACHED,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CsvError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| CsvError::Config(e.to_string()))
    }

    /// Read a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CsvError::file_operation(path, e))?;
        let config = Self::from_toml_str(&text)?;
        debug!("Loaded table config from {:?}: {:?}", path, config);
        Ok(config)
    }

    /// Open the configured table
    pub fn open<const SEP: char>(&self) -> Result<FileTable<SEP>> {
        FileTable::open(&self.path, self.max_cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full() {
        let config = TableConfig::from_toml_str("path = \"a.csv\"\nmax_cached = 5\n").unwrap();
        assert_eq!(config.path, PathBuf::from("a.csv"));
        assert_eq!(config.max_cached, 5);
    }

    #[test]
    fn test_default_max_cached() {
        let config = TableConfig::from_toml_str("path = \"a.csv\"").unwrap();
        assert_eq!(config.max_cached, DEFAULT_MAX_CACHED);
    }

    #[test]
    fn test_invalid_config() {
        assert_eq!(
            TableConfig::from_toml_str("max_cached = 5").unwrap_err().kind(),
            "ConfigError"
        );
        assert!(TableConfig::from_toml_str("path = \"a\"\ncolor = 1").is_err());
        assert!(TableConfig::from_toml_str("path = \"a\"\nmax_cached = -1").is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = TableConfig::new("x.csv");
        let text = config.to_toml_string().unwrap();
        assert_eq!(TableConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_and_open() -> Result<()> {
        let dir = TempDir::new()?;
        let csv = dir.path().join("table.csv");
        let cfg = dir.path().join("table.toml");
        fs::write(&csv, "a;b\nc")?;
        fs::write(&cfg, format!("path = {:?}\nmax_cached = 3\n", csv.display().to_string()))?;

        let config = TableConfig::load(&cfg)?;
        let table = config.open::<';'>()?;
        assert_eq!(table.len(), 2);
        assert_eq!(table.max_cached(), 3);
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let err = TableConfig::load("/nonexistent/table.toml").unwrap_err();
        assert_eq!(err.kind(), "FileOperationError");
    }
}
