//! Where pbudget keeps its files.
//!
//! The data directory defaults to the platform data location
//! (`~/.local/share/pbudget` on Linux) and falls back to the working
//! directory when no home directory is known. The database, exports and
//! charts all default to files inside it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::domain::YearMonth;

pub const DATABASE_FILE: &str = "pbudget.db";
pub const EXPORT_FILE: &str = "transactions_export.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub database: PathBuf,
}

impl Config {
    /// Resolve paths from command-line overrides, falling back to defaults.
    pub fn resolve(data_dir: Option<PathBuf>, database: Option<PathBuf>) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let database = database.unwrap_or_else(|| data_dir.join(DATABASE_FILE));
        Self { data_dir, database }
    }

    /// Create the data directory and the database's parent directory.
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data directory {}", self.data_dir.display())
        })?;

        if let Some(parent) = self.database.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
        Ok(())
    }

    pub fn default_export_path(&self) -> PathBuf {
        self.data_dir.join(EXPORT_FILE)
    }

    pub fn default_chart_path(&self, month: YearMonth) -> PathBuf {
        self.data_dir
            .join(format!("category_breakdown_{}.svg", month))
    }

    pub fn database(&self) -> &Path {
        &self.database
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "pbudget")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
