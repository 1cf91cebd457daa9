mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// CLI arguments that can be overridden by the TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub reset: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite file holding the warehouse tables.
    pub db_path: PathBuf,
    /// Root of the song metadata tree.
    pub song_data: PathBuf,
    /// Root of the activity log tree.
    pub log_data: PathBuf,
    /// Drop and recreate the tables before loading.
    pub reset: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.db_path.clone());
        if db_path.as_os_str().is_empty() {
            bail!("db_path must be specified via --db-path or in config file");
        }
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }
        let db_dir = match db_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !db_dir.is_dir() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }

        let song_data = file
            .song_data
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.song_data.clone());
        let log_data = file
            .log_data
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.log_data.clone());

        Ok(Self {
            db_path,
            song_data,
            log_data,
            reset: cli.reset,
        })
    }
}
