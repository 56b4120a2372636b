mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, GridConfig, LogConfig, PeriodsConfig, TermConfig};
pub use database::{LessonDb, DB_FILE_NAME};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/lessontable[-dev]/` based on LESSONTABLE_ENV.
///
/// Set LESSONTABLE_ENV=dev to use the development data directory, or
/// LESSONTABLE_DATA_DIR to use an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("LESSONTABLE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("LESSONTABLE_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("lessontable-dev")
            } else {
                base_dir.join("lessontable")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
