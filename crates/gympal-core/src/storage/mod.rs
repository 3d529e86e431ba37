mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, LoggingConfig, MetricsConfig, UserConfig, WorkoutsConfig};
pub use database::{Database, ExportRow, LoggedSet};

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// Resolution order:
/// - `GYMPAL_DATA_DIR` if set
/// - `~/.config/gympal-dev/` when `GYMPAL_ENV=dev`
/// - `~/.config/gympal/`
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("GYMPAL_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("GYMPAL_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("gympal-dev")
            } else {
                base_dir.join("gympal")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
