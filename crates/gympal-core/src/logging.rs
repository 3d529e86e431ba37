//! Log setup: stderr plus a size-rotated file in the data directory.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::Result;
use crate::storage::LoggingConfig;

pub const LOG_DIR: &str = "logs";
pub const LOG_FILE: &str = "gympal.log";

/// Path of the active log file under `data_dir`.
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_DIR).join(LOG_FILE)
}

fn backup_path(path: &Path, index: u32) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

/// Rotate `path` if it is larger than `max_bytes`.
///
/// `gympal.log` becomes `gympal.log.1`, `.1` becomes `.2` and so on, keeping
/// at most `backups` old files. With zero backups the file is simply removed.
/// Returns whether a rotation happened.
pub fn rotate_if_needed(path: &Path, max_bytes: u64, backups: u32) -> Result<bool> {
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    if size <= max_bytes {
        return Ok(false);
    }

    if backups == 0 {
        fs::remove_file(path)?;
        return Ok(true);
    }

    for index in (1..backups).rev() {
        let from = backup_path(path, index);
        if from.exists() {
            fs::rename(&from, backup_path(path, index + 1))?;
        }
    }
    fs::rename(path, backup_path(path, 1))?;
    Ok(true)
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `config.level`. Events go to stderr and are appended
/// to `<data_dir>/logs/gympal.log`. If a global subscriber is already set,
/// the failure is reported through that subscriber at debug level and the
/// existing one stays in place.
pub fn init(config: &LoggingConfig, data_dir: &Path) -> Result<PathBuf> {
    let path = log_path(data_dir);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let rotated = rotate_if_needed(&path, config.max_bytes, config.backups)?;

    let file: File = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init();
    if let Err(e) = installed {
        // An earlier subscriber keeps receiving events.
        tracing::debug!(error = %e, "tracing subscriber not installed");
    }

    if rotated {
        tracing::info!(path = %path.display(), "log file rotated");
    }
    Ok(path)
}

/// Last `lines` lines of the log file, or `None` if nothing was logged yet.
pub fn tail(path: &Path, lines: usize) -> Result<Option<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if content.is_empty() {
        return Ok(None);
    }

    let all: Vec<&str> = content.lines().collect();
    let start = all.len().saturating_sub(lines);
    let mut out = all[start..].join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_file_is_not_rotated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        fs::write(&path, "short\n").unwrap();
        assert!(!rotate_if_needed(&path, 1024, 2).unwrap());
        assert!(path.exists());
    }

    #[test]
    fn missing_file_is_not_rotated() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!rotate_if_needed(&dir.path().join(LOG_FILE), 0, 2).unwrap());
    }

    #[test]
    fn rotation_shifts_and_caps_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);

        for generation in ["first", "second", "third"] {
            fs::write(&path, generation).unwrap();
            assert!(rotate_if_needed(&path, 1, 2).unwrap());
        }

        assert!(!path.exists());
        assert_eq!(fs::read_to_string(backup_path(&path, 1)).unwrap(), "third");
        assert_eq!(fs::read_to_string(backup_path(&path, 2)).unwrap(), "second");
        assert!(!backup_path(&path, 3).exists());
    }

    #[test]
    fn zero_backups_drops_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        fs::write(&path, "data").unwrap();
        assert!(rotate_if_needed(&path, 1, 0).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn init_twice_keeps_working() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig::default();
        let first = init(&config, dir.path()).unwrap();
        let second = init(&config, dir.path()).unwrap();
        assert_eq!(first, second);
        assert!(first.exists());
    }

    #[test]
    fn tail_returns_last_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        fs::write(&path, "a\nb\nc\nd\n").unwrap();
        assert_eq!(tail(&path, 2).unwrap().as_deref(), Some("c\nd\n"));
        assert_eq!(tail(&path, 10).unwrap().as_deref(), Some("a\nb\nc\nd\n"));
    }

    #[test]
    fn tail_of_missing_or_empty_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        assert!(tail(&path, 5).unwrap().is_none());
        fs::write(&path, "").unwrap();
        assert!(tail(&path, 5).unwrap().is_none());
    }
}
