use std::path::PathBuf;

use gympal_core::storage::data_dir;
use gympal_core::{logging, Config, Database};
use serde_json::json;
use tracing::error;

use super::CmdResult;

pub fn health() -> CmdResult {
    let checked = Database::open().and_then(|db| db.health_check().map_err(Into::into));

    match checked {
        Ok(()) => {
            println!("{}", json!({"status": "ok", "db": "ok"}));
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "healthz error");
            println!("{}", json!({"status": "degraded"}));
            Err(e.into())
        }
    }
}

pub fn schema(output: Option<PathBuf>) -> CmdResult {
    let db = Database::open()?;
    let sql = db.schema_sql()?;

    match output {
        Some(path) => {
            std::fs::write(&path, sql)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{sql}"),
    }
    Ok(())
}

pub fn logs() -> CmdResult {
    let config = Config::load_or_default();
    let path = logging::log_path(&data_dir()?);

    match logging::tail(&path, config.logging.tail_lines)? {
        Some(lines) => print!("{lines}"),
        None => println!("No logs yet."),
    }
    Ok(())
}
