use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use gympal_core::export::write_csv;
use tracing::info;

use super::{CmdResult, Session};

pub fn csv(output: Option<PathBuf>) -> CmdResult {
    let session = Session::open()?;
    let rows = session.db.export_rows(session.user.id)?;

    match output {
        Some(path) => {
            write_csv(&rows, BufWriter::new(File::create(&path)?))?;
            info!(path = %path.display(), rows = rows.len(), "csv exported");
            eprintln!("Wrote {} rows to {}", rows.len(), path.display());
        }
        None => write_csv(&rows, io::stdout().lock())?,
    }
    Ok(())
}
