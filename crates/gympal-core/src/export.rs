//! CSV export of logged sets.

use std::io::Write;

use crate::error::Result;
use crate::storage::ExportRow;

/// Column header of the export file.
pub const CSV_HEADER: [&str; 5] = ["date", "exercise", "reps", "weight", "notes"];

/// Suggested file name for downloads.
pub const EXPORT_FILE_NAME: &str = "gympal_export.csv";

/// Write `rows` as CSV with a header line.
///
/// Missing weights and notes are written as empty fields.
///
/// # Errors
/// Returns an error if writing to `writer` fails.
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for row in rows {
        let weight = row.weight.map(|w| w.to_string()).unwrap_or_default();
        wtr.write_record([
            row.date.to_string(),
            row.exercise.clone(),
            row.reps.to_string(),
            weight,
            row.notes.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
