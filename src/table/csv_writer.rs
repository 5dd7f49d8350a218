//! CSV writer for parsed game results.
//!
//! One row per processed screenshot. Unset fields are written as empty
//! strings so the file loads with nulls in dataframe tools.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::ResultRow;

/// CSV header row for game results.
pub const RESULTS_HEADER: [&str; 5] = ["source_file", "game", "round", "play_time", "avg_time"];

/// Results header plus the screenshot's capture time.
pub const DATED_RESULTS_HEADER: [&str; 6] = [
    "source_file",
    "game",
    "round",
    "play_time",
    "avg_time",
    "captured_at",
];

/// Quotes a field if it contains a delimiter, quote or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Writes one record followed by a newline.
pub fn write_record<W: Write, S: AsRef<str>>(out: &mut W, fields: &[S]) -> Result<()> {
    let line = fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(out, "{}", line).context("Failed to write CSV row")?;
    Ok(())
}

/// Creates (or truncates) `path`, creating parent directories as needed.
pub fn create_csv(path: &Path) -> Result<BufWriter<File>> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).context(format!("Failed to create {}", dir.display()))?;
    }
    let file = File::create(path).context(format!("Failed to create CSV file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn row_fields(row: &ResultRow) -> [String; 5] {
    let r = &row.result;
    [
        row.source_file.clone(),
        r.game.map(|g| g.to_string()).unwrap_or_default(),
        r.round.map(|n| n.to_string()).unwrap_or_default(),
        r.play_time.clone().unwrap_or_default(),
        r.avg_time.clone().unwrap_or_default(),
    ]
}

/// Writes all result rows, replacing any existing file.
pub fn write_results(path: &Path, rows: &[ResultRow]) -> Result<()> {
    let mut out = create_csv(path)?;
    write_record(&mut out, &RESULTS_HEADER)?;

    for row in rows {
        write_record(&mut out, &row_fields(row))?;
    }

    out.flush().context("Failed to flush CSV file")?;
    Ok(())
}

/// Writes result rows with a trailing `captured_at` column (empty if unknown).
pub fn write_dated_results(path: &Path, rows: &[(&ResultRow, Option<&str>)]) -> Result<()> {
    let mut out = create_csv(path)?;
    write_record(&mut out, &DATED_RESULTS_HEADER)?;

    for (row, captured_at) in rows {
        let mut fields = row_fields(row).to_vec();
        fields.push(captured_at.unwrap_or_default().to_string());
        write_record(&mut out, &fields)?;
    }

    out.flush().context("Failed to flush CSV file")?;
    Ok(())
}
