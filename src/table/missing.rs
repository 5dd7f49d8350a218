//! Per-column listing of screenshots whose fields could not be parsed.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::csv_reader::Table;

const COLUMNS: [&str; 4] = ["game", "round", "play_time", "avg_time"];

/// Builds the report: for each column a `<col>: <n> missing` heading, then
/// the affected source files, sorted.
///
/// Works on the raw table so rows with unparsable values are still listed.
/// A field counts as missing when it is empty.
pub fn missing_values_report(table: &Table) -> Result<String> {
    let source_col = table.column("source_file")?;
    let mut sorted: Vec<&Vec<String>> = table.rows.iter().collect();
    sorted.sort_by(|a, b| Table::field(a, source_col).cmp(Table::field(b, source_col)));

    let mut output: Vec<String> = Vec::new();
    for col in COLUMNS {
        let idx = table.column(col)?;
        let missing: Vec<&str> = sorted
            .iter()
            .filter(|row| Table::field(row, idx).is_empty())
            .map(|row| Table::field(row, source_col))
            .collect();

        output.push(format!("{}: {} missing", col, missing.len()));
        output.push(String::new());
        for file in missing {
            output.push(format!("  {}", file));
        }
        output.push(String::new());
    }

    Ok(output.join("\n"))
}

/// Reads the results table, prints the report and saves it to `output_path`.
pub fn write_missing_values(results_csv: &Path, output_path: &Path) -> Result<String> {
    let table = Table::from_csv(results_csv)?;
    let content = missing_values_report(&table)?;
    println!("{}", content);

    if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).context(format!("Failed to create {}", dir.display()))?;
    }
    fs::write(output_path, &content)
        .context(format!("Failed to write {}", output_path.display()))?;
    Ok(content)
}
