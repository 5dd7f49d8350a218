//! CSV reader for result tables.
//!
//! Handles quoted fields (including embedded commas, quotes and line
//! breaks). Columns are looked up by header name, so extra columns or a
//! different order are fine.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;
use tracing::warn;

use super::ResultRow;
use crate::game::GameResult;

/// A CSV file as header plus string records.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_csv(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to open CSV file: {}", path.display()))?;
        Self::parse(&content).context(format!("Failed to parse CSV file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut records = parse_records(content)?.into_iter();
        let header = records.next().unwrap_or_default();
        let rows = records
            .filter(|r| !(r.len() == 1 && r[0].trim().is_empty()))
            .collect();
        Ok(Table { header, rows })
    }

    /// Index of a named column.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("Missing column '{}'", name))
    }

    /// Field of `row` at `col`, or "" when the row is short.
    pub fn field<'a>(row: &'a [String], col: usize) -> &'a str {
        row.get(col).map(String::as_str).unwrap_or("")
    }
}

/// Splits CSV text into records of unescaped fields.
pub fn parse_records(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(anyhow!("Unterminated quoted field"));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

fn optional(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Loads game result rows.
///
/// Skips blank lines and any malformed rows (with warning log).
pub fn read_results(path: &Path) -> Result<Vec<ResultRow>> {
    let table = Table::from_csv(path)?;
    let cols = [
        table.column("source_file")?,
        table.column("game")?,
        table.column("round")?,
        table.column("play_time")?,
        table.column("avg_time")?,
    ];

    let mut rows = Vec::new();
    for (idx, record) in table.rows.iter().enumerate() {
        match parse_row(record, cols) {
            Ok(row) => rows.push(row),
            Err(e) => warn!("Skipping malformed CSV row {}: {}", idx + 2, e),
        }
    }
    Ok(rows)
}

fn parse_row(record: &[String], cols: [usize; 5]) -> Result<ResultRow> {
    let [source_file, game, round, play_time, avg_time] = cols.map(|c| Table::field(record, c));

    let game = match game {
        "" => None,
        name => Some(name.parse()?),
    };
    let round = match round {
        "" => None,
        n => Some(n.parse::<u32>().context(format!("Invalid round '{}'", n))?),
    };

    Ok(ResultRow {
        source_file: source_file.to_string(),
        result: GameResult {
            game,
            round,
            play_time: optional(play_time),
            avg_time: optional(avg_time),
        },
    })
}
