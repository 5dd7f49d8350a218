//! Before/after comparison of two result tables.
//!
//! Used as a golden test when the parser changes: rows are keyed on
//! `(game, round, play_time)` and any changed `avg_time` is reported.

use anyhow::Result;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use std::path::Path;

use super::csv_reader::Table;

/// `(game, round, play_time)` exactly as written in the file.
pub type RowKey = (String, String, String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvgTimeChange {
    pub key: RowKey,
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    pub before_total: usize,
    pub after_total: usize,
    pub common_keys: usize,
    /// Sorted by key.
    pub changes: Vec<AvgTimeChange>,
}

impl Comparison {
    pub fn passed(&self) -> bool {
        self.changes.is_empty()
    }

    /// Human-readable report as printed by the `compare` command.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Total records before: {}", self.before_total);
        let _ = writeln!(out, "Total records after: {}", self.after_total);
        let _ = writeln!(out, "Common keys: {}", self.common_keys);
        let _ = writeln!(out, "Changed avg_time values: {}", self.changes.len());

        if self.passed() {
            let _ = writeln!(
                out,
                "\nNo changes to previously parsed avg_time values - golden test PASSED"
            );
        } else {
            let _ = writeln!(out, "\nChanges:");
            for change in &self.changes {
                let (game, round, play_time) = &change.key;
                let _ = writeln!(
                    out,
                    "  ({}, {}, {}): '{}' -> '{}'",
                    game, round, play_time, change.before, change.after
                );
            }
        }
        out
    }
}

/// Maps each key to its `avg_time`. Later duplicates replace earlier ones.
pub fn avg_times_by_key(table: &Table) -> Result<HashMap<RowKey, String>> {
    let game = table.column("game")?;
    let round = table.column("round")?;
    let play_time = table.column("play_time")?;
    let avg_time = table.column("avg_time")?;

    Ok(table
        .rows
        .iter()
        .map(|row| {
            let key = (
                Table::field(row, game).to_string(),
                Table::field(row, round).to_string(),
                Table::field(row, play_time).to_string(),
            );
            (key, Table::field(row, avg_time).to_string())
        })
        .collect())
}

pub fn compare_tables(before: &Table, after: &Table) -> Result<Comparison> {
    let before = avg_times_by_key(before)?;
    let after = avg_times_by_key(after)?;

    let common: BTreeMap<&RowKey, (&String, &String)> = before
        .iter()
        .filter_map(|(key, b)| after.get(key).map(|a| (key, (b, a))))
        .collect();

    let changes = common
        .iter()
        .filter(|(_, (b, a))| b != a)
        .map(|(key, (b, a))| AvgTimeChange {
            key: (*key).clone(),
            before: (*b).clone(),
            after: (*a).clone(),
        })
        .collect();

    Ok(Comparison {
        before_total: before.len(),
        after_total: after.len(),
        common_keys: common.len(),
        changes,
    })
}

/// Loads both files and compares them.
pub fn compare_results(before_path: &Path, after_path: &Path) -> Result<Comparison> {
    let before = Table::from_csv(before_path)?;
    let after = Table::from_csv(after_path)?;
    compare_tables(&before, &after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const BEFORE: &str = "source_file,game,round,play_time,avg_time
a.json,Tango,1,0:40,1:00
b.json,Queens,2,0:50,
c.json,Queens,3,1:10,1:20
";

    #[test]
    fn test_identical_files_report_no_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let copy = dir.path().join("copy.csv");
        fs::write(&path, BEFORE).unwrap();
        fs::copy(&path, &copy).unwrap();

        let comparison = compare_results(&path, &copy).unwrap();
        assert!(comparison.passed());
        assert_eq!(comparison.common_keys, 3);
        assert!(comparison.render().contains("golden test PASSED"));
    }

    #[test]
    fn test_changed_avg_time_reported() {
        let after = "source_file,game,round,play_time,avg_time
a.json,Tango,1,0:40,1:05
b.json,Queens,2,0:50,0:55
d.json,Tango,4,0:30,0:45
";
        let before = Table::parse(BEFORE).unwrap();
        let after = Table::parse(after).unwrap();
        let comparison = compare_tables(&before, &after).unwrap();

        assert_eq!(comparison.before_total, 3);
        assert_eq!(comparison.after_total, 3);
        assert_eq!(comparison.common_keys, 2);
        assert_eq!(comparison.changes.len(), 2);
        assert_eq!(
            comparison.changes[0],
            AvgTimeChange {
                key: ("Queens".to_string(), "2".to_string(), "0:50".to_string()),
                before: String::new(),
                after: "0:55".to_string(),
            }
        );
        let report = comparison.render();
        assert!(report.contains("  (Tango, 1, 0:40): '1:00' -> '1:05'"));
        assert!(!report.contains("PASSED"));
    }

    #[test]
    fn test_duplicate_keys_keep_last() {
        let table = Table::parse(
            "source_file,game,round,play_time,avg_time
a.json,Tango,1,0:40,1:00
b.json,Tango,1,0:40,1:30
",
        )
        .unwrap();
        let map = avg_times_by_key(&table).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(
            map[&("Tango".to_string(), "1".to_string(), "0:40".to_string())],
            "1:30"
        );
    }
}
