//! Capture timestamps read with the `exiftool` binary.
//!
//! Screenshots carry `EXIF:DateTimeOriginal` on most phones; some only have
//! an XMP `DateCreated`. Both are collected and the first usable one becomes
//! the capture time.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

use crate::table::csv_reader::Table;
use crate::table::csv_writer::{create_csv, write_record};

pub const EXIF_CSV: &str = "exif.csv";
const EXIF_HEADER: [&str; 4] = ["source_file", "date_time_original", "xmp_date_created", "captured_at"];

/// Timestamp fields for one image as reported by exiftool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMetadata {
    pub source_file: String,
    pub date_time_original: Option<String>,
    pub xmp_date_created: Option<String>,
}

impl ImageMetadata {
    fn from_json(entry: &HashMap<String, Value>) -> Self {
        let text = |key: &str| -> Option<String> {
            match entry.get(key)? {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Null | Value::String(_) => None,
                other => Some(other.to_string()),
            }
        };
        Self {
            source_file: text("SourceFile").unwrap_or_default(),
            date_time_original: text("EXIF:DateTimeOriginal"),
            xmp_date_created: text("XMP:DateCreated"),
        }
    }

    /// `DateTimeOriginal`, falling back to XMP `DateCreated`.
    pub fn captured_at(&self) -> Option<NaiveDateTime> {
        self.date_time_original
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.xmp_date_created.as_deref().and_then(parse_timestamp))
    }
}

/// Parses exiftool's `YYYY:mm:dd HH:MM:SS` or ISO 8601, ignoring any
/// fractional seconds or zone suffix.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let head = value.trim().get(..19)?;
    ["%Y:%m:%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(head, fmt).ok())
}

/// Parses `exiftool -json -G` output.
pub fn parse_exiftool_json(json: &str) -> Result<Vec<ImageMetadata>> {
    let entries: Vec<HashMap<String, Value>> =
        serde_json::from_str(json).context("Failed to parse exiftool output")?;
    Ok(entries.iter().map(ImageMetadata::from_json).collect())
}

/// Runs exiftool once over all `paths`.
pub fn read_metadata(exiftool: &str, paths: &[PathBuf]) -> Result<Vec<ImageMetadata>> {
    if paths.is_empty() {
        return Ok(Vec::new());
    }

    let output = Command::new(exiftool)
        .arg("-json")
        .arg("-G")
        .args(paths)
        .output()
        .context(format!("Failed to run {}", exiftool))?;

    // exiftool exits non-zero if any single file is unreadable, yet still
    // reports the rest on stdout.
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if output.stdout.is_empty() {
            return Err(anyhow!("exiftool failed: {}", stderr));
        }
        warn!("exiftool reported errors: {}", stderr.trim());
    }

    parse_exiftool_json(&String::from_utf8_lossy(&output.stdout))
}

/// Writes `<output_dir>/exif.csv` for every file in `read_dir`.
pub fn run_exif(exiftool: &str, read_dir: &Path, output_dir: &Path) -> Result<PathBuf> {
    let mut files = Vec::new();
    for entry in fs::read_dir(read_dir).context(format!("Failed to list {}", read_dir.display()))? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    info!("Reading metadata for {} files", files.len());

    let metadata = read_metadata(exiftool, &files)?;
    let csv_path = output_dir.join(EXIF_CSV);
    write_exif_csv(&csv_path, &metadata)?;
    Ok(csv_path)
}

pub fn write_exif_csv(path: &Path, metadata: &[ImageMetadata]) -> Result<()> {
    let mut out = create_csv(path)?;
    write_record(&mut out, &EXIF_HEADER)?;

    for item in metadata {
        if item.captured_at().is_none() {
            warn!("No capture time for {}", item.source_file);
        }
        let fields = [
            item.source_file.clone(),
            item.date_time_original.clone().unwrap_or_default(),
            item.xmp_date_created.clone().unwrap_or_default(),
            item.captured_at()
                .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string())
                .unwrap_or_default(),
        ];
        write_record(&mut out, &fields)?;
    }

    out.flush().context("Failed to flush exif CSV")?;
    Ok(())
}

/// Loads `captured_at` from an `exif.csv`, keyed by image file stem
/// (`data/photos/IMG_1207.png` → `IMG_1207`). Images without a capture time
/// are left out.
pub fn read_capture_times(path: &Path) -> Result<HashMap<String, String>> {
    let table = Table::from_csv(path)?;
    let source_col = table.column("source_file")?;
    let captured_col = table.column("captured_at")?;

    let mut times = HashMap::new();
    for row in &table.rows {
        let captured_at = Table::field(row, captured_col);
        if captured_at.is_empty() {
            continue;
        }
        if let Some(stem) = Path::new(Table::field(row, source_col))
            .file_stem()
            .and_then(|s| s.to_str())
        {
            times.insert(stem.to_string(), captured_at.to_string());
        }
    }
    Ok(times)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    const EXIFTOOL_OUTPUT: &str = r#"[{
        "SourceFile": "data/photos/IMG_1207.png",
        "File:FileType": "PNG",
        "EXIF:DateTimeOriginal": "2025:03:14 09:26:53"
    },
    {
        "SourceFile": "data/photos/IMG_2181.png",
        "XMP:DateCreated": "2025:06:01 21:04:10.123+02:00"
    },
    {
        "SourceFile": "data/photos/IMG_3000.png",
        "EXIF:DateTimeOriginal": "    :  :     :  :  "
    }]"#;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap();
        assert_eq!(parse_timestamp("2025:03:14 09:26:53"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-14T09:26:53.5-05:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-14"), None);
        assert_eq!(parse_timestamp("garbage"), None);
    }

    #[test]
    fn test_parse_exiftool_json() {
        let items = parse_exiftool_json(EXIFTOOL_OUTPUT).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].source_file, "data/photos/IMG_1207.png");
        assert!(items[0].captured_at().is_some());
        // falls back to XMP
        assert_eq!(items[1].date_time_original, None);
        assert_eq!(
            items[1].captured_at().map(|t| t.to_string()),
            Some("2025-06-01 21:04:10".to_string())
        );
        assert_eq!(items[2].captured_at(), None);
    }

    #[test]
    fn test_write_exif_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("exif").join(EXIF_CSV);
        let items = parse_exiftool_json(EXIFTOOL_OUTPUT).unwrap();

        write_exif_csv(&path, &items).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "source_file,date_time_original,xmp_date_created,captured_at");
        assert_eq!(
            lines[1],
            "data/photos/IMG_1207.png,2025:03:14 09:26:53,,2025-03-14T09:26:53"
        );
        assert!(lines[3].ends_with(','));
    }

    #[test]
    fn test_read_metadata_no_files() {
        assert!(read_metadata("exiftool", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_read_capture_times_by_stem() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(EXIF_CSV);
        write_exif_csv(&path, &parse_exiftool_json(EXIFTOOL_OUTPUT).unwrap()).unwrap();

        let times = read_capture_times(&path).unwrap();
        assert_eq!(times.len(), 2);
        assert_eq!(times["IMG_1207"], "2025-03-14T09:26:53");
        assert_eq!(times["IMG_2181"], "2025-06-01T21:04:10");
        assert!(!times.contains_key("IMG_3000"));
    }
}
