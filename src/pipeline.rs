//! Batch parse: OCR responses → results table.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::exif::read_capture_times;
use crate::game::{parse_game_result_with, GameResult, Overrides, PlayTimePolicy};
use crate::ocr::OcrResponse;
use crate::table::{write_dated_results, write_results, ResultRow};

/// Unset-field counts across a batch, after overrides.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldFailures {
    pub game: usize,
    pub round: usize,
    pub play_time: usize,
    pub avg_time: usize,
}

impl FieldFailures {
    fn record(&mut self, result: &GameResult) {
        self.game += usize::from(result.game.is_none());
        self.round += usize::from(result.round.is_none());
        self.play_time += usize::from(result.play_time.is_none());
        self.avg_time += usize::from(result.avg_time.is_none());
    }

    pub fn as_pairs(&self) -> [(&'static str, usize); 4] {
        [
            ("game", self.game),
            ("round", self.round),
            ("play_time", self.play_time),
            ("avg_time", self.avg_time),
        ]
    }
}

#[derive(Debug, Default, Clone)]
pub struct BatchSummary {
    /// Response files found
    pub files: usize,
    /// Files skipped because they were unreadable or had no text
    pub skipped: usize,
    pub rows: Vec<ResultRow>,
    pub failures: FieldFailures,
}

/// Image identifier for a response: its parent directory name
/// (`.../IMG_1207/response.json` → `IMG_1207`).
pub fn image_id(response_path: &Path) -> Option<&str> {
    response_path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
}

/// Parses every response file in order. Bad files are skipped with a warning.
pub fn parse_response_files(
    files: &[PathBuf],
    policy: PlayTimePolicy,
    overrides: &Overrides,
) -> BatchSummary {
    let mut summary = BatchSummary {
        files: files.len(),
        ..Default::default()
    };

    for path in files {
        let response = match OcrResponse::from_file(path) {
            Ok(response) => response,
            Err(e) => {
                warn!("Skipping {}: {:#}", path.display(), e);
                summary.skipped += 1;
                continue;
            }
        };
        if response.is_empty() {
            warn!("No message.content in {}", path.display());
            summary.skipped += 1;
            continue;
        }

        let mut result = parse_game_result_with(&response.lines(), policy).result;
        if let Some(id) = image_id(path) {
            let applied = overrides.apply(id, &mut result);
            if applied > 0 {
                info!("Applied {} override(s) for {}", applied, id);
            }
        }

        summary.failures.record(&result);
        summary.rows.push(ResultRow {
            source_file: path.display().to_string(),
            result,
        });
    }

    summary
}

/// Finds responses matching `pattern`, sorted.
pub fn find_responses(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob::glob(pattern).context(format!("Invalid glob pattern: {}", pattern))? {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => warn!("Unreadable path while globbing: {}", e),
        }
    }
    files.sort();
    Ok(files)
}

/// Parses all configured responses, writes the results table and prints a
/// per-field failure summary.
pub fn parse_responses(config: &PipelineConfig) -> Result<BatchSummary> {
    let files = find_responses(&config.responses_glob)?;
    if files.is_empty() {
        println!("No files found matching pattern: {}", config.responses_glob);
        return Ok(BatchSummary::default());
    }

    let overrides = config.effective_overrides();
    let summary = parse_response_files(&files, config.play_time_policy, &overrides);
    write_results(&config.results_csv, &summary.rows)?;

    println!("\nProcessed {} files", summary.files);
    println!(
        "Wrote {} records to {}",
        summary.rows.len(),
        config.results_csv.display()
    );
    println!("Failures per field:");
    for (field, count) in summary.failures.as_pairs() {
        println!("  {}: {}", field, count);
    }

    if config.exif_csv.exists() {
        let dated = join_capture_times(&config.exif_csv, &config.dated_results_csv, &summary.rows)?;
        println!(
            "Wrote {} records to {} ({} without capture time)",
            summary.rows.len(),
            config.dated_results_csv.display(),
            summary.rows.len() - dated
        );
    } else {
        info!(
            "No {} found, skipping capture-time join",
            config.exif_csv.display()
        );
    }

    Ok(summary)
}

/// Writes `rows` with the capture time of their screenshot, matched on image
/// id. Returns how many rows found a capture time.
pub fn join_capture_times(exif_csv: &Path, output: &Path, rows: &[ResultRow]) -> Result<usize> {
    let times = read_capture_times(exif_csv)?;
    let dated: Vec<(&ResultRow, Option<&str>)> = rows
        .iter()
        .map(|row| {
            let captured_at = image_id(Path::new(&row.source_file))
                .and_then(|id| times.get(id))
                .map(String::as_str);
            if captured_at.is_none() {
                warn!("No capture time for {}", row.source_file);
            }
            (row, captured_at)
        })
        .collect();

    write_dated_results(output, &dated)?;
    Ok(dated.iter().filter(|(_, t)| t.is_some()).count())
}
