//! Runs OCR over a directory of screenshots, one `response.json` per image.

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

use super::client::TextReader;

/// Output file name inside each image's response directory.
pub const RESPONSE_FILE: &str = "response.json";

/// Counts from one OCR run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OcrSummary {
    pub processed: usize,
    pub skipped_existing: usize,
    pub skipped_type: usize,
    pub failed: usize,
}

/// Lists the images to process: every entry of a directory (sorted), or the
/// single file given.
pub fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_dir() {
        let mut files = Vec::new();
        for entry in fs::read_dir(path).context(format!("Failed to list {}", path.display()))? {
            files.push(entry?.path());
        }
        files.sort();
        Ok(files)
    } else if path.is_file() {
        Ok(vec![path.to_path_buf()])
    } else {
        Err(anyhow!("Invalid path: {}", path.display()))
    }
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// `<output_dir>/<image parent>/<image stem>/response.json`.
///
/// Absolute image paths are made relative to the working directory when
/// possible, otherwise their root is dropped.
pub fn response_path(output_dir: &Path, image: &Path) -> PathBuf {
    let stem = image.file_stem().unwrap_or_default();
    let parent = image.parent().unwrap_or_else(|| Path::new(""));

    let parent = match std::env::current_dir() {
        Ok(cwd) if parent.is_absolute() => parent.strip_prefix(&cwd).unwrap_or(parent),
        _ => parent,
    };
    let relative: PathBuf = parent
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();

    output_dir.join(relative).join(stem).join(RESPONSE_FILE)
}

/// OCRs every `.png` under `path`, writing pretty-printed replies.
///
/// Existing responses are kept unless `force` is set. A failed image is
/// logged and counted; the rest of the batch continues.
pub fn run_ocr<R: TextReader>(
    reader: &R,
    path: &Path,
    output_dir: &Path,
    force: bool,
) -> Result<OcrSummary> {
    let files = collect_inputs(path)?;
    let mut summary = OcrSummary::default();

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} OCR [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("##-"),
    );

    for file in &files {
        pb.inc(1);

        if !is_png(file) {
            info!("Skipping {}, unrecognized file type", file.display());
            summary.skipped_type += 1;
            continue;
        }

        let write_path = response_path(output_dir, file);
        if !force && write_path.exists() {
            info!("{} exists, skipping {}", write_path.display(), file.display());
            summary.skipped_existing += 1;
            continue;
        }

        pb.set_message(file.display().to_string());
        match ocr_one(reader, file, &write_path) {
            Ok(()) => {
                info!("Processed {}", file.display());
                summary.processed += 1;
            }
            Err(e) => {
                warn!("OCR failed for {}: {:#}", file.display(), e);
                summary.failed += 1;
            }
        }
    }

    pb.finish_with_message("OCR complete");
    Ok(summary)
}

fn ocr_one<R: TextReader>(reader: &R, image: &Path, write_path: &Path) -> Result<()> {
    let reply = reader.read_text(image)?;

    if let Some(dir) = write_path.parent() {
        fs::create_dir_all(dir).context(format!("Failed to create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(&reply).context("Failed to serialize OCR reply")?;
    fs::write(write_path, json).context(format!("Failed to write {}", write_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use tempfile::tempdir;

    struct FakeReader {
        calls: RefCell<Vec<PathBuf>>,
        fail_on: Option<&'static str>,
    }

    impl FakeReader {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_on: None,
            }
        }
    }

    impl TextReader for FakeReader {
        fn read_text(&self, image_path: &Path) -> Result<Value> {
            self.calls.borrow_mut().push(image_path.to_path_buf());
            if self
                .fail_on
                .is_some_and(|name| image_path.ends_with(name))
            {
                return Err(anyhow!("model unavailable"));
            }
            Ok(json!({"message": {"role": "assistant", "content": "Tango #1\n0:42"}}))
        }
    }

    #[test]
    fn test_response_path_relative() {
        let path = response_path(Path::new("build/ocr"), Path::new("data/photos/IMG_1207.png"));
        assert_eq!(path, PathBuf::from("build/ocr/data/photos/IMG_1207/response.json"));
    }

    #[test]
    fn test_response_path_drops_dot_components() {
        let path = response_path(Path::new("out"), Path::new("./IMG_1.PNG"));
        assert_eq!(path, PathBuf::from("out/IMG_1/response.json"));
    }

    #[test]
    fn test_invalid_path_is_error() {
        let dir = tempdir().unwrap();
        assert!(collect_inputs(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_run_ocr_writes_skips_and_counts() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(input.path().join("IMG_2.png"), b"png").unwrap();
        fs::write(input.path().join("IMG_1.PNG"), b"png").unwrap();
        fs::write(input.path().join("notes.txt"), b"txt").unwrap();

        let reader = FakeReader::new();
        let summary = run_ocr(&reader, input.path(), output.path(), false).unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.skipped_type, 1);
        let calls = reader.calls.borrow();
        assert!(calls[0].ends_with("IMG_1.PNG"));
        assert!(calls[1].ends_with("IMG_2.png"));

        let written = response_path(output.path(), &input.path().join("IMG_2.png"));
        let content = fs::read_to_string(written).unwrap();
        assert!(content.contains("Tango #1"));
    }

    #[test]
    fn test_run_ocr_respects_existing_unless_forced() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let image = input.path().join("IMG_3.png");
        fs::write(&image, b"png").unwrap();

        let reader = FakeReader::new();
        run_ocr(&reader, &image, output.path(), false).unwrap();
        let second = run_ocr(&reader, &image, output.path(), false).unwrap();
        assert_eq!(second.skipped_existing, 1);
        assert_eq!(second.processed, 0);

        let forced = run_ocr(&reader, &image, output.path(), true).unwrap();
        assert_eq!(forced.processed, 1);
        assert_eq!(reader.calls.borrow().len(), 2);
    }

    #[test]
    fn test_run_ocr_continues_after_failure() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(input.path().join("IMG_4.png"), b"png").unwrap();
        fs::write(input.path().join("IMG_5.png"), b"png").unwrap();

        let reader = FakeReader {
            calls: RefCell::new(Vec::new()),
            fail_on: Some("IMG_4.png"),
        };
        let summary = run_ocr(&reader, input.path(), output.path(), false).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.processed, 1);
    }
}
