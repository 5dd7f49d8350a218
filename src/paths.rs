//! Default locations inside the working directory's `build/` tree.

use std::path::PathBuf;

/// Returns the build directory: `./build/`
pub fn get_build_dir() -> PathBuf {
    PathBuf::from("build")
}

/// Returns the OCR output directory: `./build/ocr/`
pub fn get_ocr_dir() -> PathBuf {
    get_build_dir().join("ocr")
}

/// Returns the table directory: `./build/table/`
pub fn get_table_dir() -> PathBuf {
    get_build_dir().join("table")
}

/// Returns the exif output directory: `./build/exif/`
pub fn get_exif_dir() -> PathBuf {
    get_build_dir().join("exif")
}

/// Returns the capture-time table: `./build/exif/exif.csv`
pub fn get_exif_csv() -> PathBuf {
    get_exif_dir().join("exif.csv")
}

/// Returns the results CSV: `./build/table/game_results.csv`
pub fn get_results_csv() -> PathBuf {
    get_table_dir().join("game_results.csv")
}

/// Returns the results joined with capture times:
/// `./build/table/game_results_dated.csv`
pub fn get_dated_results_csv() -> PathBuf {
    get_table_dir().join("game_results_dated.csv")
}

/// Returns the missing-values report: `./build/table/missing_values.txt`
pub fn get_missing_values_txt() -> PathBuf {
    get_table_dir().join("missing_values.txt")
}

/// Glob for OCR responses of the photo library.
pub fn get_responses_glob() -> String {
    format!("{}/data/photos/*/response.json", get_ocr_dir().display())
}
