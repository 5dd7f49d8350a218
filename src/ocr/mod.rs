//! OCR of results screenshots through a hosted vision model.

pub mod batch;
pub mod client;
pub mod response;

pub use batch::{run_ocr, OcrSummary, RESPONSE_FILE};
pub use client::{OllamaClient, TextReader};
pub use response::OcrResponse;
