//! Screenshot → OCR → table pipeline for LinkedIn puzzle results.

pub mod config;
pub mod exif;
pub mod game;
pub mod ocr;
pub mod paths;
pub mod pipeline;
pub mod table;
