//! Tabular output of parsed results.
//!
//! This module provides:
//! - CSV writing and reading of result rows
//! - Missing-value reporting per column
//! - Before/after comparison of two result files

pub mod compare;
pub mod csv_reader;
pub mod csv_writer;
pub mod missing;

pub use compare::{compare_results, Comparison};
pub use csv_reader::read_results;
pub use csv_writer::{write_dated_results, write_results};
pub use missing::write_missing_values;

use crate::game::GameResult;

/// One screenshot's parsed result, with the response file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub source_file: String,
    pub result: GameResult,
}
