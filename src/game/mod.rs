//! Game-result extraction from OCR text.
//!
//! This module provides:
//! - The known-game registry and result record
//! - Fuzzy substring matching tolerant of OCR misreads
//! - The line-based result parser
//! - Manual per-image overrides

pub mod fuzzy;
pub mod name;
pub mod overrides;
pub mod parser;
pub mod result;

pub use name::GameName;
pub use overrides::Overrides;
pub use parser::{parse_game_result, parse_game_result_with, ParseReport, PlayTimePolicy};
pub use result::GameResult;
