//! Rule-based extraction of game results from OCR text lines.
//!
//! The OCR model emits the results screen top-to-bottom, but which lines are
//! present (clock, banner, streaks, "Best score", averages) varies between
//! phones and app versions. Fields are located with three independent passes:
//!
//! 1. `<name> #<round>` line, with the name fuzzy-matched against the registry
//! 2. average time ("Today's avg: 1:52", "avg. 1.52", ...)
//! 3. play time: a line that is nothing but a time, picked relative to anchors
//!
//! Nothing here fails. A field that can't be located confidently stays unset
//! and a warning is recorded.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::warn;

use super::fuzzy::contains_near;
use super::name::{ExcludedGame, GameName};
use super::result::GameResult;

/// `<word or two> #<digits>`, e.g. "Tango #482" or "Mini Sudoku #12".
const GAME_ROUND_PATTERN: &str = r"([A-Za-z]+(?:\s+\w+)?)\s*#(\d+)";

/// "Today's avg: 1:45", "Todays avg. 1:45", "av 1.45", "avg: 1:45".
/// Accepts both ASCII and typographic apostrophes.
const AVG_TIME_PATTERN: &str =
    r"(?:(?:Today['\x{2019}]s?|Todays?)\s+\w*\.?\s*|\bav\w*\.?)\s*:?\s*(\d+[:.]\d{2})";

/// A whole (trimmed) line that is only a time.
const TIME_PATTERN: &str = r"^(\d{1,2}:\d{2})$";

/// Maximum edit distance for fuzzy name and anchor matching.
pub const MAX_FUZZY_DIST: usize = 1;

const SOLVE_ANCHOR: &str = "Solve";
const BEST_ANCHOR: &str = "Best";

static GAME_ROUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(GAME_ROUND_PATTERN).expect("game/round pattern is valid"));
static AVG_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(AVG_TIME_PATTERN).expect("avg time pattern is valid"));
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TIME_PATTERN).expect("time pattern is valid"));

/// How the play time is chosen among standalone time lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayTimePolicy {
    /// Last time line before the avg-time line, else before "Solve",
    /// else (carefully) around "Best", else the last one.
    #[default]
    Anchored,
    /// First time line that isn't the avg-time line; warns if there are several.
    Unanchored,
}

/// Diagnostics produced while parsing. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A `#<round>` line whose name matched no known game.
    UnmatchedGameName { ocr_name: String },
    /// A `#<round>` line naming a game that isn't collected.
    ExcludedGameName { ocr_name: String, game: ExcludedGame },
    /// A known game with a round number that doesn't fit.
    InvalidRound { line: String },
    NoGameName,
    NoAverageTime,
    /// A time appears before "Best" with nothing else to anchor it.
    TimeBeforeBestUnanchored,
    AmbiguousPlayTime { candidates: Vec<String> },
    NoPlayTime,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::UnmatchedGameName { ocr_name } => write!(
                f,
                "Found game name '{}' but fuzzy match failed (max_l_dist={})",
                ocr_name, MAX_FUZZY_DIST
            ),
            ParseWarning::ExcludedGameName { ocr_name, game } => {
                write!(f, "Found game name '{}' but {} is excluded", ocr_name, game)
            }
            ParseWarning::InvalidRound { line } => {
                write!(f, "Round number out of range in '{}'", line)
            }
            ParseWarning::NoGameName => f.write_str("No game name found in any line"),
            ParseWarning::NoAverageTime => {
                f.write_str("No average time found (this may be normal for some screens)")
            }
            ParseWarning::TimeBeforeBestUnanchored => f.write_str(
                "Found time before 'Best' but no avg_time or 'Solve' line to anchor to",
            ),
            ParseWarning::AmbiguousPlayTime { candidates } => write!(
                f,
                "Multiple play time candidates {:?}, using the first",
                candidates
            ),
            ParseWarning::NoPlayTime => f.write_str("No play time found"),
        }
    }
}

/// Parse outcome together with every warning emitted on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub result: GameResult,
    pub warnings: Vec<ParseWarning>,
    /// Line the game and round were read from.
    pub game_line: Option<usize>,
    /// Line where the average-time match starts.
    pub avg_time_line: Option<usize>,
    /// Line holding the average-time value itself. Differs from
    /// `avg_time_line` when the label and the time are split over two lines.
    pub avg_value_line: Option<usize>,
}

impl ParseReport {
    fn warn(&mut self, warning: ParseWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// Returns the first registry game found in `text` within `MAX_FUZZY_DIST`.
pub fn fuzzy_match_game(text: &str) -> Option<GameName> {
    GameName::ALL
        .into_iter()
        .find(|game| contains_near(game.as_str(), text, MAX_FUZZY_DIST))
}

fn fuzzy_match_excluded(text: &str) -> Option<ExcludedGame> {
    ExcludedGame::ALL
        .into_iter()
        .find(|game| contains_near(game.as_str(), text, MAX_FUZZY_DIST))
}

/// Parses one screen's OCR lines using the default play-time policy.
pub fn parse_game_result<S: AsRef<str>>(lines: &[S]) -> GameResult {
    parse_game_result_with(lines, PlayTimePolicy::default()).result
}

/// Parses one screen's OCR lines, returning the result and its diagnostics.
pub fn parse_game_result_with<S: AsRef<str>>(lines: &[S], policy: PlayTimePolicy) -> ParseReport {
    let lines: Vec<&str> = lines.iter().map(|line| line.as_ref()).collect();
    let mut report = ParseReport::default();

    report.game_line = find_game_and_round(&lines, &mut report);
    find_avg_time(&lines, &mut report);
    let avg_time_line_idx = report.avg_time_line;
    let avg_value_line_idx = report.avg_value_line;

    let play_time = match policy {
        PlayTimePolicy::Anchored => anchored_play_time(&lines, avg_time_line_idx, &mut report),
        PlayTimePolicy::Unanchored => {
            unanchored_play_time(&lines, avg_value_line_idx, &mut report)
        }
    };

    match play_time {
        Some(time) => report.result.play_time = Some(time),
        None => report.warn(ParseWarning::NoPlayTime),
    }

    report
}

/// First line with a `#<round>` whose text fuzzy-matches a known game wins.
fn find_game_and_round(lines: &[&str], report: &mut ParseReport) -> Option<usize> {
    for (idx, line) in lines.iter().enumerate() {
        let Some(caps) = GAME_ROUND_RE.captures(line) else {
            continue;
        };
        let ocr_name = caps[1].to_string();

        let Some(game) = fuzzy_match_game(line) else {
            let warning = match fuzzy_match_excluded(line) {
                Some(game) => ParseWarning::ExcludedGameName { ocr_name, game },
                None => ParseWarning::UnmatchedGameName { ocr_name },
            };
            report.warn(warning);
            continue;
        };

        match caps[2].parse::<u32>() {
            Ok(round) => {
                report.result.game = Some(game);
                report.result.round = Some(round);
                return Some(idx);
            }
            Err(_) => report.warn(ParseWarning::InvalidRound {
                line: line.to_string(),
            }),
        }
    }

    report.warn(ParseWarning::NoGameName);
    None
}

/// Searches the joined text so that "Today's avg" and its time may sit on
/// adjacent lines. Records the line where the match starts and the line
/// holding the time value.
fn find_avg_time(lines: &[&str], report: &mut ParseReport) {
    let text = lines.join("\n");
    let Some(caps) = AVG_TIME_RE.captures(&text) else {
        report.warn(ParseWarning::NoAverageTime);
        return;
    };

    let (Some(whole), Some(time)) = (caps.get(0), caps.get(1)) else {
        report.warn(ParseWarning::NoAverageTime);
        return;
    };
    report.result.avg_time = Some(time.as_str().to_string());
    report.avg_time_line = line_index_at(lines, whole.start());
    report.avg_value_line = line_index_at(lines, time.start());
}

/// Maps a byte offset in `lines.join("\n")` back to its line index.
fn line_index_at(lines: &[&str], offset: usize) -> Option<usize> {
    let mut line_start = 0;
    for (idx, line) in lines.iter().enumerate() {
        let line_end = line_start + line.len() + 1;
        if (line_start..line_end).contains(&offset) {
            return Some(idx);
        }
        line_start = line_end;
    }
    None
}

/// Lines that are only a time, as `(index, trimmed text)` in reading order.
fn standalone_times(lines: &[&str]) -> Vec<(usize, String)> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            let trimmed = line.trim();
            TIME_RE
                .is_match(trimmed)
                .then(|| (idx, trimmed.to_string()))
        })
        .collect()
}

fn last_anchor_line(lines: &[&str], anchor: &str) -> Option<usize> {
    lines
        .iter()
        .rposition(|line| contains_near(anchor, line, MAX_FUZZY_DIST))
}

fn last_time_before(times: &[(usize, String)], limit: usize) -> Option<String> {
    times
        .iter()
        .rev()
        .find(|(idx, _)| *idx < limit)
        .map(|(_, time)| time.clone())
}

fn anchored_play_time(
    lines: &[&str],
    avg_time_line_idx: Option<usize>,
    report: &mut ParseReport,
) -> Option<String> {
    let times = standalone_times(lines);
    // An anchor on the very first line has nothing above it to point at.
    let solve_line_idx = last_anchor_line(lines, SOLVE_ANCHOR).filter(|&idx| idx > 0);
    let best_line_idx = last_anchor_line(lines, BEST_ANCHOR).filter(|&idx| idx > 0);

    // Android screenshots put the clock above the avg line, iPhone ones
    // show "Solve time" below the time instead.
    if let Some(avg_idx) = avg_time_line_idx.filter(|&idx| idx > 0) {
        last_time_before(&times, avg_idx)
    } else if let Some(solve_idx) = solve_line_idx {
        last_time_before(&times, solve_idx)
    } else if let Some(best_idx) = best_line_idx {
        if times.iter().any(|(idx, _)| *idx < best_idx) {
            report.warn(ParseWarning::TimeBeforeBestUnanchored);
            None
        } else {
            times.last().map(|(_, time)| time.clone())
        }
    } else {
        times.last().map(|(_, time)| time.clone())
    }
}

fn unanchored_play_time(
    lines: &[&str],
    avg_value_line_idx: Option<usize>,
    report: &mut ParseReport,
) -> Option<String> {
    let candidates: Vec<String> = standalone_times(lines)
        .into_iter()
        .filter(|(idx, _)| Some(*idx) != avg_value_line_idx)
        .map(|(_, time)| time)
        .collect();

    if candidates.len() > 1 {
        report.warn(ParseWarning::AmbiguousPlayTime {
            candidates: candidates.clone(),
        });
    }

    candidates.into_iter().next()
}
