use super::name::GameName;

/// Structured fields read from one results screen.
///
/// `round` is only ever set together with `game`. Times keep the text
/// exactly as recognized: `play_time` is `M:SS` or `MM:SS`, while `avg_time`
/// may have any number of minute digits and a `.` separator (`1.45`, `123:45`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameResult {
    pub game: Option<GameName>,
    pub round: Option<u32>,
    pub play_time: Option<String>,
    pub avg_time: Option<String>,
}

impl GameResult {
    /// Names of the fields that are still unset, in column order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.game.is_none() {
            missing.push("game");
        }
        if self.round.is_none() {
            missing.push("round");
        }
        if self.play_time.is_none() {
            missing.push("play_time");
        }
        if self.avg_time.is_none() {
            missing.push("avg_time");
        }
        missing
    }
}
