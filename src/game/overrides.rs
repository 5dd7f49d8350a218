//! Manual corrections for screenshots the parser can't resolve.
//!
//! Keyed by image identifier, the file stem of the screenshot (e.g. `IMG_2181`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use super::name::GameName;
use super::result::GameResult;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    pub game: BTreeMap<String, GameName>,
    pub avg_time: BTreeMap<String, String>,
    pub play_time: BTreeMap<String, String>,
}

impl Default for Overrides {
    fn default() -> Self {
        let game = [
            // Name missing from the screen, inferred from the board colour
            ("IMG_2181", GameName::Tango),
            ("IMG_2182", GameName::Queens),
            ("IMG_2183", GameName::Tango),
            ("IMG_2184", GameName::Queens),
            // Results screen never loaded, only the solved board
            ("IMG_1585", GameName::Tango),
        ];
        let avg_time = [("IMG_1207", "1:55")];
        let play_time = [("IMG_1207", "1:12"), ("IMG_1832", "1:16")];

        Self {
            game: game.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            avg_time: avg_time
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            play_time: play_time
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Overrides {
    /// Adds `other`'s entries on top of these, replacing on key collisions.
    pub fn extend(&mut self, other: Overrides) {
        self.game.extend(other.game);
        self.avg_time.extend(other.avg_time);
        self.play_time.extend(other.play_time);
    }

    /// Applies every override registered for `image_id`.
    ///
    /// Overrides always win. Returns the number of fields that were set.
    pub fn apply(&self, image_id: &str, result: &mut GameResult) -> usize {
        let mut applied = 0;

        if let Some(&game) = self.game.get(image_id) {
            if result.game.is_some_and(|parsed| parsed != game) {
                info!("{}: overriding parsed game {:?} with {}", image_id, result.game, game);
            }
            result.game = Some(game);
            applied += 1;
        }
        if let Some(avg_time) = self.avg_time.get(image_id) {
            if result.avg_time.as_ref().is_some_and(|parsed| parsed != avg_time) {
                info!("{}: overriding parsed avg_time {:?} with {}", image_id, result.avg_time, avg_time);
            }
            result.avg_time = Some(avg_time.clone());
            applied += 1;
        }
        if let Some(play_time) = self.play_time.get(image_id) {
            if result.play_time.as_ref().is_some_and(|parsed| parsed != play_time) {
                info!("{}: overriding parsed play_time {:?} with {}", image_id, result.play_time, play_time);
            }
            result.play_time = Some(play_time.clone());
            applied += 1;
        }

        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_overrides_fill_missing_game() {
        let overrides = Overrides::default();
        let mut result = GameResult::default();

        assert_eq!(overrides.apply("IMG_2182", &mut result), 1);
        assert_eq!(result.game, Some(GameName::Queens));
        // round is never overridden; it has to be interpolated from neighbours
        assert_eq!(result.round, None);
    }

    #[test]
    fn test_override_replaces_parsed_value() {
        let overrides = Overrides::default();
        let mut result = GameResult {
            game: Some(GameName::Tango),
            round: Some(101),
            play_time: Some("7:12".to_string()),
            avg_time: Some("1:00".to_string()),
        };

        assert_eq!(overrides.apply("IMG_1207", &mut result), 2);
        assert_eq!(result.play_time.as_deref(), Some("1:12"));
        assert_eq!(result.avg_time.as_deref(), Some("1:55"));
        assert_eq!(result.game, Some(GameName::Tango));
    }

    #[test]
    fn test_unknown_image_untouched() {
        let overrides = Overrides::default();
        let mut result = GameResult::default();
        assert_eq!(overrides.apply("IMG_0001", &mut result), 0);
        assert_eq!(result, GameResult::default());
    }

    #[test]
    fn test_extend_replaces_entries() {
        let mut overrides = Overrides::default();
        let mut extra = Overrides {
            game: BTreeMap::new(),
            avg_time: BTreeMap::new(),
            play_time: BTreeMap::new(),
        };
        extra.play_time.insert("IMG_1832".to_string(), "1:17".to_string());
        extra.game.insert("IMG_9999".to_string(), GameName::Queens);
        overrides.extend(extra);

        assert_eq!(overrides.play_time["IMG_1832"], "1:17");
        assert_eq!(overrides.game["IMG_9999"], GameName::Queens);
        assert_eq!(overrides.game["IMG_2181"], GameName::Tango);
    }
}
