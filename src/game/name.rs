//! Game names shown on the results screens.

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Games whose results are collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameName {
    Queens,
    Tango,
}

impl GameName {
    /// Known-game registry, in fuzzy-matching priority order.
    pub const ALL: [GameName; 2] = [GameName::Queens, GameName::Tango];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameName::Queens => "Queens",
            GameName::Tango => "Tango",
        }
    }
}

impl fmt::Display for GameName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameName::ALL
            .into_iter()
            .find(|game| game.as_str() == s.trim())
            .ok_or_else(|| anyhow!("Unknown game name: {}", s))
    }
}

/// Games the app also shows but that are not part of the dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExcludedGame {
    Pinpoint,
    Crossclimb,
    Zip,
}

impl ExcludedGame {
    pub const ALL: [ExcludedGame; 3] = [
        ExcludedGame::Pinpoint,
        ExcludedGame::Crossclimb,
        ExcludedGame::Zip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExcludedGame::Pinpoint => "Pinpoint",
            ExcludedGame::Crossclimb => "Crossclimb",
            ExcludedGame::Zip => "Zip",
        }
    }
}

impl fmt::Display for ExcludedGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_name_round_trips_through_str() {
        for game in GameName::ALL {
            assert_eq!(game.to_string().parse::<GameName>().unwrap(), game);
        }
    }

    #[test]
    fn test_unknown_game_name_is_error() {
        assert!("Pinpoint".parse::<GameName>().is_err());
        assert!("".parse::<GameName>().is_err());
    }
}
