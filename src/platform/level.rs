//! Platform severity levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a platform record, ordered by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Level(i32);

impl Level {
    pub const ALL: Level = Level(i32::MIN);
    pub const FINEST: Level = Level(300);
    pub const FINER: Level = Level(400);
    pub const FINE: Level = Level(500);
    pub const CONFIG: Level = Level(700);
    pub const INFO: Level = Level(800);
    pub const WARNING: Level = Level(900);
    pub const SEVERE: Level = Level(1000);
    pub const OFF: Level = Level(i32::MAX);

    /// Every standard level, least severe first.
    pub const STANDARD: [Level; 9] = [
        Level::ALL,
        Level::FINEST,
        Level::FINER,
        Level::FINE,
        Level::CONFIG,
        Level::INFO,
        Level::WARNING,
        Level::SEVERE,
        Level::OFF,
    ];

    pub const fn custom(rank: i32) -> Self {
        Level(rank)
    }

    pub const fn rank(self) -> i32 {
        self.0
    }

    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Level::ALL => "ALL",
            Level::FINEST => "FINEST",
            Level::FINER => "FINER",
            Level::FINE => "FINE",
            Level::CONFIG => "CONFIG",
            Level::INFO => "INFO",
            Level::WARNING => "WARNING",
            Level::SEVERE => "SEVERE",
            Level::OFF => "OFF",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Error returned when a string names no platform level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Level::STANDARD
            .iter()
            .copied()
            .find(|l| l.name().is_some_and(|n| n.eq_ignore_ascii_case(trimmed)))
            .map(Ok)
            .unwrap_or_else(|| {
                trimmed
                    .parse::<i32>()
                    .map(Level)
                    .map_err(|_| ParseLevelError(s.to_string()))
            })
    }
}

impl TryFrom<String> for Level {
    type Error = ParseLevelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_levels_are_ordered() {
        for pair in Level::STANDARD.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("finest".parse::<Level>().unwrap(), Level::FINEST);
        assert_eq!("Warning".parse::<Level>().unwrap(), Level::WARNING);
        assert_eq!("850".parse::<Level>().unwrap(), Level::custom(850));
        assert!("critical".parse::<Level>().is_err());
    }

    #[test]
    fn test_custom_levels_display_their_rank() {
        assert_eq!(Level::custom(850).to_string(), "850");
        assert_eq!(Level::SEVERE.to_string(), "SEVERE");
    }
}
