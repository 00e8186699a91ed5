//! Category severity levels.
//!
//! # Design Decisions
//! - A level is a rank; ordering is numeric so custom ranks slot in between
//!   the standard constants
//! - Names parse case-insensitively, bare integers parse as custom ranks
//! - Serialized as the display string so configs stay readable

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a category event, ordered by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Level(i32);

impl Level {
    pub const ALL: Level = Level(i32::MIN);
    pub const TRACE: Level = Level(5_000);
    pub const DEBUG: Level = Level(10_000);
    pub const INFO: Level = Level(20_000);
    pub const WARN: Level = Level(30_000);
    pub const ERROR: Level = Level(40_000);
    pub const FATAL: Level = Level(50_000);
    pub const OFF: Level = Level(i32::MAX);

    /// Every standard level, least severe first.
    pub const STANDARD: [Level; 8] = [
        Level::ALL,
        Level::TRACE,
        Level::DEBUG,
        Level::INFO,
        Level::WARN,
        Level::ERROR,
        Level::FATAL,
        Level::OFF,
    ];

    /// A level with an arbitrary rank.
    pub const fn custom(rank: i32) -> Self {
        Level(rank)
    }

    pub const fn rank(self) -> i32 {
        self.0
    }

    /// Name of a standard level, `None` for custom ranks.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Level::ALL => "ALL",
            Level::TRACE => "TRACE",
            Level::DEBUG => "DEBUG",
            Level::INFO => "INFO",
            Level::WARN => "WARN",
            Level::ERROR => "ERROR",
            Level::FATAL => "FATAL",
            Level::OFF => "OFF",
            _ => return None,
        };
        Some(name)
    }

    /// True when `self` is at least as severe as `threshold`.
    pub fn is_greater_or_equal(self, threshold: Level) -> bool {
        self >= threshold
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "LEVEL({})", self.0),
        }
    }
}

/// Error returned when a string names no category level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(level) = Level::STANDARD
            .iter()
            .copied()
            .find(|l| l.name().is_some_and(|n| n.eq_ignore_ascii_case(trimmed)))
        {
            return Ok(level);
        }

        let rank = trimmed
            .strip_prefix("LEVEL(")
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);
        rank.parse::<i32>()
            .map(Level)
            .map_err(|_| ParseLevelError(s.to_string()))
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
