//! Level translation between the category and platform models.
//!
//! # Mapping
//! ```text
//! category → platform          platform → category
//! ALL   → ALL                  ALL     → ALL
//! TRACE → FINER                FINEST  → TRACE
//! DEBUG → FINE                 FINER   → TRACE
//! INFO  → INFO                 FINE    → DEBUG
//! WARN  → WARNING              CONFIG  → INFO
//! ERROR → SEVERE               INFO    → INFO
//! FATAL → SEVERE               WARNING → WARN
//! OFF   → OFF                  SEVERE  → ERROR
//!                              OFF     → OFF
//! ```
//! FATAL and ERROR share SEVERE, so FATAL comes back as ERROR. The loss is
//! accepted: the platform has no level between WARNING and SEVERE.
//!
//! # Design Decisions
//! - Both directions are total and monotonic
//! - Ranks missing from a table take the mapping of the nearest tabulated rank;
//!   a tie goes to the less severe neighbour
//! - ALL and OFF only match exactly, so an extreme custom rank never turns
//!   into "log nothing"

use std::fmt;

use crate::category;
use crate::platform;

/// Translates levels in both directions. Implementations must be total and
/// monotonic: a more severe input never yields a less severe output.
pub trait LevelConverter: Send + Sync + fmt::Debug {
    fn to_platform(&self, level: category::Level) -> platform::Level;

    fn to_category(&self, level: platform::Level) -> category::Level;
}

const CATEGORY_TO_PLATFORM: [(i32, platform::Level); 6] = [
    (category::Level::TRACE.rank(), platform::Level::FINER),
    (category::Level::DEBUG.rank(), platform::Level::FINE),
    (category::Level::INFO.rank(), platform::Level::INFO),
    (category::Level::WARN.rank(), platform::Level::WARNING),
    (category::Level::ERROR.rank(), platform::Level::SEVERE),
    (category::Level::FATAL.rank(), platform::Level::SEVERE),
];

const PLATFORM_TO_CATEGORY: [(i32, category::Level); 7] = [
    (platform::Level::FINEST.rank(), category::Level::TRACE),
    (platform::Level::FINER.rank(), category::Level::TRACE),
    (platform::Level::FINE.rank(), category::Level::DEBUG),
    (platform::Level::CONFIG.rank(), category::Level::INFO),
    (platform::Level::INFO.rank(), category::Level::INFO),
    (platform::Level::WARNING.rank(), category::Level::WARN),
    (platform::Level::SEVERE.rank(), category::Level::ERROR),
];

/// Look up `rank` in a table sorted by rank, falling back to the nearest entry.
pub(crate) fn nearest<T: Copy>(table: &[(i32, T)], rank: i32) -> T {
    match table.binary_search_by_key(&rank, |(r, _)| *r) {
        Ok(i) => table[i].1,
        Err(0) => table[0].1,
        Err(i) if i == table.len() => table[i - 1].1,
        Err(i) => {
            let (below, lower) = table[i - 1];
            let (above, upper) = table[i];
            let down = i64::from(rank) - i64::from(below);
            let up = i64::from(above) - i64::from(rank);
            if up < down {
                upper
            } else {
                lower
            }
        }
    }
}

/// The standard mapping table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLevelConverter;

impl LevelConverter for DefaultLevelConverter {
    fn to_platform(&self, level: category::Level) -> platform::Level {
        match level {
            category::Level::ALL => platform::Level::ALL,
            category::Level::OFF => platform::Level::OFF,
            other => nearest(&CATEGORY_TO_PLATFORM, other.rank()),
        }
    }

    fn to_category(&self, level: platform::Level) -> category::Level {
        match level {
            platform::Level::ALL => category::Level::ALL,
            platform::Level::OFF => category::Level::OFF,
            other => nearest(&PLATFORM_TO_CATEGORY, other.rank()),
        }
    }
}
