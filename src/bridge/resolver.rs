//! Category logger lookup for inbound records.

use crate::category::{Hierarchy, Logger};
pub use crate::convert::UNKNOWN_LOGGER_NAME;

/// Finds the category logger a platform record belongs to.
///
/// The exact name is created on demand; ancestors are never created. Records
/// without a name go to [`UNKNOWN_LOGGER_NAME`].
#[derive(Debug, Clone)]
pub struct LoggerResolver {
    hierarchy: Hierarchy,
}

impl LoggerResolver {
    pub fn new(hierarchy: Hierarchy) -> Self {
        Self { hierarchy }
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn resolve(&self, name: Option<&str>) -> Logger {
        self.hierarchy.get_logger(name.unwrap_or(UNKNOWN_LOGGER_NAME))
    }
}
