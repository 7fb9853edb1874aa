//! Unified error handling for the race-finder library.
//!
//! Two failure classes exist: the catalog could not be built (fatal at
//! startup), or a caller passed an argument the search layer rejects.
//! Zero matches is never an error.

use thiserror::Error;

/// Unified error type for race catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RaceCatalogError {
    /// The static source is missing, unreadable, malformed or holds no usable records
    #[error("Catalog load failed: {message}")]
    CatalogLoad { message: String },
    /// A query argument was rejected before touching the catalog
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl RaceCatalogError {
    pub(crate) fn load(message: impl Into<String>) -> Self {
        RaceCatalogError::CatalogLoad {
            message: message.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        RaceCatalogError::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Result type alias for race catalog operations.
pub type Result<T> = std::result::Result<T, RaceCatalogError>;

/// Extension trait for converting Option to RaceCatalogError.
pub trait OptionExt<T> {
    /// Convert Option to Result with a catalog load error.
    fn ok_or_load_error(self, message: &str) -> Result<T>;

    /// Convert Option to Result with an invalid argument error.
    fn ok_or_invalid(self, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_load_error(self, message: &str) -> Result<T> {
        self.ok_or_else(|| RaceCatalogError::load(message))
    }

    fn ok_or_invalid(self, message: &str) -> Result<T> {
        self.ok_or_else(|| RaceCatalogError::invalid(message))
    }
}
