//! Error types for the Starfield LOD crate
//!
//! Errors only surface at construction time (configuration, index
//! parameters, dataset arrays). The per-frame culling path has no
//! recoverable failures: running out of tier capacity is a bounded
//! truncation, and slot overruns are programming errors that panic.

use std::fmt;

/// Result type for Starfield operations
pub type Result<T> = std::result::Result<T, Error>;

/// Starfield errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Culler or index configuration is malformed (zero depth, NaN threshold, ...)
    InvalidConfig(String),

    /// Input arrays are inconsistent (stride, parallel lengths, ...)
    InvalidInput(String),

    /// A point lies outside the bounds of the spatial index
    OutOfBounds(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Error::OutOfBounds(msg) => write!(f, "Out of bounds: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Build an error, logging it at ERROR severity first.
///
/// # Example
///
/// ```ignore
/// let err = lod_err!(InvalidInput, "starfield::PointOctree", "bad stride {}", len);
/// ```
#[macro_export]
macro_rules! lod_err {
    ($variant:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::lod_error!($source, "{}", message);
        $crate::starfield::Error::$variant(message)
    }};
}

/// Log an error and return it from the enclosing function.
#[macro_export]
macro_rules! lod_bail {
    ($variant:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::lod_err!($variant, $source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
