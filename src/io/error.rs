//! Error types for triangle generation, motif analysis and attractor sampling

use std::fmt;
use std::path::PathBuf;

/// Main error type for all pattern operations
#[derive(Debug)]
pub enum PatternError {
    /// Modulus below 2
    InvalidModulus {
        /// The rejected modulus
        modulus: u64,
    },

    /// Row count outside the supported range
    InvalidRowCount {
        /// The rejected row count
        rows: usize,
        /// Why the row count was rejected
        reason: &'static str,
    },

    /// Raster too small to contain one full motif
    ///
    /// Self-similarity needs at least `modulus` rows so that the
    /// largest power-of-modulus prefix has one level of blocks.
    InsufficientRows {
        /// Rows available in the raster
        rows: usize,
        /// Modulus the analysis was requested for
        modulus: u64,
    },

    /// Candidate construction found no contraction maps
    EmptyMapSet {
        /// Modulus whose motif produced no maps, if the candidate targets one
        modulus: Option<u64>,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A cancellation token was triggered while work was in progress
    Cancelled {
        /// Operation that observed the cancellation
        operation: &'static str,
    },

    /// Class label has no palette entry
    InvalidClassLabel {
        /// The label without a colour
        label: u64,
        /// Number of classes the palette covers
        palette_len: u64,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidModulus { modulus } => {
                write!(f, "Invalid modulus {modulus}: must be at least 2")
            }
            Self::InvalidRowCount { rows, reason } => {
                write!(f, "Invalid row count {rows}: {reason}")
            }
            Self::InsufficientRows { rows, modulus } => {
                write!(
                    f,
                    "Insufficient rows: {rows} rows cannot hold a motif for modulus {modulus} (need at least {modulus})"
                )
            }
            Self::EmptyMapSet {
                modulus: Some(modulus),
            } => {
                write!(
                    f,
                    "Empty map set: the motif for modulus {modulus} has no non-empty blocks"
                )
            }
            Self::EmptyMapSet { modulus: None } => {
                write!(f, "Empty map set: no contraction maps were supplied")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Cancelled { operation } => write!(f, "Cancelled during {operation}"),
            Self::InvalidClassLabel { label, palette_len } => {
                write!(
                    f,
                    "Class label {label} has no colour (palette covers {palette_len} classes)"
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for pattern results
pub type Result<T> = std::result::Result<T, PatternError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> PatternError {
    PatternError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error for the given path and operation
pub fn file_system_error(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> PatternError {
    PatternError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}

/// Validate a modulus before any computation starts
///
/// # Errors
///
/// Returns `InvalidModulus` when `modulus < 2`
pub const fn validate_modulus(modulus: u64) -> Result<u64> {
    if modulus < 2 {
        Err(PatternError::InvalidModulus { modulus })
    } else {
        Ok(modulus)
    }
}

/// Validate a row count against the minimum of one row
///
/// # Errors
///
/// Returns `InvalidRowCount` when `rows == 0`
pub const fn validate_row_count(rows: usize) -> Result<usize> {
    if rows == 0 {
        Err(PatternError::InvalidRowCount {
            rows,
            reason: "at least one row is required",
        })
    } else {
        Ok(rows)
    }
}
