//! Validation functions for node paths.

use thiserror::Error;

use crate::types::Segment;

/// Maximum allowed path depth.
///
/// The deepest daemon field (`torrent:trackerStats:N:host`) is four steps;
/// anything far beyond that is a malformed address.
pub const MAX_PATH_LENGTH: usize = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("empty path segment at position {0}")]
    EmptySegment(usize),
    #[error("path too long: {0} segments")]
    PathTooLong(usize),
}

/// Validate a path.
///
/// # Errors
///
/// Returns an error if:
/// - The path exceeds [`MAX_PATH_LENGTH`] steps
/// - Any key step is empty
///
/// # Example
///
/// ```
/// use hq_path::{validate_path, Segment};
///
/// validate_path(&[Segment::from("torrent"), Segment::from(0usize)]).unwrap();
/// validate_path(&[Segment::from("")]).unwrap_err();
/// ```
pub fn validate_path(path: &[Segment]) -> Result<(), ValidationError> {
    if path.len() > MAX_PATH_LENGTH {
        return Err(ValidationError::PathTooLong(path.len()));
    }
    for (pos, step) in path.iter().enumerate() {
        if let Segment::Key(k) = step {
            if k.is_empty() {
                return Err(ValidationError::EmptySegment(pos));
            }
        }
    }
    Ok(())
}
