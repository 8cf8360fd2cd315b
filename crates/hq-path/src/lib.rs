//! Node paths for a mirrored daemon object graph.
//!
//! A path addresses one node inside the mirror, starting at the schema
//! section (`session`, `torrent`) and descending through record keys and
//! list positions. The textual form joins steps with `:`.
//!
//! # Example
//!
//! ```
//! use hq_path::{format_path, parse_path, Segment};
//!
//! let path = parse_path("torrent:files:0:name").unwrap();
//! assert_eq!(path[2], Segment::Index(0));
//! assert_eq!(format_path(&path), "torrent:files:0:name");
//! ```

pub mod types;
pub use types::{Path, Segment};

pub mod validate;
pub use validate::{validate_path, ValidationError, MAX_PATH_LENGTH};

/// Separator between steps in the textual form.
pub const SEPARATOR: char = ':';

/// Parse a textual path into segments.
///
/// An empty string is the root path. All-digit steps become indices.
///
/// # Example
///
/// ```
/// use hq_path::{parse_path, Segment};
///
/// assert_eq!(parse_path("").unwrap(), Vec::<Segment>::new());
/// assert_eq!(
///     parse_path("session:units").unwrap(),
///     vec![Segment::from("session"), Segment::from("units")]
/// );
/// assert!(parse_path("session::units").is_err());
/// ```
pub fn parse_path(text: &str) -> Result<Path, ValidationError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let path: Path = text.split(SEPARATOR).map(Segment::parse).collect();
    validate_path(&path)?;
    Ok(path)
}

/// Format segments into the textual form.
///
/// # Example
///
/// ```
/// use hq_path::{format_path, Segment};
///
/// assert_eq!(format_path(&[]), "");
/// assert_eq!(format_path(&[Segment::from("torrent"), Segment::from(2usize)]), "torrent:2");
/// ```
pub fn format_path(path: &[Segment]) -> String {
    let mut out = String::new();
    for (i, step) in path.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(&step.to_string());
    }
    out
}

/// Format `path` extended by one trailing `key`, without allocating a new path.
pub fn format_child(path: &[Segment], key: &Segment) -> String {
    if path.is_empty() {
        return key.to_string();
    }
    format!("{}{SEPARATOR}{key}", format_path(path))
}

/// Extend `path` by one step.
pub fn join(path: &[Segment], key: impl Into<Segment>) -> Path {
    let mut out = Vec::with_capacity(path.len() + 1);
    out.extend_from_slice(path);
    out.push(key.into());
    out
}

/// Check if `parent` path strictly contains the `child` path.
///
/// # Example
///
/// ```
/// use hq_path::{is_child, parse_path};
///
/// let parent = parse_path("torrent:files").unwrap();
/// let child = parse_path("torrent:files:0").unwrap();
/// assert!(is_child(&parent, &child));
/// assert!(!is_child(&child, &parent));
/// ```
pub fn is_child(parent: &[Segment], child: &[Segment]) -> bool {
    parent.len() < child.len() && child.starts_with(parent)
}

/// Get the parent path, or `None` for the root.
pub fn parent(path: &[Segment]) -> Option<&[Segment]> {
    path.split_last().map(|(_, rest)| rest)
}
