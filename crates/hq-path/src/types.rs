//! Type definitions for node paths.

use std::fmt;

/// A step in a node path.
///
/// Named record fields are keys, list positions are indices. Numeric text is
/// never a key: the daemon only uses numbers for list positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// A node path, outermost section first.
pub type Path = Vec<Segment>;

impl Segment {
    /// Parse one textual step: all-digit text becomes an index.
    pub fn parse(step: &str) -> Self {
        if !step.is_empty() && step.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(idx) = step.parse::<usize>() {
                return Segment::Index(idx);
            }
        }
        Segment::Key(step.to_string())
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k),
            Segment::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(i) => Some(*i),
            Segment::Key(_) => None,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }

    /// Equality of the textual form: `Key("5")` matches `Index(5)`.
    ///
    /// Map fields take arbitrary text keys, so an all-digit map key read back
    /// from a textual path arrives as an index.
    pub fn same_step(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Key(key), Segment::Index(idx)) | (Segment::Index(idx), Segment::Key(key)) => {
                *key == idx.to_string()
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => f.write_str(k),
            Segment::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<&String> for Segment {
    fn from(key: &String) -> Self {
        Segment::Key(key.clone())
    }
}

impl From<usize> for Segment {
    fn from(idx: usize) -> Self {
        Segment::Index(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_digits_as_index() {
        assert_eq!(Segment::parse("0"), Segment::Index(0));
        assert_eq!(Segment::parse("42"), Segment::Index(42));
    }

    #[test]
    fn test_parse_names_as_key() {
        assert_eq!(Segment::parse("peer-limit"), Segment::Key("peer-limit".into()));
        assert_eq!(Segment::parse("-1"), Segment::Key("-1".into()));
        assert_eq!(Segment::parse(""), Segment::Key(String::new()));
    }

    #[test]
    fn test_accessors() {
        let key = Segment::from("files");
        assert_eq!(key.as_key(), Some("files"));
        assert_eq!(key.as_index(), None);
        assert!(!key.is_index());

        let idx = Segment::from(3usize);
        assert_eq!(idx.as_index(), Some(3));
        assert!(idx.is_index());
    }

    #[test]
    fn test_same_step_ignores_kind() {
        assert!(Segment::from("5").same_step(&Segment::Index(5)));
        assert!(Segment::Index(5).same_step(&Segment::from("5")));
        assert!(Segment::from("a").same_step(&Segment::from("a")));
        assert!(!Segment::from("05").same_step(&Segment::Index(5)));
        assert!(!Segment::Index(1).same_step(&Segment::Index(2)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Segment::from("name").to_string(), "name");
        assert_eq!(Segment::from(7usize).to_string(), "7");
    }
}
