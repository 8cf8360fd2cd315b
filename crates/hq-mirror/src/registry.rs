//! Schema registry: resolves node paths to field specifications.

use hq_path::{format_child, format_path, Segment};
use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::spec::{FieldSpec, Fields};

/// Immutable map from section names to their field specifications.
///
/// Sections are the roots of mirrored trees (`session`, `torrent`). A
/// section may name an identifier field that is injected into every patch
/// pushed from it.
#[derive(Debug, Clone)]
pub struct Schema {
    root: FieldSpec,
    identifiers: IndexMap<String, String>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    pub fn new() -> Self {
        Self {
            root: FieldSpec::Record(Fields::new()),
            identifiers: IndexMap::new(),
        }
    }

    pub fn with_section(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        if let FieldSpec::Record(sections) = &mut self.root {
            sections.insert(name.into(), spec);
        }
        self
    }

    /// Mark `field` as the identifier of entities in `section`.
    pub fn with_identifier(mut self, section: impl Into<String>, field: impl Into<String>) -> Self {
        self.identifiers.insert(section.into(), field.into());
        self
    }

    pub fn section(&self, name: &str) -> Option<&FieldSpec> {
        self.root.child(&Segment::from(name))
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        let fields = match &self.root {
            FieldSpec::Record(fields) => Some(fields),
            _ => None,
        };
        fields.into_iter().flat_map(|f| f.keys().map(String::as_str))
    }

    pub fn identifier(&self, section: &str) -> Option<&str> {
        self.identifiers.get(section).map(String::as_str)
    }

    /// Resolve the specification of the node at `path`.
    ///
    /// Keys descend into records and maps, positions into list elements.
    pub fn resolve_path(&self, path: &[Segment]) -> Result<&FieldSpec> {
        let mut current = &self.root;
        for (depth, step) in path.iter().enumerate() {
            current = current.child(step).ok_or_else(|| Error::SchemaMissing {
                path: format_path(&path[..=depth]),
            })?;
        }
        Ok(current)
    }

    /// Resolve the specification of child `key` of the node at `path`.
    pub fn resolve(&self, path: &[Segment], key: &Segment) -> Result<&FieldSpec> {
        self.resolve_path(path)?
            .child(key)
            .ok_or_else(|| Error::SchemaMissing { path: format_child(path, key) })
    }
}
