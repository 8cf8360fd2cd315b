//! Error type for mirror operations.
//!
//! Nothing here is retried or recovered locally; every variant goes straight
//! back to the caller of the failing operation.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// No field specification exists at the path. This is a schema
    /// authoring error and is never defaulted.
    #[error("missing field specification: {path}")]
    SchemaMissing { path: String },

    /// Local write to a field the schema marks read-only. The value is left
    /// unchanged.
    #[error("field is not mutable: {path}")]
    Immutable { path: String },

    /// Incoming data (or a keyed write) does not have the container shape the
    /// schema describes at this path.
    #[error("shape mismatch at {path}: expected {expected}")]
    ShapeMismatch { path: String, expected: &'static str },

    /// Keyed access to a position that has not been materialized.
    #[error("no node at {path}")]
    NotFound { path: String },

    /// The fetch or commit round-trip failed at the transport layer.
    #[error("collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// The daemon refused a commit.
    #[error("collaborator rejected request: {0}")]
    CollaboratorRejected(String),
}

pub type Result<T> = std::result::Result<T, Error>;
