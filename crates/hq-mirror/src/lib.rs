//! hq-mirror - a schema-driven, typed mirror of a BitTorrent daemon's session
//! and torrent state.
//!
//! Snapshots fetched from the daemon are merged into trees of typed leaves.
//! Every leaf keeps a machine value, a human rendering and a dirty flag;
//! local edits are collected into minimal patches and pushed back.
//!
//! # Example
//!
//! ```
//! use hq_format::FormatConfig;
//! use hq_mirror::{Context, Mirror};
//! use serde_json::json;
//!
//! let ctx = Context::transmission(FormatConfig::default());
//! let mut session = Mirror::from_snapshot(ctx, "session", &json!({"peer-limit-global": 5})).unwrap();
//! assert_eq!(session.leaf("peer-limit-global").unwrap().human(), "5");
//!
//! session.set("peer-limit-global", 10000).unwrap();
//! let patch = session.patch().unwrap();
//! assert_eq!(patch["peer-limit-global"], json!(10000));
//! ```

pub mod cache;
pub mod cli;
pub mod context;
pub mod error;
pub mod leaf;
pub mod mirror;
pub mod node;
pub mod registry;
pub mod spec;
pub mod sync;
pub mod transmission;
pub mod value;

pub use cache::EntityCache;
pub use context::Context;
pub use error::{Error, Result};
pub use leaf::{Hook, Leaf};
pub use mirror::{Commit, Mirror, Patch};
pub use node::{Node, Tree};
pub use registry::Schema;
pub use spec::{FieldSpec, Fields, Hooks, Prettifier, ScalarSpec, Transform};
pub use sync::{Collaborator, Driver};
