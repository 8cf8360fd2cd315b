//! Mirrored roots: a section tree that can push its dirty leaves.

use std::fmt;
use std::ops::{Deref, DerefMut};

use hq_path::Segment;
use serde_json::{Map, Value};
use tracing::debug;

use crate::context::Context;
use crate::error::Result;
use crate::node::Tree;

/// Dirty leaves of one root, keyed by field name.
pub type Patch = Map<String, Value>;

/// Receives patches pushed from a [`Mirror`].
pub trait Commit {
    fn commit(&mut self, patch: &Patch) -> Result<()>;
}

impl<F> Commit for F
where
    F: FnMut(&Patch) -> Result<()>,
{
    fn commit(&mut self, patch: &Patch) -> Result<()> {
        self(patch)
    }
}

/// The root of one mirrored section (the session, or a single torrent).
///
/// Dereferences to its [`Tree`] for reads, updates and local writes.
pub struct Mirror {
    tree: Tree,
    identifier: Option<String>,
    commit: Option<Box<dyn Commit + Send>>,
}

impl Mirror {
    pub fn new(ctx: Context, section: &str) -> Result<Self> {
        let identifier = ctx.schema().identifier(section).map(str::to_string);
        let tree = Tree::new(ctx, vec![Segment::from(section)])?;
        Ok(Self { tree, identifier, commit: None })
    }

    /// A mirror seeded with a snapshot.
    pub fn from_snapshot(ctx: Context, section: &str, snapshot: &Value) -> Result<Self> {
        let mut mirror = Self::new(ctx, section)?;
        mirror.tree.update(snapshot)?;
        Ok(mirror)
    }

    /// Attach the commit that [`Mirror::push`] sends patches to.
    pub fn with_commit(mut self, commit: impl Commit + Send + 'static) -> Self {
        self.commit = Some(Box::new(commit));
        self
    }

    pub fn section(&self) -> &str {
        self.tree.path().first().and_then(Segment::as_key).unwrap_or_default()
    }

    /// The identifier value of an entity root, once the daemon reported it.
    pub fn id(&self) -> Option<&Value> {
        let field = self.identifier.as_deref()?;
        self.tree.leaf(field).map(|leaf| leaf.value()).filter(|v| !v.is_null())
    }

    /// The patch a push would send, or `None` when nothing is dirty.
    ///
    /// Entity roots carry their identifier even though it never changes
    /// locally: the daemon needs it to address the update.
    pub fn patch(&self) -> Option<Patch> {
        let Some(Value::Object(mut patch)) = self.tree.collect_dirty() else {
            return None;
        };
        if let (Some(field), Some(id)) = (self.identifier.as_deref(), self.id()) {
            patch.insert(field.to_string(), id.clone());
        }
        Some(patch)
    }

    /// Push dirty leaves through the attached commit.
    ///
    /// Returns `Ok(false)` without a commit or without dirty leaves.
    pub fn push(&mut self) -> Result<bool> {
        let Some(mut commit) = self.commit.take() else {
            return Ok(false);
        };
        let pushed = self.push_with(commit.as_mut());
        self.commit = Some(commit);
        pushed
    }

    /// Push dirty leaves through `commit`.
    ///
    /// Leaves are confirmed only once the commit succeeds. A failed commit
    /// leaves them dirty, so a later push retries them.
    pub fn push_with(&mut self, commit: &mut dyn Commit) -> Result<bool> {
        let Some(patch) = self.patch() else {
            return Ok(false);
        };
        debug!(section = self.section(), fields = patch.len(), "pushing patch");
        if let Err(err) = commit.commit(&patch) {
            debug!(section = self.section(), error = %err, "commit failed, leaves stay dirty");
            return Err(err);
        }
        self.tree.mark_clean();
        Ok(true)
    }
}

impl Deref for Mirror {
    type Target = Tree;

    fn deref(&self) -> &Tree {
        &self.tree
    }
}

impl DerefMut for Mirror {
    fn deref_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }
}

impl fmt::Debug for Mirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mirror")
            .field("tree", &self.tree)
            .field("identifier", &self.identifier)
            .field("commit", &self.commit.is_some())
            .finish()
    }
}
