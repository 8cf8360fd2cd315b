//! Composite nodes: schema-driven trees of leaves.
//!
//! A [`Tree`] owns either keyed children (record and map fields) or
//! positional children (list fields). Children are created lazily the first
//! time the daemon reports a key, from the specification the schema holds
//! for `tree.path + key`. The node kind follows the specification, never the
//! incoming value: a composite field reported as `null` becomes an empty tree.
//!
//! Updates merge. Keys missing from an incoming snapshot keep their nodes
//! and dirty flags untouched. An update is checked against the schema as a
//! whole before any node changes, so a rejected update leaves the tree as it
//! was.

use hq_path::{format_child, format_path, join, Path, Segment};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::trace;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::leaf::Leaf;
use crate::spec::FieldSpec;

#[derive(Debug, Clone)]
pub enum Node {
    Leaf(Leaf),
    Tree(Tree),
}

impl Node {
    /// Instantiate the node for `parent + key` from its specification,
    /// seeded with `raw`.
    fn build(
        ctx: &Context,
        parent: &[Segment],
        key: Segment,
        spec: &FieldSpec,
        raw: &Value,
    ) -> Result<Node> {
        match spec {
            FieldSpec::Scalar(scalar) => {
                trace!(path = %format_child(parent, &key), "new leaf");
                Ok(Node::Leaf(Leaf::new(key, raw, scalar, ctx.format().clone())))
            }
            _ => {
                let path = join(parent, key);
                trace!(path = %format_path(&path), kind = spec.kind(), "new tree");
                let mut tree = Tree::empty(ctx.clone(), path, spec)?;
                tree.merge(raw)?;
                Ok(Node::Tree(tree))
            }
        }
    }

    /// Merge a value reported by the daemon into this node.
    pub fn absorb(&mut self, raw: &Value) -> Result<()> {
        match self {
            Node::Leaf(leaf) => {
                leaf.absorb_remote(raw);
                Ok(())
            }
            Node::Tree(tree) => tree.update(raw),
        }
    }

    fn merge(&mut self, raw: &Value) -> Result<()> {
        match self {
            Node::Leaf(leaf) => {
                leaf.absorb_remote(raw);
                Ok(())
            }
            Node::Tree(tree) => tree.merge(raw),
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Tree(_) => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut Leaf> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Node::Tree(tree) => Some(tree),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_tree_mut(&mut self) -> Option<&mut Tree> {
        match self {
            Node::Tree(tree) => Some(tree),
            Node::Leaf(_) => None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        match self {
            Node::Leaf(leaf) => leaf.is_dirty(),
            Node::Tree(tree) => tree.is_dirty(),
        }
    }

    pub fn machine_view(&self) -> Value {
        match self {
            Node::Leaf(leaf) => leaf.value().clone(),
            Node::Tree(tree) => tree.machine_view(),
        }
    }

    pub fn human_view(&self) -> Value {
        match self {
            Node::Leaf(leaf) => Value::String(leaf.human().to_string()),
            Node::Tree(tree) => tree.human_view(),
        }
    }

    fn collect_dirty(&self) -> Option<Value> {
        match self {
            Node::Leaf(leaf) if leaf.is_dirty() => Some(leaf.outgoing()),
            Node::Leaf(_) => None,
            Node::Tree(tree) => tree.collect_dirty(),
        }
    }

    fn mark_clean(&mut self) {
        match self {
            Node::Leaf(leaf) => {
                if leaf.is_dirty() {
                    leaf.confirm();
                }
            }
            Node::Tree(tree) => tree.mark_clean(),
        }
    }
}

#[derive(Debug, Clone)]
enum Children {
    Keyed(IndexMap<String, Node>),
    Positional(Vec<Node>),
}

impl Children {
    fn for_spec(spec: &FieldSpec, path: &[Segment]) -> Result<Self> {
        match spec {
            FieldSpec::Record(_) | FieldSpec::Map(_) => Ok(Children::Keyed(IndexMap::new())),
            FieldSpec::List(_) => Ok(Children::Positional(Vec::new())),
            FieldSpec::Scalar(_) => Err(Error::ShapeMismatch {
                path: format_path(path),
                expected: "record or list",
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tree {
    ctx: Context,
    path: Path,
    children: Children,
}

impl Tree {
    /// An empty tree for the composite field at `path`.
    pub fn new(ctx: Context, path: Path) -> Result<Self> {
        let children = Children::for_spec(ctx.schema().resolve_path(&path)?, &path)?;
        Ok(Self { ctx, path, children })
    }

    fn empty(ctx: Context, path: Path, spec: &FieldSpec) -> Result<Self> {
        let children = Children::for_spec(spec, &path)?;
        Ok(Self { ctx, path, children })
    }

    pub fn path(&self) -> &[Segment] {
        &self.path
    }

    /// Whether children are positional.
    pub fn is_sequence(&self) -> bool {
        matches!(self.children, Children::Positional(_))
    }

    // ── Remote path ──────────────────────────────────────────────────────

    /// Merge a record or sequence reported by the daemon. `null` is a no-op.
    ///
    /// Fails with `SchemaMissing` or `ShapeMismatch` without changing any
    /// node when some part of `incoming` does not fit the schema.
    pub fn update(&mut self, incoming: &Value) -> Result<()> {
        self.check(incoming)?;
        self.merge(incoming)
    }

    /// Verify that `incoming` would merge cleanly into this tree.
    pub fn check(&self, incoming: &Value) -> Result<()> {
        let spec = self.ctx.schema().resolve_path(&self.path)?;
        check_value(&self.ctx, &self.path, spec, incoming)
    }

    fn merge(&mut self, incoming: &Value) -> Result<()> {
        match (&mut self.children, incoming) {
            (_, Value::Null) => Ok(()),
            (Children::Keyed(children), Value::Object(fields)) => {
                for (name, raw) in fields {
                    if let Some(child) = children.get_mut(name) {
                        child.merge(raw)?;
                        continue;
                    }
                    let key = Segment::Key(name.clone());
                    let spec = self.ctx.schema().resolve(&self.path, &key)?;
                    let child = Node::build(&self.ctx, &self.path, key, spec, raw)?;
                    children.insert(name.clone(), child);
                }
                Ok(())
            }
            (Children::Positional(children), Value::Array(items)) => {
                for (idx, raw) in items.iter().enumerate() {
                    if let Some(child) = children.get_mut(idx) {
                        child.merge(raw)?;
                        continue;
                    }
                    let key = Segment::Index(idx);
                    let spec = self.ctx.schema().resolve(&self.path, &key)?;
                    let child = Node::build(&self.ctx, &self.path, key, spec, raw)?;
                    children.push(child);
                }
                Ok(())
            }
            (Children::Keyed(_), _) => Err(shape_mismatch(&self.path, "record")),
            (Children::Positional(_), _) => Err(shape_mismatch(&self.path, "list")),
        }
    }

    // ── Local path ───────────────────────────────────────────────────────

    /// Set the leaf at `key` to `value`, creating it from the schema when the
    /// daemon has not reported it yet. Returns whether the value changed.
    pub fn set(&mut self, key: impl Into<Segment>, value: impl Into<Value>) -> Result<bool> {
        let key = key.into();
        let full_path = || format_child(&self.path, &key);
        let leaf = match (&mut self.children, &key) {
            (Children::Keyed(children), Segment::Key(name)) if !children.contains_key(name) => {
                let scalar = self
                    .ctx
                    .schema()
                    .resolve(&self.path, &key)?
                    .as_scalar()
                    .ok_or_else(|| Error::ShapeMismatch { path: full_path(), expected: "scalar" })?;
                if !scalar.mutable {
                    return Err(Error::Immutable { path: full_path() });
                }
                let leaf = Leaf::new(key.clone(), &Value::Null, scalar, self.ctx.format().clone());
                trace!(path = %full_path(), "new leaf from local write");
                children.entry(name.clone()).or_insert(Node::Leaf(leaf))
            }
            (Children::Keyed(children), _) => children
                .get_mut(&key.to_string())
                .ok_or_else(|| Error::NotFound { path: full_path() })?,
            (Children::Positional(children), Segment::Index(idx)) => children
                .get_mut(*idx)
                .ok_or_else(|| Error::NotFound { path: full_path() })?,
            (Children::Positional(_), Segment::Key(_)) => {
                return Err(Error::NotFound { path: full_path() })
            }
        };
        let leaf = leaf
            .as_leaf_mut()
            .ok_or_else(|| Error::ShapeMismatch { path: full_path(), expected: "scalar" })?;
        leaf.set(value).map_err(|err| match err {
            Error::Immutable { .. } => Error::Immutable { path: full_path() },
            other => other,
        })
    }

    // ── Access ───────────────────────────────────────────────────────────

    pub fn get(&self, key: impl Into<Segment>) -> Option<&Node> {
        match (&self.children, key.into()) {
            (Children::Keyed(children), Segment::Key(name)) => children.get(&name),
            (Children::Keyed(children), Segment::Index(idx)) => children.get(&idx.to_string()),
            (Children::Positional(children), Segment::Index(idx)) => children.get(idx),
            (Children::Positional(_), Segment::Key(_)) => None,
        }
    }

    pub fn get_mut(&mut self, key: impl Into<Segment>) -> Option<&mut Node> {
        match (&mut self.children, key.into()) {
            (Children::Keyed(children), Segment::Key(name)) => children.get_mut(&name),
            (Children::Keyed(children), Segment::Index(idx)) => children.get_mut(&idx.to_string()),
            (Children::Positional(children), Segment::Index(idx)) => children.get_mut(idx),
            (Children::Positional(_), Segment::Key(_)) => None,
        }
    }

    pub fn leaf(&self, key: impl Into<Segment>) -> Option<&Leaf> {
        self.get(key).and_then(Node::as_leaf)
    }

    pub fn leaf_mut(&mut self, key: impl Into<Segment>) -> Option<&mut Leaf> {
        self.get_mut(key).and_then(Node::as_leaf_mut)
    }

    pub fn tree(&self, key: impl Into<Segment>) -> Option<&Tree> {
        self.get(key).and_then(Node::as_tree)
    }

    pub fn tree_mut(&mut self, key: impl Into<Segment>) -> Option<&mut Tree> {
        self.get_mut(key).and_then(Node::as_tree_mut)
    }

    /// Look up a descendant by a path relative to this tree.
    pub fn get_path(&self, rel: &[Segment]) -> Option<&Node> {
        let (last, init) = rel.split_last()?;
        let mut tree = self;
        for step in init {
            tree = tree.tree(step.clone())?;
        }
        tree.get(last.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Segment, &Node)> + '_ {
        let (keyed, positional) = match &self.children {
            Children::Keyed(children) => (Some(children.iter()), None),
            Children::Positional(children) => (None, Some(children.iter().enumerate())),
        };
        keyed
            .into_iter()
            .flatten()
            .map(|(name, node)| (Segment::Key(name.clone()), node))
            .chain(
                positional
                    .into_iter()
                    .flatten()
                    .map(|(idx, node)| (Segment::Index(idx), node)),
            )
    }

    pub fn keys(&self) -> impl Iterator<Item = Segment> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        match &self.children {
            Children::Keyed(children) => children.len(),
            Children::Positional(children) => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every leaf below this tree with its absolute path, in tree order.
    pub fn leaves(&self) -> Vec<(Path, &Leaf)> {
        let mut out = Vec::new();
        self.walk(&mut out);
        out
    }

    fn walk<'a>(&'a self, out: &mut Vec<(Path, &'a Leaf)>) {
        for (key, node) in self.iter() {
            match node {
                Node::Leaf(leaf) => out.push((join(&self.path, key), leaf)),
                Node::Tree(tree) => tree.walk(out),
            }
        }
    }

    // ── Projections ──────────────────────────────────────────────────────

    pub fn machine_view(&self) -> Value {
        self.project(Node::machine_view)
    }

    pub fn human_view(&self) -> Value {
        self.project(Node::human_view)
    }

    fn project(&self, view: fn(&Node) -> Value) -> Value {
        match &self.children {
            Children::Keyed(children) => Value::Object(
                children
                    .iter()
                    .map(|(name, node)| (name.clone(), view(node)))
                    .collect(),
            ),
            Children::Positional(children) => Value::Array(children.iter().map(view).collect()),
        }
    }

    // ── Dirty tracking ───────────────────────────────────────────────────

    pub fn is_dirty(&self) -> bool {
        self.iter().any(|(_, node)| node.is_dirty())
    }

    /// The dirty leaves below this tree, shaped like the tree, with write
    /// hooks applied. `None` when nothing is dirty.
    ///
    /// Records keep their keys. Lists are compacted to their dirty elements.
    pub fn collect_dirty(&self) -> Option<Value> {
        match &self.children {
            Children::Keyed(children) => {
                let patch: Map<String, Value> = children
                    .iter()
                    .filter_map(|(name, node)| Some((name.clone(), node.collect_dirty()?)))
                    .collect();
                (!patch.is_empty()).then_some(Value::Object(patch))
            }
            Children::Positional(children) => {
                let patch: Vec<Value> = children.iter().filter_map(Node::collect_dirty).collect();
                (!patch.is_empty()).then_some(Value::Array(patch))
            }
        }
    }

    /// Record every dirty leaf below this tree as confirmed by the daemon.
    pub fn mark_clean(&mut self) {
        match &mut self.children {
            Children::Keyed(children) => children.values_mut().for_each(Node::mark_clean),
            Children::Positional(children) => children.iter_mut().for_each(Node::mark_clean),
        }
    }
}

/// Walk `raw` against `spec` at `path`, resolving every key the way a merge
/// would, without touching any node.
pub(crate) fn check_value(
    ctx: &Context,
    path: &[Segment],
    spec: &FieldSpec,
    raw: &Value,
) -> Result<()> {
    match (spec, raw) {
        (FieldSpec::Scalar(_), _) | (_, Value::Null) => Ok(()),
        (FieldSpec::Record(_) | FieldSpec::Map(_), Value::Object(fields)) => {
            fields.iter().try_for_each(|(name, child)| {
                let key = Segment::Key(name.clone());
                let spec = ctx.schema().resolve(path, &key)?;
                check_value(ctx, &join(path, key), spec, child)
            })
        }
        (FieldSpec::List(_), Value::Array(items)) => {
            items.iter().enumerate().try_for_each(|(idx, child)| {
                let key = Segment::Index(idx);
                let spec = ctx.schema().resolve(path, &key)?;
                check_value(ctx, &join(path, key), spec, child)
            })
        }
        (FieldSpec::List(_), _) => Err(shape_mismatch(path, "list")),
        (FieldSpec::Record(_) | FieldSpec::Map(_), _) => Err(shape_mismatch(path, "record")),
    }
}

fn shape_mismatch(path: &[Segment], expected: &'static str) -> Error {
    Error::ShapeMismatch { path: format_path(path), expected }
}
