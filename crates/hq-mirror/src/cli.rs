//! Logic behind the `hq-render` binary: mirror a JSON snapshot and print
//! every leaf's human-readable value.

use std::path::Path as FsPath;

use hq_format::FormatConfig;
use hq_path::{format_path, parse_path, Path, Segment, ValidationError};
use serde_json::Value;

use crate::cache::EntityCache;
use crate::context::Context;
use crate::mirror::Mirror;
use crate::node::Tree;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid path: {0}")]
    Path(#[from] ValidationError),
    #[error("{0}")]
    Mirror(#[from] crate::Error),
    #[error("config: {0}")]
    Config(#[from] hq_format::Error),
    #[error("{0}")]
    Usage(String),
}

// ── Configuration ─────────────────────────────────────────────────────────

/// Formatter settings from the TOML file at `config` when given, defaults
/// otherwise. The home directory falls back to the current user's.
pub fn load_format(config: Option<&FsPath>) -> Result<FormatConfig, CliError> {
    match config {
        Some(path) => Ok(FormatConfig::load(path)?.resolve()),
        None => Ok(FormatConfig::detect()),
    }
}

// ── hq-render ─────────────────────────────────────────────────────────────

/// Render `input` (a record, or a list of records for an entity section) as
/// `path = value` lines, restricted to the subtree at `filter` when given.
///
/// Entity sections print a `[section id]` header before each entity.
pub fn render(
    ctx: &Context,
    section: &str,
    filter: Option<&str>,
    input: &str,
) -> Result<String, CliError> {
    if ctx.schema().section(section).is_none() {
        return Err(CliError::Usage(usage()));
    }
    let snapshot: Value = serde_json::from_str(input)?;
    let mut prefix: Path = vec![Segment::from(section)];
    prefix.extend(parse_path(filter.unwrap_or_default())?);

    let mut out = String::new();
    if ctx.schema().identifier(section).is_some() {
        let mut cache = EntityCache::new(ctx.clone(), section)?;
        if snapshot.is_array() {
            cache.merge_all(&snapshot)?;
        } else {
            cache.merge(&snapshot)?;
        }
        for (id, mirror) in cache.iter() {
            out.push_str(&format!("[{section} {id}]\n"));
            write_leaves(&mut out, mirror, &prefix);
        }
    } else {
        let mirror = Mirror::from_snapshot(ctx.clone(), section, &snapshot)?;
        write_leaves(&mut out, &mirror, &prefix);
    }
    Ok(out)
}

fn write_leaves(out: &mut String, tree: &Tree, prefix: &Path) {
    for (path, leaf) in tree.leaves() {
        if within(prefix, &path) {
            out.push_str(&format!("{} = {}\n", format_path(&path), leaf));
        }
    }
}

/// Whether `path` is `prefix` or below it. Steps compare by text, since a
/// filter cannot tell a numeric map key from a list position.
fn within(prefix: &[Segment], path: &[Segment]) -> bool {
    prefix.len() <= path.len() && prefix.iter().zip(path).all(|(a, b)| a.same_step(b))
}

/// Usage line for the binary.
pub fn usage() -> String {
    let sections = crate::transmission::schema()
        .sections()
        .collect::<Vec<_>>()
        .join("|");
    format!("usage: hq-render <{sections}> [path] < snapshot.json")
}
