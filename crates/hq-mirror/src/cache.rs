//! Per-entity mirrors keyed by their identifier.

use hq_path::Segment;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::mirror::Mirror;
use crate::node::check_value;

/// Mirrors of every entity of one section the daemon has reported.
///
/// Fresh snapshots are matched to cached mirrors by identifier so that they
/// merge in place instead of creating duplicates.
#[derive(Debug)]
pub struct EntityCache {
    ctx: Context,
    section: String,
    identifier: String,
    entities: IndexMap<i64, Mirror>,
}

impl EntityCache {
    pub fn new(ctx: Context, section: &str) -> Result<Self> {
        if ctx.schema().section(section).is_none() {
            return Err(Error::SchemaMissing { path: section.to_string() });
        }
        let identifier = ctx
            .schema()
            .identifier(section)
            .ok_or_else(|| Error::SchemaMissing { path: format!("{section}:<identifier>") })?
            .to_string();
        Ok(Self { ctx, section: section.to_string(), identifier, entities: IndexMap::new() })
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Name of the identifier field.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Merge one entity snapshot, returning its identifier.
    pub fn merge(&mut self, snapshot: &Value) -> Result<i64> {
        let id = self.check(snapshot)?;
        self.absorb(id, snapshot)?;
        Ok(id)
    }

    /// Merge a list of entity snapshots, returning their identifiers in order.
    ///
    /// Every snapshot is checked before any is merged: one bad entry leaves
    /// the whole cache untouched.
    pub fn merge_all(&mut self, snapshots: &Value) -> Result<Vec<i64>> {
        let items = match snapshots {
            Value::Array(items) => items.as_slice(),
            Value::Null => &[][..],
            _ => return Err(Error::ShapeMismatch { path: self.section.clone(), expected: "list" }),
        };
        let ids = items.iter().map(|item| self.check(item)).collect::<Result<Vec<_>>>()?;
        for (id, item) in ids.iter().zip(items) {
            self.absorb(*id, item)?;
        }
        Ok(ids)
    }

    /// The identifier of `snapshot`, once it is known to fit the schema.
    fn check(&self, snapshot: &Value) -> Result<i64> {
        let id = snapshot
            .get(&self.identifier)
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::ShapeMismatch {
                path: format!("{}:{}", self.section, self.identifier),
                expected: "integer identifier",
            })?;
        let root = [Segment::from(self.section.as_str())];
        let spec = self.ctx.schema().resolve_path(&root)?;
        check_value(&self.ctx, &root, spec, snapshot)?;
        Ok(id)
    }

    fn absorb(&mut self, id: i64, snapshot: &Value) -> Result<()> {
        match self.entities.get_mut(&id) {
            Some(mirror) => mirror.update(snapshot),
            None => {
                let mirror = Mirror::from_snapshot(self.ctx.clone(), &self.section, snapshot)?;
                debug!(section = %self.section, id, "cached new entity");
                self.entities.insert(id, mirror);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<&Mirror> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut Mirror> {
        self.entities.get_mut(&id)
    }

    /// Drop the mirror of an entity the daemon no longer has.
    pub fn remove(&mut self, id: i64) -> Option<Mirror> {
        let removed = self.entities.shift_remove(&id);
        if removed.is_some() {
            debug!(section = %self.section, id, "evicted entity");
        }
        removed
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.entities.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &Mirror)> + '_ {
        self.entities.iter().map(|(id, mirror)| (*id, mirror))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hq_format::FormatConfig;
    use serde_json::json;

    fn cache() -> EntityCache {
        EntityCache::new(Context::transmission(FormatConfig::default()), "torrent").unwrap()
    }

    #[test]
    fn test_merge_matches_by_identifier() {
        let mut c = cache();
        c.merge(&json!({"id": 1, "name": "a", "peer-limit": 5})).unwrap();
        c.get_mut(1).unwrap().set("peer-limit", 9).unwrap();
        c.merge(&json!({"id": 1, "name": "b"})).unwrap();
        assert_eq!(c.len(), 1);
        let m = c.get(1).unwrap();
        assert_eq!(m.leaf("name").unwrap().value(), &json!("b"));
        assert!(m.leaf("peer-limit").unwrap().is_dirty());
    }

    #[test]
    fn test_merge_all_keeps_order() {
        let mut c = cache();
        let ids = c.merge_all(&json!([{"id": 3}, {"id": 1}])).unwrap();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(c.ids().collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn test_snapshot_without_identifier_is_rejected() {
        let mut c = cache();
        assert_eq!(
            c.merge(&json!({"name": "orphan"})),
            Err(Error::ShapeMismatch { path: "torrent:id".into(), expected: "integer identifier" })
        );
        assert!(c.is_empty());
    }

    #[test]
    fn test_rejected_batch_changes_nothing() {
        let mut c = cache();
        c.merge(&json!({"id": 1, "name": "a", "peer-limit": 5})).unwrap();
        c.get_mut(1).unwrap().set("peer-limit", 9).unwrap();

        let err = c
            .merge_all(&json!([{"id": 1, "peer-limit": 6}, {"id": 2, "bogus": 1}]))
            .unwrap_err();
        assert_eq!(err, Error::SchemaMissing { path: "torrent:bogus".into() });
        assert!(c.merge_all(&json!([{"id": 3}, {"name": "orphan"}])).is_err());
        assert!(c.merge(&json!({"id": 1, "files": {"0": {}}})).is_err());

        assert_eq!(c.ids().collect::<Vec<_>>(), vec![1]);
        let leaf = c.get(1).unwrap().leaf("peer-limit").unwrap();
        assert_eq!(leaf.value(), &json!(9));
        assert!(leaf.is_dirty());
    }

    #[test]
    fn test_remove_evicts() {
        let mut c = cache();
        c.merge_all(&json!([{"id": 1}, {"id": 2}])).unwrap();
        assert!(c.remove(1).is_some());
        assert!(c.remove(1).is_none());
        assert_eq!(c.ids().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_section_without_identifier() {
        let ctx = Context::transmission(FormatConfig::default());
        assert!(EntityCache::new(ctx.clone(), "session").is_err());
        assert_eq!(
            EntityCache::new(ctx, "peer").unwrap_err(),
            Error::SchemaMissing { path: "peer".into() }
        );
    }
}
