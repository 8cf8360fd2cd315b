//! Synchronization driver: pulls snapshots from the daemon into mirrors and
//! pushes their patches back.
//!
//! Fetches complete before anything is merged, so a failed round-trip leaves
//! every mirror exactly as it was.

use serde_json::Value;
use tracing::debug;

use crate::cache::EntityCache;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::mirror::{Mirror, Patch};
use crate::transmission::{SESSION, TORRENT};

/// The daemon side of synchronization.
///
/// Transport failures surface as [`Error::CollaboratorUnavailable`],
/// protocol-level refusals as [`Error::CollaboratorRejected`]. Unknown field
/// names in a field list are ignored. An empty field list means all fields.
pub trait Collaborator {
    fn fetch_session(&mut self, fields: &[&str]) -> Result<Value>;

    /// A list of entity records. `None` asks for every entity.
    fn fetch_entities(&mut self, ids: Option<&[i64]>, fields: &[&str]) -> Result<Value>;

    fn commit_session(&mut self, patch: &Patch) -> Result<()>;

    fn commit_entity(&mut self, patch: &Patch) -> Result<()>;
}

#[derive(Debug)]
pub struct Driver<C> {
    collaborator: C,
    session: Mirror,
    entities: EntityCache,
}

impl<C: Collaborator> Driver<C> {
    pub fn new(collaborator: C, ctx: Context) -> Result<Self> {
        let session = Mirror::new(ctx.clone(), SESSION)?;
        let entities = EntityCache::new(ctx, TORRENT)?;
        Ok(Self { collaborator, session, entities })
    }

    pub fn collaborator(&self) -> &C {
        &self.collaborator
    }

    pub fn collaborator_mut(&mut self) -> &mut C {
        &mut self.collaborator
    }

    // ── Session ──────────────────────────────────────────────────────────

    /// Pull the full session and return its mirror.
    pub fn session(&mut self) -> Result<&mut Mirror> {
        let snapshot = self.collaborator.fetch_session(&[])?;
        self.session.update(&snapshot)?;
        debug!("session refreshed");
        Ok(&mut self.session)
    }

    /// The session mirror as last pulled, without a round-trip.
    pub fn cached_session(&self) -> &Mirror {
        &self.session
    }

    pub fn cached_session_mut(&mut self) -> &mut Mirror {
        &mut self.session
    }

    pub fn push_session(&mut self) -> Result<bool> {
        let collaborator = &mut self.collaborator;
        self.session
            .push_with(&mut |patch: &Patch| collaborator.commit_session(patch))
    }

    // ── Entities ─────────────────────────────────────────────────────────

    /// Pull `fields` of the entities named by `ids` (all when `None`) and
    /// return their mirrors.
    ///
    /// The identifier field is always requested. Entities the daemon reports
    /// beyond `ids` are merged into the cache but not returned.
    pub fn entities(&mut self, ids: Option<&[i64]>, fields: &[&str]) -> Result<Vec<&Mirror>> {
        let identifier = self.entities.identifier().to_string();
        let mut requested = fields.to_vec();
        if !requested.is_empty() && !requested.contains(&identifier.as_str()) {
            requested.insert(0, &identifier);
        }
        let snapshots = self.collaborator.fetch_entities(ids, &requested)?;
        let merged = self.entities.merge_all(&snapshots)?;
        debug!(requested = ids.map(<[i64]>::len), merged = merged.len(), "entities refreshed");
        Ok(merged
            .into_iter()
            .filter(|id| ids.map_or(true, |wanted| wanted.contains(id)))
            .filter_map(|id| self.entities.get(id))
            .collect())
    }

    pub fn entity(&self, id: i64) -> Option<&Mirror> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: i64) -> Option<&mut Mirror> {
        self.entities.get_mut(id)
    }

    pub fn cache(&self) -> &EntityCache {
        &self.entities
    }

    pub fn push_entity(&mut self, id: i64) -> Result<bool> {
        let mirror = self.entities.get_mut(id).ok_or_else(|| Error::NotFound {
            path: format!("{TORRENT}:{id}"),
        })?;
        let collaborator = &mut self.collaborator;
        mirror.push_with(&mut |patch: &Patch| collaborator.commit_entity(patch))
    }

    /// Forget an entity the daemon has deleted.
    pub fn evict(&mut self, id: i64) -> Option<Mirror> {
        self.entities.remove(id)
    }
}
