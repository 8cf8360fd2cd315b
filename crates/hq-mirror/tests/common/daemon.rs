//! In-memory daemon standing in for the RPC transport.

use hq_mirror::{Collaborator, Error, Patch, Result};
use serde_json::{Map, Value};

/// Holds daemon-side state in wire units (kB/s, MiB) and records every
/// request it receives.
#[derive(Debug, Default)]
pub struct StubDaemon {
    pub session: Map<String, Value>,
    pub torrents: Vec<Map<String, Value>>,
    pub session_commits: Vec<Patch>,
    pub entity_commits: Vec<Patch>,
    pub entity_fetches: Vec<(Option<Vec<i64>>, Vec<String>)>,
    /// Refuse the next commit with this message.
    pub reject_next: Option<String>,
    pub offline: bool,
}

impl StubDaemon {
    pub fn new(session: Value, torrents: Vec<Value>) -> Self {
        let as_map = |v: Value| match v {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            session: as_map(session),
            torrents: torrents.into_iter().map(as_map).collect(),
            ..Self::default()
        }
    }

    pub fn torrent_mut(&mut self, id: i64) -> Option<&mut Map<String, Value>> {
        self.torrents.iter_mut().find(|t| t.get("id").and_then(Value::as_i64) == Some(id))
    }

    fn check(&mut self) -> Result<()> {
        if self.offline {
            return Err(Error::CollaboratorUnavailable("connection refused".into()));
        }
        match self.reject_next.take() {
            Some(msg) => Err(Error::CollaboratorRejected(msg)),
            None => Ok(()),
        }
    }
}

fn project(record: &Map<String, Value>, fields: &[&str]) -> Value {
    if fields.is_empty() {
        return Value::Object(record.clone());
    }
    Value::Object(
        fields
            .iter()
            .filter_map(|f| Some((f.to_string(), record.get(*f)?.clone())))
            .collect(),
    )
}

impl Collaborator for StubDaemon {
    fn fetch_session(&mut self, fields: &[&str]) -> Result<Value> {
        if self.offline {
            return Err(Error::CollaboratorUnavailable("connection refused".into()));
        }
        Ok(project(&self.session, fields))
    }

    fn fetch_entities(&mut self, ids: Option<&[i64]>, fields: &[&str]) -> Result<Value> {
        if self.offline {
            return Err(Error::CollaboratorUnavailable("connection refused".into()));
        }
        self.entity_fetches
            .push((ids.map(<[i64]>::to_vec), fields.iter().map(|f| f.to_string()).collect()));
        let wanted = |t: &&Map<String, Value>| match (ids, t.get("id").and_then(Value::as_i64)) {
            (None, _) => true,
            (Some(ids), Some(id)) => ids.contains(&id),
            (Some(_), None) => false,
        };
        Ok(Value::Array(
            self.torrents.iter().filter(wanted).map(|t| project(t, fields)).collect(),
        ))
    }

    fn commit_session(&mut self, patch: &Patch) -> Result<()> {
        self.check()?;
        self.session_commits.push(patch.clone());
        for (k, v) in patch {
            self.session.insert(k.clone(), v.clone());
        }
        Ok(())
    }

    fn commit_entity(&mut self, patch: &Patch) -> Result<()> {
        self.check()?;
        self.entity_commits.push(patch.clone());
        let id = patch.get("id").and_then(Value::as_i64);
        let torrent = id
            .and_then(|id| self.torrent_mut(id))
            .ok_or_else(|| Error::CollaboratorRejected("invalid or missing torrent id".into()))?;
        for (k, v) in patch {
            torrent.insert(k.clone(), v.clone());
        }
        Ok(())
    }
}
