use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::{GgrcError, Result};
use crate::model::Revision;

/// In-memory cache of revisions keyed by id
///
/// Owned by the application context and lent to snapshot resolution.
/// Revisions are handed out as `Arc` so snapshots can hold on to them
/// without borrowing the cache.
#[derive(Debug, Clone, Default)]
pub struct RevisionCache {
    revisions: HashMap<i64, Arc<Revision>>,
}

impl RevisionCache {
    pub fn new() -> Self {
        Self {
            revisions: HashMap::new(),
        }
    }

    /// Look up a revision by id; `None` on a miss
    pub fn find_in_cache_by_id(&self, id: i64) -> Option<Arc<Revision>> {
        self.revisions.get(&id).cloned()
    }

    /// Insert a revision unless one with the same id is already cached
    ///
    /// Revisions are immutable, so the first copy wins. Returns `true` when
    /// the revision was added.
    pub fn insert(&mut self, revision: Revision) -> bool {
        if let Some(existing) = self.revisions.get(&revision.id) {
            if existing.content != revision.content {
                tracing::warn!(
                    revision_id = revision.id,
                    "ignoring conflicting copy of cached revision"
                );
            }
            return false;
        }
        self.revisions.insert(revision.id, Arc::new(revision));
        true
    }

    /// Insert every revision, returning how many were new
    pub fn extend<I>(&mut self, revisions: I) -> usize
    where
        I: IntoIterator<Item = Revision>,
    {
        revisions
            .into_iter()
            .map(|r| self.insert(r))
            .filter(|added| *added)
            .count()
    }

    /// Ingest a `GET /api/revisions` response body
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` if `revisions_collection.revisions` is
    /// missing, or `Serialization` if an entry does not decode.
    pub fn ingest_collection(&mut self, body: &Value) -> Result<usize> {
        let entries = body
            .get("revisions_collection")
            .and_then(|c| c.get("revisions"))
            .and_then(Value::as_array)
            .ok_or_else(|| GgrcError::MalformedResponse {
                reason: "expected revisions_collection.revisions array".to_string(),
            })?;

        let revisions = entries
            .iter()
            .map(|entry| serde_json::from_value::<Revision>(entry.clone()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(self.extend(revisions))
    }

    pub fn contains(&self, id: i64) -> bool {
        self.revisions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }
}
