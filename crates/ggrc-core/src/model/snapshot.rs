use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::revision::Revision;
use super::stub::Stub;
use crate::cache::RevisionCache;
use crate::core_types::schema::EVENT_MISSING_REVISION;
use crate::errors::{GgrcError, Result};

/// Snapshot - a frozen, point-in-time copy of another object
///
/// A snapshot joins its `parent` (usually an Audit) with the `Revision` that
/// captured the child object. All display data comes from the revision; the
/// snapshot itself only knows identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: i64,

    #[serde(default)]
    pub revision_id: Option<i64>,

    /// Resolved revision, shared with the cache
    #[serde(skip)]
    pub revision: Option<Arc<Revision>>,

    #[serde(default)]
    pub parent: Option<Stub>,

    /// Type of the object the snapshot was taken from
    #[serde(default)]
    pub child_type: Option<String>,

    #[serde(default)]
    pub child_id: Option<i64>,

    #[serde(default)]
    pub context: Option<Stub>,

    #[serde(default)]
    pub modified_by: Option<Stub>,
}

impl Snapshot {
    pub const MODEL_SINGULAR: &'static str = "Snapshot";
    pub const ROOT_OBJECT: &'static str = "snapshot";
    pub const ROOT_COLLECTION: &'static str = "snapshots";
    pub const FIND_ALL_PATH: &'static str = "/api/snapshots";

    pub fn new(id: i64, revision_id: Option<i64>) -> Self {
        Self {
            id,
            revision_id,
            revision: None,
            parent: None,
            child_type: None,
            child_id: None,
            context: None,
            modified_by: None,
        }
    }

    pub fn with_parent(mut self, parent: Stub) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_child(mut self, child_type: impl Into<String>, child_id: i64) -> Self {
        self.child_type = Some(child_type.into());
        self.child_id = Some(child_id);
        self
    }

    /// `PUT` target for this snapshot
    pub fn update_path(&self) -> String {
        format!("{}/{}", Self::FIND_ALL_PATH, self.id)
    }

    /// Re-resolve `revision` from the cache by `revision_id`
    ///
    /// A cache miss (or an absent `revision_id`) leaves the snapshot without a
    /// revision; no error is raised. Returns whether a revision is resolved
    /// afterwards.
    pub fn reinit(&mut self, cache: &RevisionCache) -> bool {
        self.revision = self.revision_id.and_then(|id| cache.find_in_cache_by_id(id));
        if self.revision.is_none() {
            tracing::debug!(
                snapshot_id = self.id,
                revision_id = ?self.revision_id,
                "revision not in cache"
            );
        }
        self.revision.is_some()
    }

    /// Captured content of the resolved revision
    ///
    /// # Errors
    ///
    /// Returns `RevisionNotCached` when `reinit` has not resolved a revision.
    pub fn require_revision(&self) -> Result<&Revision> {
        self.revision
            .as_deref()
            .ok_or(GgrcError::RevisionNotCached {
                snapshot_id: self.id,
                revision_id: self.revision_id,
            })
    }

    pub fn content(&self) -> Option<&Value> {
        self.revision.as_deref().map(|r| &r.content)
    }

    /// Display name of the captured object
    ///
    /// Without a resolved revision this logs a diagnostic and returns `None`.
    pub fn display_name(&self) -> Option<String> {
        self.with_revision("display_name", Revision::display_name)
    }

    /// Type label of the captured object; same contract as `display_name`
    pub fn display_type(&self) -> Option<String> {
        self.with_revision("display_type", Revision::display_type)
    }

    fn with_revision<F>(&self, op: &'static str, f: F) -> Option<String>
    where
        F: FnOnce(&Revision) -> Option<String>,
    {
        match self.revision.as_deref() {
            Some(revision) => f(revision),
            None => {
                // Unresolved revisions are reported in the log only; callers
                // that need a hard failure use `require_revision`
                tracing::error!(
                    component = module_path!(),
                    op,
                    event = EVENT_MISSING_REVISION,
                    snapshot_id = self.id,
                    revision_id = ?self.revision_id,
                    "Revision is not defined for snapshot with ID: {}!",
                    self.id
                );
                None
            }
        }
    }
}

/// Parse a `GET /api/snapshots` response body
///
/// Revisions embedded in the snapshots are added to `cache` (first copy
/// wins) and each snapshot is reinitialised against it.
///
/// # Errors
///
/// Returns `MalformedResponse` if the `snapshots_collection.snapshots` array
/// is missing, or `Serialization` if an entry does not decode.
pub fn parse_snapshots_collection(body: &Value, cache: &mut RevisionCache) -> Result<Vec<Snapshot>> {
    let entries = body
        .get("snapshots_collection")
        .and_then(|c| c.get(Snapshot::ROOT_COLLECTION))
        .and_then(Value::as_array)
        .ok_or_else(|| GgrcError::MalformedResponse {
            reason: "expected snapshots_collection.snapshots array".to_string(),
        })?;

    let mut snapshots = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(embedded) = entry.get("revision").filter(|r| r.get("id").is_some()) {
            let revision: Revision = serde_json::from_value(embedded.clone())?;
            cache.insert(revision);
        }
        let mut snapshot: Snapshot = serde_json::from_value(entry.clone())?;
        if snapshot.revision_id.is_none() {
            snapshot.revision_id = entry
                .get("revision")
                .and_then(|r| r.get("id"))
                .and_then(Value::as_i64);
        }
        snapshot.reinit(cache);
        snapshots.push(snapshot);
    }
    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cache_with_policy() -> RevisionCache {
        let mut cache = RevisionCache::new();
        cache.insert(Revision::new(10, json!({"name": "Policy A", "type": "Policy"})));
        cache
    }

    #[test]
    fn test_unresolved_snapshot_has_no_labels() {
        let snapshot = Snapshot::new(1, Some(10));
        assert_eq!(snapshot.display_name(), None);
        assert_eq!(snapshot.display_type(), None);
    }

    #[test]
    fn test_reinit_resolves_from_cache() {
        let cache = cache_with_policy();
        let mut snapshot = Snapshot::new(1, Some(10));

        assert!(snapshot.reinit(&cache));
        assert_eq!(snapshot.display_name().as_deref(), Some("Policy A"));
        assert_eq!(snapshot.display_type().as_deref(), Some("Policy"));
    }

    #[test]
    fn test_reinit_miss_clears_stale_revision() {
        let cache = cache_with_policy();
        let mut snapshot = Snapshot::new(1, Some(10));
        snapshot.reinit(&cache);

        snapshot.revision_id = Some(99);
        assert!(!snapshot.reinit(&cache));
        assert!(snapshot.revision.is_none());
    }

    #[test]
    fn test_require_revision_reports_ids() {
        let snapshot = Snapshot::new(4, None);
        assert_eq!(
            snapshot.require_revision(),
            Err(GgrcError::RevisionNotCached {
                snapshot_id: 4,
                revision_id: None
            })
        );
    }

    #[test]
    fn test_update_path() {
        assert_eq!(Snapshot::new(12, None).update_path(), "/api/snapshots/12");
    }

    #[test]
    fn test_parse_collection_ingests_embedded_revisions() {
        let mut cache = RevisionCache::new();
        let body = json!({
            "snapshots_collection": {
                "snapshots": [
                    {
                        "id": 1,
                        "parent": {"id": 5, "type": "Audit"},
                        "child_type": "Control",
                        "child_id": 8,
                        "revision": {"id": 20, "content": {"title": "Ctl 8", "type": "Control"}}
                    },
                    {"id": 2, "revision_id": 21}
                ]
            }
        });

        let snapshots = parse_snapshots_collection(&body, &mut cache).unwrap();

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].revision_id, Some(20));
        assert_eq!(snapshots[0].display_name().as_deref(), Some("Ctl 8"));
        assert_eq!(snapshots[0].parent, Some(Stub::new(5, "Audit")));
        assert!(snapshots[1].revision.is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_parse_collection_rejects_wrong_envelope() {
        let mut cache = RevisionCache::new();
        let err = parse_snapshots_collection(&json!({"snapshots": []}), &mut cache).unwrap_err();
        assert!(matches!(err, GgrcError::MalformedResponse { .. }));
    }
}
