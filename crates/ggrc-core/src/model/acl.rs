use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::stub::Stub;

/// Access control list entry: assigns a person to a custom role
///
/// Entries created in the UI have no `id` until the server has persisted
/// them; such entries are incomplete and must not be sent back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessControlEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Role the entry belongs to (`groupId` in the role editors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac_role_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Stub>,

    /// Any further server fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccessControlEntry {
    pub fn new(id: Option<i64>, ac_role_id: Option<i64>, person: Option<Stub>) -> Self {
        Self {
            id,
            ac_role_id,
            person,
            extra: Map::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.id.is_some()
    }
}

/// Keep only complete entries, preserving order
pub fn complete_entries(entries: Vec<AccessControlEntry>) -> Vec<AccessControlEntry> {
    entries.into_iter().filter(AccessControlEntry::is_complete).collect()
}

/// Untyped form of [`AccessControlEntry::is_complete`] for raw attribute
/// values: an entry is complete when it is an object with a non-null `id`
pub fn has_defined_id(entry: &Value) -> bool {
    entry.get("id").is_some_and(|id| !id.is_null())
}
