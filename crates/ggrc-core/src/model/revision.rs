use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content;

/// Immutable historical content record
///
/// A revision captures the full attribute set of an object at one point in
/// time. Revisions are never modified once received from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub id: i64,

    /// Model type of the captured object
    #[serde(default)]
    pub resource_type: Option<String>,

    #[serde(default)]
    pub resource_id: Option<i64>,

    /// Captured attributes of the object
    #[serde(default)]
    pub content: Value,
}

impl Revision {
    pub fn new(id: i64, content: Value) -> Self {
        Self {
            id,
            resource_type: None,
            resource_id: None,
            content,
        }
    }

    pub fn with_resource(mut self, resource_type: impl Into<String>, resource_id: i64) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_id = Some(resource_id);
        self
    }

    pub fn display_name(&self) -> Option<String> {
        content::display_name(&self.content)
    }

    /// Type label of the captured object
    ///
    /// Falls back to `resource_type` when the content carries no `type`.
    pub fn display_type(&self) -> Option<String> {
        content::display_type(&self.content).or_else(|| self.resource_type.clone())
    }
}
