use serde_json::{json, Value};

use crate::model::content;
use crate::model::Snapshot;

static NO_CONTENT: Value = Value::Null;

/// Event raised by a mapper results row for its parent list
#[derive(Debug, Clone, PartialEq)]
pub enum MapperEvent {
    ShowRelatedAssessments { instance: Value },
}

/// One row of the unified mapper's search results
///
/// `item_data` is the raw search hit. Snapshot hits carry their revision,
/// whose captured content is what the row displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapperResultsItem {
    pub item_data: Value,
    pub search_only: bool,
    pub draw_related_assessments: bool,
    pub selected_columns: Vec<String>,
    pub show_details: bool,
}

impl MapperResultsItem {
    pub fn new(item_data: Value) -> Self {
        Self {
            item_data,
            ..Self::default()
        }
    }

    /// Row for a resolved snapshot
    ///
    /// The snapshot's revision (if any) is embedded so the row shows the
    /// captured content.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut item = json!({
            "id": snapshot.id,
            "type": Snapshot::MODEL_SINGULAR,
            "child_type": snapshot.child_type,
            "child_id": snapshot.child_id,
        });
        if let Some(revision) = snapshot.revision.as_deref() {
            item["revision"] = json!({"id": revision.id, "content": revision.content});
        }
        Self::new(item)
    }

    /// Object whose attributes the row shows
    pub fn display_item(&self) -> &Value {
        match self.item_data.get("revision") {
            Some(revision) if content::is_truthy(revision) => {
                revision.get("content").unwrap_or(&NO_CONTENT)
            }
            _ => &self.item_data,
        }
    }

    pub fn title(&self) -> Option<String> {
        content::item_title(self.display_item())
    }

    pub fn is_snapshot(&self) -> bool {
        content::text_field(&self.item_data, "type") == Some(Snapshot::MODEL_SINGULAR)
    }

    /// Model type of the object the row stands for
    pub fn object_type(&self) -> Option<&str> {
        let key = if self.is_snapshot() { "child_type" } else { "type" };
        content::text_field(&self.item_data, key)
    }

    pub fn toggle_icon_cls(&self) -> &'static str {
        if self.show_details {
            "fa-caret-down"
        } else {
            "fa-caret-right"
        }
    }

    pub fn toggle_details(&mut self) {
        self.show_details = !self.show_details;
    }

    pub fn show_related_assessments(&self) -> MapperEvent {
        MapperEvent::ShowRelatedAssessments {
            instance: self.display_item().clone(),
        }
    }
}
