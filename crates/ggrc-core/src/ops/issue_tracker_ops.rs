//! Issue tracker integration field helpers

use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::Result;
use crate::instance::Instance;
use crate::model::content::is_truthy;

/// One option of the enable/disable selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnableOption {
    pub value: bool,
    pub title: &'static str,
}

/// Fixed choices offered by the issue tracker form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IssueTrackerStaticFields {
    pub issue_tracker_enable_options: [EnableOption; 2],
    pub issue_tracker_priorities: [&'static str; 5],
    pub issue_tracker_severities: [&'static str; 5],
}

impl IssueTrackerStaticFields {
    pub const FIELDS: IssueTrackerStaticFields = IssueTrackerStaticFields {
        issue_tracker_enable_options: [
            EnableOption {
                value: true,
                title: "On",
            },
            EnableOption {
                value: false,
                title: "Off",
            },
        ],
        issue_tracker_priorities: ["P0", "P1", "P2", "P3", "P4"],
        issue_tracker_severities: ["S0", "S1", "S2", "S3", "S4"],
    };
}

/// Whether the instance already has issue tracker data from the server
///
/// The server fills `component_id` once the tracker record exists.
pub fn is_issue_tracker_enabled(instance: &Instance) -> bool {
    instance
        .get("issue_tracker.component_id")
        .is_some_and(|v| is_truthy(&v))
}

/// Seed issue tracker data from defaults when the server sent none
///
/// Always records whether the issue tracker controls may be shown.
///
/// # Errors
///
/// Fails only if the attributes cannot be written.
pub fn init_issue_tracker_object(
    instance: &Instance,
    default_values: Value,
    can_use_issue_tracker: bool,
) -> Result<()> {
    if !is_issue_tracker_enabled(instance) {
        instance.set("issue_tracker", default_values)?;
    }
    instance.set("can_use_issue_tracker", Value::Bool(can_use_issue_tracker))
}

/// Clear stale warnings left over from the previous save
///
/// The merge of a save response keeps old `_warnings`, so they are reset
/// before the next save when present.
///
/// # Errors
///
/// Fails only if the attribute cannot be written.
pub fn clean_up_warnings(instance: &Instance) -> Result<()> {
    let has_warnings = instance
        .get("issue_tracker._warnings")
        .is_some_and(|v| is_truthy(&v));
    if has_warnings {
        instance.set("issue_tracker._warnings", json!([]))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExError;
    use crate::instance::{InstanceBackend, ModelClass};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NoBackend;

    #[async_trait]
    impl InstanceBackend for NoBackend {
        async fn save(&self, _: &str, attrs: Value) -> std::result::Result<Value, ExError> {
            Ok(attrs)
        }
        async fn refresh(&self, _: &str, _: Option<i64>) -> std::result::Result<Value, ExError> {
            Ok(json!({}))
        }
    }

    fn issue(attrs: Value) -> Instance {
        Instance::new(ModelClass::new("Issue"), attrs, Arc::new(NoBackend))
    }

    #[test]
    fn test_enabled_requires_component_id() {
        assert!(!is_issue_tracker_enabled(&issue(json!({}))));
        assert!(!is_issue_tracker_enabled(&issue(
            json!({"issue_tracker": {"component_id": ""}})
        )));
        assert!(is_issue_tracker_enabled(&issue(
            json!({"issue_tracker": {"component_id": "1234"}})
        )));
    }

    #[test]
    fn test_init_uses_defaults_when_not_enabled() {
        let inst = issue(json!({"issue_tracker": {}}));
        init_issue_tracker_object(&inst, json!({"hotlist_id": "7", "enabled": false}), true)
            .unwrap();

        assert_eq!(
            inst.get("issue_tracker"),
            Some(json!({"hotlist_id": "7", "enabled": false}))
        );
        assert_eq!(inst.get("can_use_issue_tracker"), Some(json!(true)));
    }

    #[test]
    fn test_init_keeps_server_data() {
        let tracker = json!({"component_id": "55", "enabled": true});
        let inst = issue(json!({"issue_tracker": tracker.clone()}));
        init_issue_tracker_object(&inst, json!({}), false).unwrap();

        assert_eq!(inst.get("issue_tracker"), Some(tracker));
        assert_eq!(inst.get("can_use_issue_tracker"), Some(json!(false)));
    }

    #[test]
    fn test_clean_up_warnings() {
        let inst = issue(json!({"issue_tracker": {"_warnings": ["Ticket is closed"]}}));
        clean_up_warnings(&inst).unwrap();
        assert_eq!(inst.get("issue_tracker._warnings"), Some(json!([])));

        let untouched = issue(json!({"issue_tracker": {}}));
        clean_up_warnings(&untouched).unwrap();
        assert_eq!(untouched.get("issue_tracker._warnings"), None);
    }

    #[test]
    fn test_static_fields() {
        let fields = IssueTrackerStaticFields::FIELDS;
        assert_eq!(fields.issue_tracker_priorities[0], "P0");
        assert_eq!(fields.issue_tracker_severities.len(), 5);
        assert!(fields.issue_tracker_enable_options[0].value);
        assert_eq!(fields.issue_tracker_enable_options[1].title, "Off");
    }
}
