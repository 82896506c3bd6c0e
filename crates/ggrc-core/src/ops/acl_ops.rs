use serde_json::Value;

use crate::errors::Result;
use crate::instance::Instance;
use crate::model::acl::has_defined_id;

/// Attribute holding an instance's access control list
pub const ACL_ATTR: &str = "access_control_list";

/// Drop access control entries that have no `id` yet
///
/// Replaces the instance's ACL with the subsequence of entries carrying a
/// defined `id`, in their original order. Instances without a list are left
/// untouched. Returns how many entries were removed.
///
/// # Errors
///
/// Only fails if the attribute cannot be written back.
pub fn filter_acl(instance: &Instance) -> Result<usize> {
    let Some(Value::Array(entries)) = instance.get(ACL_ATTR) else {
        return Ok(0);
    };

    let before = entries.len();
    let kept: Vec<Value> = entries.into_iter().filter(has_defined_id).collect();
    let removed = before - kept.len();

    instance.set(ACL_ATTR, Value::Array(kept))?;
    if removed > 0 {
        tracing::debug!(
            model_type = %instance.class().name,
            removed,
            "dropped incomplete access control entries"
        );
    }
    Ok(removed)
}
