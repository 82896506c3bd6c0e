pub mod acl_ops;
pub mod issue_tracker_ops;

pub use acl_ops::{filter_acl, ACL_ATTR};
pub use issue_tracker_ops::{
    clean_up_warnings, init_issue_tracker_object, is_issue_tracker_enabled, IssueTrackerStaticFields,
};
