pub mod acl;
pub mod snapshot;
