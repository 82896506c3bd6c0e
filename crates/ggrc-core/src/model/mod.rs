pub mod acl;
pub mod content;
pub mod revision;
pub mod snapshot;
pub mod stub;

pub use acl::AccessControlEntry;
pub use revision::Revision;
pub use snapshot::Snapshot;
pub use stub::Stub;
