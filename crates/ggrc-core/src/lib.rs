//! GGRC Core - client-side models and view models
//!
//! This crate provides the pieces of the GGRC client that carry logic:
//! - Snapshot and Revision models, with snapshot labels resolved through a
//!   revision cache
//! - Savable instances with dotted-path attribute access
//! - The deferred save coordinator that coalesces rapid saves of one
//!   instance into single rounds
//! - ACL filtering and issue tracker field helpers
//! - View models for the role editor, people popover, mapper rows and
//!   collapsible panels
//!
//! HTTP transport, templates and routing belong to the embedding
//! application; persistence is reached through [`InstanceBackend`].

pub use ggrc_core_types as core_types;

pub mod cache;
pub mod components;
pub mod config;
pub mod deferred_save;
pub mod errors;
pub mod instance;
pub mod logging_facility;
pub mod model;
pub mod ops;

// Re-export commonly used types
pub use cache::RevisionCache;
pub use components::{CollapsiblePanelBody, CustomRoles, MapperEvent, MapperResultsItem, PeopleListInfo};
pub use config::SaveConfig;
pub use deferred_save::{DeferredSave, Phase, SaveHandle, SaveOutcome};
pub use errors::{ExError, ExErrorKind, GgrcError, Result};
pub use instance::{Instance, InstanceBackend, InstanceEvent, ModelClass};
pub use model::{AccessControlEntry, Revision, Snapshot, Stub};
pub use ops::{filter_acl, ACL_ATTR};
