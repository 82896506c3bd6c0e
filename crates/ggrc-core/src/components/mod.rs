//! View models of the UI components
//!
//! Each view model owns the state its template binds to; templates,
//! styling and routing live in the embedding application.

pub mod collapsible_panel;
pub mod custom_roles;
pub mod mapper_results_item;
pub mod people_list_info;

pub use collapsible_panel::CollapsiblePanelBody;
pub use custom_roles::CustomRoles;
pub use mapper_results_item::{MapperEvent, MapperResultsItem};
pub use people_list_info::PeopleListInfo;
