use std::sync::Arc;

use crate::errors::ExError;
use crate::instance::Instance;

/// Popover listing the people assigned to an object
///
/// The instance is refreshed from the server the first time the popover is
/// opened; attribute editing is disabled while that refresh runs.
#[derive(Debug)]
pub struct PeopleListInfo {
    pub instance: Arc<Instance>,
    pub is_open: bool,
    pub is_hidden: bool,
    pub is_refreshed: bool,
    pub is_attributes_disabled: bool,
}

impl PeopleListInfo {
    pub fn new(instance: Arc<Instance>) -> Self {
        Self {
            instance,
            is_open: false,
            is_hidden: false,
            is_refreshed: false,
            is_attributes_disabled: false,
        }
    }

    /// Refresh the instance once per popover lifetime
    ///
    /// A failed refresh is not retried; attributes are re-enabled either way.
    ///
    /// # Errors
    ///
    /// Returns the refresh error so the caller can notify the user.
    pub async fn refresh_instance(&mut self) -> Result<(), ExError> {
        if self.is_refreshed {
            return Ok(());
        }

        self.is_attributes_disabled = true;
        self.is_refreshed = true;
        let result = self.instance.refresh().await;
        self.is_attributes_disabled = false;
        result
    }

    /// Handle a click on the popover trigger
    ///
    /// Clicks that carry no visibility flag are ignored.
    ///
    /// # Errors
    ///
    /// See [`PeopleListInfo::refresh_instance`].
    pub async fn on_click(&mut self, hidden: Option<bool>) -> Result<(), ExError> {
        let Some(hidden) = hidden else {
            return Ok(());
        };
        self.is_hidden = hidden;
        self.is_open = true;
        self.refresh_instance().await
    }
}
