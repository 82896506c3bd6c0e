//! Client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for deferred save coordinators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    /// How long a round collects pushes before saving, in milliseconds
    pub delay_ms: u64,
}

impl SaveConfig {
    pub fn with_delay_ms(delay_ms: u64) -> Self {
        Self { delay_ms }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
