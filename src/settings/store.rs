/*!
 * Settings Store
 * Single live settings instance with atomic whole-value replacement
 */

use super::types::GcSettings;
use crate::core::errors::GcResult;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::info;

/// Result of a settings replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsChange {
    pub previous: GcSettings,
    pub current: GcSettings,
}

impl SettingsChange {
    /// New value of `backgroundCollection` if it flipped, None otherwise
    pub fn background_toggled(&self) -> Option<bool> {
        (self.previous.background_collection != self.current.background_collection)
            .then_some(self.current.background_collection)
    }
}

/// Settings store
///
/// Readers never block: `get()` loads the current `Arc` and copies it out.
pub struct SettingsStore {
    current: ArcSwap<GcSettings>,
}

impl SettingsStore {
    pub fn new(settings: GcSettings) -> Self {
        Self {
            current: ArcSwap::from_pointee(settings),
        }
    }

    /// Consistent snapshot of the current settings
    pub fn get(&self) -> GcSettings {
        **self.current.load()
    }

    /// Validate and swap in `settings`
    ///
    /// Invalid settings are rejected and the current instance is kept.
    pub fn replace(&self, settings: GcSettings) -> GcResult<SettingsChange> {
        settings.validate()?;
        let previous = self.current.swap(Arc::new(settings));
        info!(?settings, "GC settings replaced");
        Ok(SettingsChange {
            previous: *previous,
            current: settings,
        })
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(GcSettings::default())
    }
}
