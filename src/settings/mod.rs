/*!
 * Settings
 * GC tunables and the store holding the live instance
 */

pub mod store;
pub mod types;

pub use store::{SettingsChange, SettingsStore};
pub use types::{CollectionPriority, GcSettings};
