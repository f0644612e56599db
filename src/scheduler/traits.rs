/*!
 * Scheduler Traits
 * What the background scheduler needs from the component it drives
 */

use crate::core::types::Size;
use crate::settings::GcSettings;

/// Collection target driven by the scheduler
///
/// The engine implements this; tests can drive the scheduler with a fake.
pub trait CollectionTarget: Send + Sync + 'static {
    /// Current settings snapshot
    fn settings(&self) -> GcSettings;

    /// Percentage of the memory space in use
    fn used_percent(&self) -> f64;

    /// Run one collection through the regular entry point
    fn collect(&self) -> Size;
}
