/*!
 * Scheduler Module
 * Background thread triggering threshold-based collections
 */

pub mod task;
pub mod traits;

pub use task::{SchedulerStats, SchedulerTask};
pub use traits::CollectionTarget;
