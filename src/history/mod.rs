/*!
 * History
 * Bounded logs of collection activity and memory usage
 */

pub mod log;
pub mod types;

pub use log::HistoryLog;
pub use types::{GcActivity, MemoryRecord, Sequenced};
