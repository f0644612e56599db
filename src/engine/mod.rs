/*!
 * GC Engine
 *
 * The engine owns the ledger, the algorithm registry, both history logs, the
 * settings store and the background scheduler. It is the only entry point for
 * collections, whether scheduled or on demand, and for command handling.
 */

mod collection;
pub mod command;
mod manager;
mod manager_builder;
mod manager_scheduler;
pub mod stats;

pub use command::{Command, CommandOutcome};
pub use manager::GcManager;
pub use manager_builder::GcManagerBuilder;
pub use stats::{PerformanceSummary, RunStats};
