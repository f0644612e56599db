/*!
 * Memory Module
 * Simulated memory space: blocks, aggregates and snapshots
 */

pub mod ledger;
pub mod types;

// Re-export for convenience
pub use ledger::BlockLedger;
pub use types::*;
