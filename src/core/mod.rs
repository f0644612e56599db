/*!
 * Core Module
 * Shared types, limits, errors and randomness used across the GC manager
 */

pub mod errors;
pub mod limits;
pub mod random;
pub mod serde;
pub mod types;

// Re-export commonly used items
pub use errors::{GcError, GcResult};
pub use random::{RandomSource, SequenceRandom, SharedRandom, StdRandom};
pub use types::*;
