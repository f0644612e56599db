/*!
 * Core Types
 * Common types used across the GC manager
 */

/// Size type for memory operations (bytes)
pub type Size = usize;

/// Memory block identifier
pub type BlockId = u32;

/// GC algorithm identifier
pub type AlgorithmId = u32;

/// History record identifier, scoped to a single log
pub type RecordId = u64;
