/*!
 * System Limits and Constants
 *
 * Centralized location for all limits, thresholds, and magic numbers used by
 * the GC manager. Organized by domain.
 */

use std::time::Duration;

// =============================================================================
// MEMORY LEDGER
// =============================================================================

/// Total simulated memory space (10GB)
pub const DEFAULT_TOTAL_MEMORY: usize = 10 * 1024 * 1024 * 1024;

/// Smallest block produced by ledger initialization (1KB)
pub const MIN_BLOCK_SIZE: usize = 1024;

/// Largest block produced by ledger initialization (1MB)
pub const MAX_BLOCK_SIZE: usize = 1024 * 1024;

/// Share of the memory space reported as used right after initialization
pub const INITIAL_USED_RATIO: f64 = 0.42;

/// Cumulative status thresholds for a single uniform draw in [0, 1)
/// FREE below 0.3, ACTIVE below 0.8, FRAGMENTED otherwise
pub const FREE_BLOCK_CUTOFF: f64 = 0.3;
pub const ACTIVE_BLOCK_CUTOFF: f64 = 0.8;

/// Bytes per collected object when estimating object counts
pub const BYTES_PER_OBJECT: usize = 1024;

// =============================================================================
// FRAGMENTATION / PRESSURE LEVELS
// =============================================================================

/// Fragmentation below this is reported as LOW
pub const FRAGMENTATION_MEDIUM_PERCENT: f64 = 10.0;

/// Fragmentation below this (and above MEDIUM) is reported as MEDIUM
pub const FRAGMENTATION_HIGH_PERCENT: f64 = 30.0;

/// Memory pressure thresholds (percentage of total in use)
pub const PRESSURE_MEDIUM_PERCENT: f64 = 60.0;
pub const PRESSURE_HIGH_PERCENT: f64 = 80.0;
pub const PRESSURE_CRITICAL_PERCENT: f64 = 95.0;

// =============================================================================
// HISTORY
// =============================================================================

/// Maximum entries retained per history log
pub const HISTORY_CAPACITY: usize = 1000;

/// Default number of activities returned to a client
pub const DEFAULT_ACTIVITY_LIMIT: usize = 20;

/// Default number of memory records returned to a client
pub const DEFAULT_MEMORY_RECORD_LIMIT: usize = 100;

// =============================================================================
// COLLECTION
// =============================================================================

/// Simulated CPU impact range for a collection run (percent)
pub const MIN_CPU_IMPACT_PERCENT: f32 = 5.0;
pub const MAX_CPU_IMPACT_PERCENT: f32 = 20.0;

// =============================================================================
// SCHEDULER
// =============================================================================

/// Real duration of one scheduler "minute"
/// Tests and demos shrink this to exercise the loop quickly
pub const DEFAULT_TICK_UNIT: Duration = Duration::from_secs(60);

/// Default settings, matching what the dashboard ships with
pub const DEFAULT_MEMORY_THRESHOLD_PERCENT: u8 = 75;
pub const DEFAULT_TIME_INTERVAL_MINUTES: u32 = 30;
pub const DEFAULT_CPU_LIMIT_PERCENT: u8 = 20;

// =============================================================================
// TRANSPORT
// =============================================================================

/// Default WebSocket port
pub const DEFAULT_PORT: u16 = 8080;

/// Dashboard refresh period
pub const DEFAULT_PUSH_INTERVAL: Duration = Duration::from_millis(2000);

/// Buffered events per subscriber before it starts lagging
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
