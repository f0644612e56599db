/*!
 * GC Manager Library
 * Simulated memory manager with pluggable garbage collection strategies
 */

pub mod api;
pub mod config;
pub mod core;
pub mod engine;
pub mod gc;
pub mod history;
pub mod memory;
pub mod monitoring;
pub mod scheduler;
pub mod settings;

// Re-exports
pub use api::{ClientMessage, DashboardState, GcServer, ServerMessage};
pub use config::ServerConfig;
pub use core::errors::{GcError, GcResult};
pub use core::random::{RandomSource, SequenceRandom, StdRandom};
pub use engine::{Command, CommandOutcome, GcManager, GcManagerBuilder, PerformanceSummary, RunStats};
pub use gc::{AlgorithmInfo, AlgorithmKind, AlgorithmRegistry, CollectionStrategy, ProbabilisticCollector};
pub use history::{GcActivity, HistoryLog, MemoryRecord};
pub use memory::{BlockLedger, BlockStatus, MemoryBlock, MemorySnapshot};
pub use monitoring::{init_tracing, GcEvent};
pub use scheduler::{CollectionTarget, SchedulerTask};
pub use settings::{CollectionPriority, GcSettings};
