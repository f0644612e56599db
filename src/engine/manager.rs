/*!
 * GC Manager
 * The engine handle: owns all state and serves commands and queries
 */

use super::command::{Command, CommandOutcome};
use super::manager_builder::GcManagerBuilder;
use super::stats::{PerformanceSummary, RunStats};
use crate::core::errors::GcResult;
use crate::core::limits::HISTORY_CAPACITY;
use crate::core::random::SharedRandom;
use crate::core::types::{AlgorithmId, Size};
use crate::gc::{AlgorithmInfo, AlgorithmRegistry};
use crate::history::{GcActivity, HistoryLog, MemoryRecord};
use crate::memory::{BlockCounts, BlockLedger, MemoryBlock, MemorySnapshot};
use crate::monitoring::GcEvent;
use crate::scheduler::SchedulerTask;
use crate::settings::{GcSettings, SettingsChange, SettingsStore};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{info, trace};

/// State shared between the manager handle and the scheduler thread
pub(crate) struct EngineState {
    pub(super) ledger: Mutex<BlockLedger>,
    pub(super) registry: RwLock<AlgorithmRegistry>,
    pub(super) activities: HistoryLog<GcActivity>,
    pub(super) memory_records: HistoryLog<MemoryRecord>,
    pub(super) settings: SettingsStore,
    pub(super) stats: Mutex<RunStats>,
    pub(super) rng: SharedRandom,
    pub(super) events: broadcast::Sender<GcEvent>,
}

impl EngineState {
    pub(super) fn emit(&self, event: GcEvent) {
        // No subscribers is fine
        if self.events.send(event).is_err() {
            trace!("Event dropped, no subscribers");
        }
    }
}

/// GC manager
///
/// One explicitly constructed instance per process; share it behind an `Arc`.
/// Dropping the manager stops and joins the background scheduler before any
/// other state is released.
pub struct GcManager {
    pub(super) state: Arc<EngineState>,
    pub(super) scheduler: Mutex<Option<SchedulerTask>>,
    pub(super) tick_unit: Duration,
}

impl GcManager {
    /// Manager with a random 10 GiB ledger, default algorithms and settings
    pub fn new() -> GcResult<Self> {
        Self::builder().build()
    }

    pub fn builder() -> GcManagerBuilder {
        GcManagerBuilder::new()
    }

    // ---- Ledger operations ----

    /// Run one collection; see [`GcManager::handle_command`] for the command form
    pub fn run_collection(&self) -> Size {
        self.state.run_collection()
    }

    pub fn optimize(&self) -> Size {
        self.state.optimize()
    }

    pub fn defragment(&self) -> Size {
        self.state.defragment()
    }

    // ---- Queries ----

    pub fn snapshot(&self) -> MemorySnapshot {
        self.state.ledger.lock().snapshot()
    }

    pub fn all_blocks(&self) -> Vec<MemoryBlock> {
        self.state.ledger.lock().blocks().to_vec()
    }

    pub fn block_counts(&self) -> BlockCounts {
        self.state.ledger.lock().counts()
    }

    pub fn list_algorithms(&self) -> Vec<AlgorithmInfo> {
        self.state.registry.read().list()
    }

    pub fn get_algorithm(&self, id: AlgorithmId) -> GcResult<AlgorithmInfo> {
        self.state.registry.read().get(id)
    }

    /// Set an algorithm's enabled flag and performance score
    pub fn update_algorithm(
        &self,
        id: AlgorithmId,
        enabled: bool,
        performance_score: i32,
    ) -> GcResult<AlgorithmInfo> {
        let algorithm = self
            .state
            .registry
            .write()
            .update(id, enabled, performance_score)?;

        info!(id, enabled, performance_score, "Algorithm updated");
        self.state.emit(GcEvent::AlgorithmUpdated {
            algorithm: algorithm.clone(),
        });
        Ok(algorithm)
    }

    /// Up to `limit` activities, most recent first
    pub fn recent_activities(&self, limit: usize) -> Vec<GcActivity> {
        self.state.activities.recent(limit)
    }

    /// Up to `limit` memory records, most recent first
    pub fn recent_memory_records(&self, limit: usize) -> Vec<MemoryRecord> {
        self.state.memory_records.recent(limit)
    }

    pub fn settings(&self) -> GcSettings {
        self.state.settings.get()
    }

    /// Replace the settings
    ///
    /// A change of `backgroundCollection` starts or stops the scheduler. Any
    /// other change wakes a running scheduler so it re-evaluates immediately.
    ///
    /// The scheduler slot stays locked from the swap to the start/stop, so
    /// concurrent updates apply their transitions in swap order and the
    /// scheduler always ends up matching the stored flag.
    pub fn update_settings(&self, settings: GcSettings) -> GcResult<SettingsChange> {
        let mut slot = self.scheduler.lock();
        let change = self.state.settings.replace(settings)?;

        match change.background_toggled() {
            Some(true) => {
                self.start_in(&mut slot)?;
            }
            Some(false) => {
                self.stop_in(&mut slot);
            }
            None => {
                if let Some(task) = slot.as_ref() {
                    task.wake();
                }
            }
        }

        self.state.emit(GcEvent::SettingsUpdated {
            settings: change.current,
        });
        Ok(change)
    }

    pub fn stats(&self) -> RunStats {
        *self.state.stats.lock()
    }

    /// Performance over the retained history
    pub fn performance(&self) -> PerformanceSummary {
        let current_used = self.state.ledger.lock().used_bytes();
        let activities = self.state.activities.recent(HISTORY_CAPACITY);
        let records = self.state.memory_records.recent(HISTORY_CAPACITY);
        PerformanceSummary::from_history(&activities, &records, current_used)
    }

    /// Receiver for engine events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<GcEvent> {
        self.state.events.subscribe()
    }

    // ---- Commands ----

    /// Execute a parsed control command
    pub fn handle_command(&self, command: Command) -> GcResult<CommandOutcome> {
        info!(command = command.name(), "Handling command");

        let outcome = match command {
            Command::RunGc => CommandOutcome::Collected {
                reclaimed_bytes: self.run_collection(),
            },
            Command::OptimizeMemory => CommandOutcome::Optimized {
                reclaimed_bytes: self.optimize(),
            },
            Command::DefragmentMemory => CommandOutcome::Defragmented {
                reclaimed_bytes: self.defragment(),
            },
            Command::UpdateSettings { settings } => {
                let change = self.update_settings(settings)?;
                CommandOutcome::SettingsApplied {
                    settings: change.current,
                    scheduler_running: self.scheduler_running(),
                }
            }
            Command::UpdateAlgorithm {
                id,
                enabled,
                performance_score,
            } => CommandOutcome::AlgorithmUpdated {
                algorithm: self.update_algorithm(id, enabled, performance_score)?,
            },
        };
        Ok(outcome)
    }

    /// Stop the scheduler and wait for it to exit
    ///
    /// Dropping the manager does the same.
    pub fn shutdown(&self) {
        info!("GC manager shutting down");
        self.stop_scheduler();
    }
}

impl Drop for GcManager {
    fn drop(&mut self) {
        if let Some(task) = self.scheduler.get_mut().take() {
            task.shutdown();
        }
    }
}
