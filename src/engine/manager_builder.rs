/*!
 * GC Manager Builder
 * Builder pattern for GcManager construction
 */

use super::manager::{EngineState, GcManager};
use super::stats::RunStats;
use crate::core::errors::GcResult;
use crate::core::limits::{DEFAULT_TICK_UNIT, DEFAULT_TOTAL_MEMORY, EVENT_CHANNEL_CAPACITY};
use crate::core::random::{RandomSource, StdRandom};
use crate::core::types::Size;
use crate::gc::AlgorithmRegistry;
use crate::history::HistoryLog;
use crate::memory::BlockLedger;
use crate::settings::{GcSettings, SettingsStore};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::info;

/// Builder for GcManager
pub struct GcManagerBuilder {
    total_memory: Size,
    ledger: Option<BlockLedger>,
    registry: Option<AlgorithmRegistry>,
    settings: GcSettings,
    random: Option<Box<dyn RandomSource>>,
    tick_unit: Duration,
    history_capacity: Option<usize>,
}

impl GcManagerBuilder {
    pub fn new() -> Self {
        Self {
            total_memory: DEFAULT_TOTAL_MEMORY,
            ledger: None,
            registry: None,
            settings: GcSettings::default(),
            random: None,
            tick_unit: DEFAULT_TICK_UNIT,
            history_capacity: None,
        }
    }

    /// Size of the randomly initialized ledger
    pub fn with_total_memory(mut self, total_bytes: Size) -> Self {
        self.total_memory = total_bytes;
        self
    }

    /// Use an explicit ledger instead of a random one
    pub fn with_ledger(mut self, ledger: BlockLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Use a custom algorithm registry instead of the shipped four
    pub fn with_registry(mut self, registry: AlgorithmRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_settings(mut self, settings: GcSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Random source for block layout, reclaim draws and CPU impact
    pub fn with_random<R: RandomSource + 'static>(mut self, random: R) -> Self {
        self.random = Some(Box::new(random));
        self
    }

    /// Seeded standard random source for reproducible runs
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_random(StdRandom::seeded(seed))
    }

    /// Real duration of one settings "minute"
    pub fn with_tick_unit(mut self, tick_unit: Duration) -> Self {
        self.tick_unit = tick_unit;
        self
    }

    /// Entries retained per history log
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    /// Build the GcManager, starting the scheduler if background collection is on
    pub fn build(self) -> GcResult<GcManager> {
        self.settings.validate()?;

        let mut random = self
            .random
            .unwrap_or_else(|| Box::new(StdRandom::from_entropy()));
        let ledger = match self.ledger {
            Some(ledger) => ledger,
            None => BlockLedger::initialize(self.total_memory, random.as_mut()),
        };
        let registry = self.registry.unwrap_or_else(AlgorithmRegistry::with_defaults);
        let (activities, memory_records) = match self.history_capacity {
            Some(capacity) => (
                HistoryLog::with_capacity(capacity),
                HistoryLog::with_capacity(capacity),
            ),
            None => (HistoryLog::new(), HistoryLog::new()),
        };
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        info!(
            total_bytes = ledger.total_bytes(),
            blocks = ledger.blocks().len(),
            algorithms = registry.len(),
            background = self.settings.background_collection,
            "GC manager initialized"
        );

        let manager = GcManager {
            state: Arc::new(EngineState {
                ledger: Mutex::new(ledger),
                registry: RwLock::new(registry),
                activities,
                memory_records,
                settings: SettingsStore::new(self.settings),
                stats: Mutex::new(RunStats::default()),
                rng: Mutex::new(random),
                events,
            }),
            scheduler: Mutex::new(None),
            tick_unit: self.tick_unit,
        };

        if self.settings.background_collection {
            manager.start_scheduler()?;
        }
        Ok(manager)
    }
}

impl Default for GcManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
