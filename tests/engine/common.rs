/*!
 * Shared fixtures for engine tests
 */

use gc_manager::{
    AlgorithmInfo, AlgorithmRegistry, BlockLedger, BlockStatus, CollectionStrategy, GcManager,
    GcSettings, MemoryBlock, RandomSource,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Build a ledger from `(size, status)` pairs, ids starting at 1
pub fn ledger(blocks: &[(usize, BlockStatus)], used: usize) -> BlockLedger {
    let blocks = blocks
        .iter()
        .enumerate()
        .map(|(i, (size, status))| MemoryBlock::new(i as u32 + 1, *size, *status))
        .collect();
    BlockLedger::from_blocks(blocks, used).unwrap()
}

/// Registry holding a single strategy under id 100
pub fn registry_with(strategy: Arc<dyn CollectionStrategy>) -> AlgorithmRegistry {
    let mut registry = AlgorithmRegistry::empty();
    registry
        .register(
            AlgorithmInfo::new(100, "Test Collector", "Deterministic test double"),
            strategy,
        )
        .unwrap();
    registry
}

/// Manager with no background scheduler
pub fn quiet_manager(ledger: BlockLedger, registry: AlgorithmRegistry) -> GcManager {
    GcManager::builder()
        .with_ledger(ledger)
        .with_registry(registry)
        .with_seed(42)
        .with_settings(GcSettings::default().with_background_collection(false))
        .build()
        .unwrap()
}

/// Counts calls and reclaims nothing, so usage never drops
#[derive(Default)]
pub struct CountingCollector {
    calls: AtomicU64,
}

impl CountingCollector {
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CollectionStrategy for CountingCollector {
    fn collect(&self, _blocks: &mut [MemoryBlock], _rng: &mut dyn RandomSource) -> usize {
        self.calls.fetch_add(1, Ordering::SeqCst);
        0
    }
}

/// Poll `condition` until it holds or `timeout` elapses
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}
