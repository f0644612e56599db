/*!
 * Collection Runs
 * The single-flight critical sections that mutate the ledger
 *
 * Each operation holds the ledger lock from the first read to the last
 * aggregate update. For collection runs the lock is also held across history
 * appends, so append order equals commit order. Events are sent before the
 * lock is released, so subscribers see them in commit order too; a broadcast
 * send never blocks. Lock order everywhere is
 * ledger -> registry -> random source -> stats -> history.
 */

use super::manager::EngineState;
use crate::core::limits::{MAX_CPU_IMPACT_PERCENT, MIN_CPU_IMPACT_PERCENT};
use crate::core::types::Size;
use crate::history::{GcActivity, MemoryRecord};
use crate::monitoring::{span_operation, GcEvent};
use crate::scheduler::CollectionTarget;
use crate::settings::GcSettings;
use std::time::{Instant, SystemTime};
use tracing::{debug, info};

impl EngineState {
    /// Run one collection with the first enabled algorithm
    ///
    /// Returns the bytes the algorithm reclaimed. With no enabled algorithm
    /// nothing changes and 0 is returned.
    pub(super) fn run_collection(&self) -> Size {
        let span = span_operation("run_collection");
        let _entered = span.enter();

        let mut ledger = self.ledger.lock();

        let Some(selected) = self.registry.read().select() else {
            debug!("No enabled algorithm, collection skipped");
            return 0;
        };
        span.record_algorithm(&selected.name);

        let started = Instant::now();
        let reclaimed = {
            let mut rng = self.rng.lock();
            selected.strategy.collect(ledger.blocks_mut(), &mut **rng)
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        ledger.apply_reclaim(reclaimed);
        ledger.recompute_fragmentation();
        let snapshot = ledger.snapshot();

        let cpu_impact = self
            .rng
            .lock()
            .next_f32_in(MIN_CPU_IMPACT_PERCENT, MAX_CPU_IMPACT_PERCENT);
        let completed_at = SystemTime::now();
        self.stats
            .lock()
            .record_run(completed_at, duration_ms, cpu_impact);

        let mut activity = GcActivity::new(
            selected.id,
            selected.name,
            completed_at,
            duration_ms,
            reclaimed,
            cpu_impact,
        );
        activity.id = self.activities.append(activity.clone());
        self.memory_records
            .append(MemoryRecord::from_snapshot(completed_at, &snapshot));

        info!(
            algorithm_id = activity.algorithm_id,
            algorithm = %activity.algorithm_name,
            reclaimed_bytes = reclaimed,
            duration_ms,
            cpu_impact,
            used_bytes = snapshot.used_bytes,
            "Collection completed"
        );
        self.emit(GcEvent::CollectionCompleted { activity, snapshot });

        drop(ledger);
        span.record_reclaimed(reclaimed);
        reclaimed
    }

    /// Turn every FRAGMENTED block FREE
    pub(super) fn optimize(&self) -> Size {
        let span = span_operation("optimize");
        let _entered = span.enter();

        let mut ledger = self.ledger.lock();
        let reclaimed = ledger.optimize();
        ledger.apply_reclaim(reclaimed);
        ledger.recompute_fragmentation();
        let snapshot = ledger.snapshot();

        info!(
            reclaimed_bytes = reclaimed,
            fragmentation = snapshot.fragmentation_percent,
            "Memory optimized"
        );
        self.emit(GcEvent::MemoryOptimized {
            reclaimed_bytes: reclaimed,
            snapshot,
        });

        drop(ledger);
        span.record_reclaimed(reclaimed);
        reclaimed
    }

    /// Report free-block consolidation
    pub(super) fn defragment(&self) -> Size {
        let span = span_operation("defragment");
        let _entered = span.enter();

        let mut ledger = self.ledger.lock();
        let reclaimed = ledger.defragment();
        ledger.apply_reclaim(reclaimed);
        ledger.recompute_fragmentation();
        let snapshot = ledger.snapshot();

        info!(
            reclaimed_bytes = reclaimed,
            used_bytes = snapshot.used_bytes,
            "Memory defragmented"
        );
        self.emit(GcEvent::MemoryDefragmented {
            reclaimed_bytes: reclaimed,
            snapshot,
        });

        drop(ledger);
        span.record_reclaimed(reclaimed);
        reclaimed
    }
}

impl CollectionTarget for EngineState {
    fn settings(&self) -> GcSettings {
        self.settings.get()
    }

    fn used_percent(&self) -> f64 {
        self.ledger.lock().used_percent()
    }

    fn collect(&self) -> Size {
        self.run_collection()
    }
}
