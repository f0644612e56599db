/*!
 * Concurrency Tests
 * Single-flight collection and snapshot consistency under contention
 */

use super::common::{ledger, quiet_manager, registry_with, wait_until, CountingCollector};
use gc_manager::{
    AlgorithmRegistry, BlockStatus, CollectionStrategy, GcEvent, GcManager, MemoryBlock,
    RandomSource,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Frees the first ACTIVE block after a delay, tracking overlap
#[derive(Default)]
struct SlowCollector {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    entered: AtomicBool,
    trace: Mutex<Vec<&'static str>>,
}

impl CollectionStrategy for SlowCollector {
    fn collect(&self, blocks: &mut [MemoryBlock], _rng: &mut dyn RandomSource) -> usize {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.trace.lock().push("enter");
        self.entered.store(true, Ordering::SeqCst);

        thread::sleep(Duration::from_millis(40));

        let reclaimed = match blocks.iter_mut().find(|b| b.is_active()) {
            Some(block) => {
                block.status = BlockStatus::Free;
                block.size
            }
            None => 0,
        };

        self.trace.lock().push("exit");
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reclaimed
    }
}

fn slow_manager(collector: Arc<SlowCollector>) -> Arc<GcManager> {
    let blocks: Vec<_> = (0..8).map(|_| (100, BlockStatus::Active)).collect();
    Arc::new(quiet_manager(ledger(&blocks, 800), registry_with(collector)))
}

#[test]
fn test_concurrent_runs_never_overlap() {
    let collector = Arc::new(SlowCollector::default());
    let manager = slow_manager(collector.clone());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || manager.run_collection())
        })
        .collect();
    let results: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results, vec![100; 4]);
    assert_eq!(collector.max_in_flight.load(Ordering::SeqCst), 1);

    let trace = collector.trace.lock().clone();
    assert_eq!(trace.len(), 8);
    for pair in trace.chunks(2) {
        assert_eq!(pair, ["enter", "exit"]);
    }

    // Every run committed before the next began, so usage steps down by 100
    let used: Vec<usize> = manager
        .recent_memory_records(10)
        .iter()
        .map(|r| r.used_bytes)
        .collect();
    assert_eq!(used, vec![400, 500, 600, 700]);
    let ids: Vec<u64> = manager.recent_activities(10).iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![4, 3, 2, 1]);
}

#[test]
fn test_snapshot_waits_for_running_collection() {
    let collector = Arc::new(SlowCollector::default());
    let manager = slow_manager(collector.clone());

    let runner = {
        let manager = Arc::clone(&manager);
        thread::spawn(move || manager.run_collection())
    };
    assert!(wait_until(Duration::from_secs(2), || collector
        .entered
        .load(Ordering::SeqCst)));

    // Blocks on the ledger lock until the run has committed
    let snapshot = manager.snapshot();
    assert_eq!(snapshot.used_bytes, 700);
    assert_eq!(snapshot.used_bytes + snapshot.free_bytes, snapshot.total_bytes);
    assert_eq!(collector.in_flight.load(Ordering::SeqCst), 0);

    assert_eq!(runner.join().unwrap(), 100);
}

#[test]
fn test_mixed_operations_keep_totals() {
    let manager = Arc::new(
        GcManager::builder()
            .with_total_memory(16 * 1024 * 1024)
            .with_seed(9)
            .with_registry(AlgorithmRegistry::with_defaults())
            .build()
            .unwrap(),
    );
    manager.stop_scheduler();

    let writers: Vec<_> = (0..4)
        .map(|i| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for _ in 0..25 {
                    match i {
                        0 => {
                            manager.run_collection();
                        }
                        1 => {
                            manager.optimize();
                        }
                        2 => {
                            manager.defragment();
                        }
                        _ => {
                            manager.update_algorithm(1, false, 10).unwrap();
                            manager.update_algorithm(1, true, 72).unwrap();
                        }
                    }
                }
            })
        })
        .collect();

    let reader = {
        let manager = Arc::clone(&manager);
        thread::spawn(move || {
            for _ in 0..200 {
                let snapshot = manager.snapshot();
                assert_eq!(snapshot.used_bytes + snapshot.free_bytes, snapshot.total_bytes);
                assert!((0.0..=100.0).contains(&snapshot.fragmentation_percent));
            }
        })
    };

    for handle in writers {
        handle.join().unwrap();
    }
    reader.join().unwrap();

    assert_eq!(manager.stats().gc_runs_today, 25);
}

#[test]
fn test_collection_events_follow_commit_order() {
    let manager = Arc::new(quiet_manager(
        ledger(&[(1000, BlockStatus::Active)], 1000),
        registry_with(Arc::new(CountingCollector::default())),
    ));
    let mut events = manager.subscribe();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for _ in 0..20 {
                    manager.run_collection();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let ids: Vec<u64> = std::iter::from_fn(|| events.try_recv().ok())
        .filter_map(|event| match event {
            GcEvent::CollectionCompleted { activity, .. } => Some(activity.id),
            _ => None,
        })
        .collect();
    assert_eq!(ids, (1..=160).collect::<Vec<u64>>());
}
