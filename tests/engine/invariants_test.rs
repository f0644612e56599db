/*!
 * Invariant Property Tests
 * Ledger totals and history bounds over random operation sequences
 */

use gc_manager::{GcManager, GcSettings};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Collect,
    Optimize,
    Defragment,
    Toggle { id: u32, enabled: bool },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Collect),
        2 => Just(Op::Optimize),
        1 => Just(Op::Defragment),
        2 => (1u32..=4, any::<bool>()).prop_map(|(id, enabled)| Op::Toggle { id, enabled }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_totals_hold_after_every_operation(
        seed in any::<u64>(),
        total_kb in 64usize..4096,
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let manager = GcManager::builder()
            .with_total_memory(total_kb * 1024)
            .with_seed(seed)
            .with_history_capacity(8)
            .with_settings(GcSettings::default().with_background_collection(false))
            .build()
            .unwrap();

        let mut runs = 0u64;
        for op in ops {
            let before = manager.snapshot();
            match op {
                Op::Collect => {
                    let enabled = manager.list_algorithms().iter().any(|a| a.enabled);
                    let reclaimed = manager.run_collection();
                    if enabled {
                        runs += 1;
                    } else {
                        prop_assert_eq!(reclaimed, 0);
                        prop_assert_eq!(manager.snapshot(), before.clone());
                    }
                }
                Op::Optimize => {
                    manager.optimize();
                    prop_assert_eq!(manager.block_counts().fragmented, 0);
                }
                Op::Defragment => {
                    let counts = manager.block_counts();
                    manager.defragment();
                    prop_assert_eq!(manager.block_counts(), counts);
                }
                Op::Toggle { id, enabled } => {
                    let score = manager.get_algorithm(id).unwrap().performance_score;
                    manager.update_algorithm(id, enabled, score).unwrap();
                }
            }

            let snapshot = manager.snapshot();
            prop_assert_eq!(snapshot.total_bytes, total_kb * 1024);
            prop_assert_eq!(snapshot.used_bytes + snapshot.free_bytes, snapshot.total_bytes);
            prop_assert!(snapshot.used_bytes <= before.used_bytes);
            prop_assert!((0.0..=100.0).contains(&snapshot.fragmentation_percent));

            let fragmented: usize = manager
                .all_blocks()
                .iter()
                .filter(|b| b.is_fragmented())
                .map(|b| b.size)
                .sum();
            let expected = fragmented as f64 / snapshot.total_bytes as f64 * 100.0;
            prop_assert!((snapshot.fragmentation_percent - expected).abs() < 1e-9);
        }

        prop_assert_eq!(manager.stats().gc_runs_today, runs);
        prop_assert!(manager.recent_activities(100).len() <= 8);
        prop_assert_eq!(manager.recent_activities(100).len() as u64, runs.min(8));
        prop_assert_eq!(
            manager.recent_memory_records(100).len(),
            manager.recent_activities(100).len()
        );
    }

    #[test]
    fn prop_initialized_ledger_partitions_total(
        seed in any::<u64>(),
        total in 1usize..(8 * 1024 * 1024),
    ) {
        let manager = GcManager::builder()
            .with_total_memory(total)
            .with_seed(seed)
            .with_settings(GcSettings::default().with_background_collection(false))
            .build()
            .unwrap();

        let blocks = manager.all_blocks();
        prop_assert_eq!(blocks.iter().map(|b| b.size).sum::<usize>(), total);
        prop_assert!(blocks.iter().all(|b| b.size > 0 && b.size <= 1024 * 1024));
        prop_assert_eq!(manager.snapshot().used_bytes, (total as f64 * 0.42) as usize);
    }
}
