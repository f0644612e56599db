/*!
 * History Tests
 * Bounded retention and ordering of the activity and memory logs
 */

use super::common::{ledger, quiet_manager, registry_with, CountingCollector};
use gc_manager::{BlockStatus, GcActivity, HistoryLog};
use std::sync::Arc;
use std::time::SystemTime;

#[test]
fn test_log_keeps_most_recent_thousand() {
    let log: HistoryLog<GcActivity> = HistoryLog::new();
    for i in 0..1050 {
        log.append(GcActivity::new(1, "Mark-Sweep", SystemTime::now(), 1, i, 5.0));
    }

    assert_eq!(log.len(), 1000);
    let recent = log.recent(1000);
    assert_eq!(recent.len(), 1000);
    assert_eq!(recent[0].id, 1050);
    assert_eq!(recent[999].id, 51);
    for pair in recent.windows(2) {
        assert_eq!(pair[0].id, pair[1].id + 1);
    }
    // Payload follows the id
    assert_eq!(recent[0].memory_reclaimed_bytes, 1049);
}

#[test]
fn test_recent_limit_larger_than_size() {
    let log: HistoryLog<GcActivity> = HistoryLog::new();
    log.append(GcActivity::new(2, "Generational", SystemTime::now(), 0, 0, 5.0));
    assert_eq!(log.recent(20).len(), 1);
    assert!(log.recent(0).is_empty());
}

#[test]
fn test_engine_history_is_bounded() {
    let collector = Arc::new(CountingCollector::default());
    let manager = quiet_manager(
        ledger(&[(4096, BlockStatus::Active)], 4096),
        registry_with(collector.clone()),
    );

    for _ in 0..1050 {
        manager.run_collection();
    }
    assert_eq!(collector.calls(), 1050);

    let activities = manager.recent_activities(5000);
    let records = manager.recent_memory_records(5000);
    assert_eq!(activities.len(), 1000);
    assert_eq!(records.len(), 1000);
    assert_eq!(activities.first().map(|a| a.id), Some(1050));
    assert_eq!(activities.last().map(|a| a.id), Some(51));
    assert_eq!(records.first().map(|r| r.id), Some(1050));

    // Counters are not bounded by retention
    assert_eq!(manager.stats().gc_runs_today, 1050);
    assert_eq!(manager.performance().runs_recorded, 1000);
}

#[test]
fn test_default_query_limits() {
    let manager = quiet_manager(
        ledger(&[(4096, BlockStatus::Active)], 4096),
        registry_with(Arc::new(CountingCollector::default())),
    );
    for _ in 0..150 {
        manager.run_collection();
    }

    assert_eq!(manager.recent_activities(20).len(), 20);
    assert_eq!(manager.recent_memory_records(100).len(), 100);

    // Wall-clock timestamps may step backwards; ids may not
    let ids: Vec<_> = manager
        .recent_activities(150)
        .iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, (1..=150).rev().collect::<Vec<u64>>());
}
