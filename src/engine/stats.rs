/*!
 * Engine Statistics
 * Run counters and the performance summary derived from history
 */

use crate::core::serde::{serde_as, TimestampMilliSeconds};
use crate::core::types::Size;
use crate::history::{GcActivity, MemoryRecord};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Collection run counters
///
/// `gc_runs_today` counts every completed run since construction; there is no
/// daily reset.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub gc_runs_today: u64,
    #[serde_as(as = "Option<TimestampMilliSeconds<i64>>")]
    pub last_run_at: Option<SystemTime>,
    pub average_duration_ms: f64,
    /// CPU impact of the most recent run
    pub cpu_impact_percent: f32,
}

impl RunStats {
    /// Fold one completed run into the counters
    pub fn record_run(&mut self, at: SystemTime, duration_ms: u64, cpu_impact_percent: f32) {
        self.gc_runs_today += 1;
        self.last_run_at = Some(at);
        // Running mean over all runs
        let runs = self.gc_runs_today as f64;
        self.average_duration_ms += (duration_ms as f64 - self.average_duration_ms) / runs;
        self.cpu_impact_percent = cpu_impact_percent;
    }
}

/// Aggregate performance over the retained history
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub peak_used_bytes: Size,
    pub total_reclaimed_bytes: Size,
    pub average_reclaim_bytes: f64,
    pub average_cpu_impact_percent: f32,
    pub runs_recorded: usize,
}

impl PerformanceSummary {
    /// Summarize retained history; `current_used` seeds the peak
    pub fn from_history(
        activities: &[GcActivity],
        records: &[MemoryRecord],
        current_used: Size,
    ) -> Self {
        let peak_used_bytes = records
            .iter()
            .map(|r| r.used_bytes)
            .fold(current_used, Size::max);

        let runs_recorded = activities.len();
        let total_reclaimed_bytes: Size = activities.iter().map(|a| a.memory_reclaimed_bytes).sum();
        let (average_reclaim_bytes, average_cpu_impact_percent) = if runs_recorded == 0 {
            (0.0, 0.0)
        } else {
            let cpu_sum: f32 = activities.iter().map(|a| a.cpu_impact_percent).sum();
            (
                total_reclaimed_bytes as f64 / runs_recorded as f64,
                cpu_sum / runs_recorded as f32,
            )
        };

        Self {
            peak_used_bytes,
            total_reclaimed_bytes,
            average_reclaim_bytes,
            average_cpu_impact_percent,
            runs_recorded,
        }
    }
}
