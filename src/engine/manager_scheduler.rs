/*!
 * Manager Scheduler Operations
 * Start, stop and wake the background collection thread
 */

use super::manager::GcManager;
use crate::core::errors::GcResult;
use crate::monitoring::GcEvent;
use crate::scheduler::{SchedulerStats, SchedulerTask};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

impl GcManager {
    /// Start the scheduler; returns false if it was already running
    pub fn start_scheduler(&self) -> GcResult<bool> {
        self.start_in(&mut self.scheduler.lock())
    }

    /// Stop the scheduler and join its thread; returns false if it was not running
    pub fn stop_scheduler(&self) -> bool {
        self.stop_in(&mut self.scheduler.lock())
    }

    /// Start into a slot whose lock the caller holds
    pub(super) fn start_in(&self, slot: &mut Option<SchedulerTask>) -> GcResult<bool> {
        if slot.as_ref().is_some_and(|task| !task.is_finished()) {
            return Ok(false);
        }

        *slot = Some(SchedulerTask::spawn(Arc::clone(&self.state), self.tick_unit)?);

        info!(tick_unit = ?self.tick_unit, "Background collection started");
        self.state.emit(GcEvent::SchedulerStateChanged { running: true });
        Ok(true)
    }

    /// Stop and join the task in a slot whose lock the caller holds
    ///
    /// The scheduler thread never touches the slot, so joining under the lock
    /// cannot deadlock.
    pub(super) fn stop_in(&self, slot: &mut Option<SchedulerTask>) -> bool {
        let Some(task) = slot.take() else {
            return false;
        };
        task.shutdown();

        info!("Background collection stopped");
        self.state.emit(GcEvent::SchedulerStateChanged { running: false });
        true
    }

    pub fn scheduler_running(&self) -> bool {
        self.scheduler
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Counters of the running scheduler, None when stopped
    pub fn scheduler_stats(&self) -> Option<SchedulerStats> {
        self.scheduler.lock().as_ref().map(SchedulerTask::stats)
    }

    /// Real length of one settings "minute"
    pub fn tick_unit(&self) -> Duration {
        self.tick_unit
    }
}
