/*!
 * Scheduler Task - Background Collection Loop
 *
 * A dedicated thread that, once per interval, decides whether memory usage
 * warrants a collection and triggers it through the engine's regular entry
 * point.
 *
 * # Tick
 *
 * 1. Read the current settings. With `autoCollection` off the decision is
 *    skipped but the loop keeps its cadence.
 * 2. If `usedPercent > memoryThresholdPercent`, run a collection.
 * 3. Wait `timeIntervalMinutes` tick units on a condition variable.
 *
 * # Wakeups
 *
 * The wait is never a plain sleep. Two signals end it early:
 *
 * - **Stop**: the loop exits immediately.
 * - **Wake**: settings changed; the loop starts a new tick with them.
 *
 * # Shutdown
 *
 * `shutdown()` signals stop and joins the thread. Dropping the handle does the
 * same: no collection is running once the handle is gone.
 */

use super::traits::CollectionTarget;
use crate::core::errors::{GcError, GcResult};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

#[derive(Debug, Default)]
struct SignalState {
    stop: bool,
    wake: bool,
}

#[derive(Default)]
struct Signal {
    state: Mutex<SignalState>,
    condvar: Condvar,
}

#[derive(Default)]
struct Counters {
    ticks: AtomicU64,
    collections: AtomicU64,
}

/// Scheduler counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Loop iterations evaluated (including those skipped by autoCollection)
    pub ticks: u64,
    /// Collections triggered by the scheduler
    pub collections_triggered: u64,
}

/// Handle to the scheduler background thread
pub struct SchedulerTask {
    signal: Arc<Signal>,
    counters: Arc<Counters>,
    handle: Option<JoinHandle<()>>,
}

impl SchedulerTask {
    /// Spawn the scheduler loop
    ///
    /// `tick_unit` is the real length of one settings "minute".
    pub fn spawn<T: CollectionTarget>(target: Arc<T>, tick_unit: Duration) -> GcResult<Self> {
        let signal = Arc::new(Signal::default());
        let counters = Arc::new(Counters::default());

        let loop_signal = Arc::clone(&signal);
        let loop_counters = Arc::clone(&counters);
        let handle = thread::Builder::new()
            .name("gc-scheduler".to_string())
            .spawn(move || run_scheduler_loop(target, loop_signal, loop_counters, tick_unit))
            .map_err(|e| GcError::SchedulerSpawn(e.to_string()))?;

        info!(?tick_unit, "Scheduler task spawned");

        Ok(Self {
            signal,
            counters,
            handle: Some(handle),
        })
    }

    /// Interrupt the current wait so new settings take effect now
    pub fn wake(&self) {
        self.signal.state.lock().wake = true;
        self.signal.condvar.notify_one();
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            ticks: self.counters.ticks.load(Ordering::SeqCst),
            collections_triggered: self.counters.collections.load(Ordering::SeqCst),
        }
    }

    /// True once the loop has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Stop the loop and wait for the thread to exit
    ///
    /// Consumes self to prevent use-after-shutdown.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        self.signal.state.lock().stop = true;
        self.signal.condvar.notify_all();

        // Joining ourselves would deadlock
        if handle.thread().id() == thread::current().id() {
            warn!("Scheduler task stopped from its own thread, not joining");
            return;
        }

        if handle.join().is_err() {
            warn!("Scheduler thread panicked before shutdown");
        } else {
            info!("Scheduler task shutdown complete");
        }
    }
}

impl Drop for SchedulerTask {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// Core scheduler loop
fn run_scheduler_loop<T: CollectionTarget>(
    target: Arc<T>,
    signal: Arc<Signal>,
    counters: Arc<Counters>,
    tick_unit: Duration,
) {
    info!("Scheduler loop started");

    loop {
        if signal.state.lock().stop {
            break;
        }

        let settings = target.settings();
        counters.ticks.fetch_add(1, Ordering::SeqCst);

        if settings.auto_collection {
            let used_percent = target.used_percent();
            let threshold = settings.memory_threshold_percent as f64;
            if used_percent > threshold {
                debug!(used_percent, threshold, "Memory above threshold, collecting");
                let reclaimed = target.collect();
                counters.collections.fetch_add(1, Ordering::SeqCst);
                debug!(reclaimed, "Scheduled collection finished");
            } else {
                trace!(used_percent, threshold, "Memory below threshold");
            }
        } else {
            trace!("Auto collection disabled, skipping tick");
        }

        let interval = tick_unit.saturating_mul(settings.time_interval_minutes);
        if !wait_for_next_tick(&signal, interval) {
            break;
        }
    }

    info!("Scheduler loop exited");
}

/// Wait up to `interval`; returns false when stop was requested
fn wait_for_next_tick(signal: &Signal, interval: Duration) -> bool {
    let deadline = Instant::now().checked_add(interval);
    let mut state = signal.state.lock();

    loop {
        if state.stop {
            return false;
        }
        if state.wake {
            state.wake = false;
            trace!("Scheduler woken by settings change");
            return true;
        }
        match deadline {
            Some(deadline) => {
                if signal.condvar.wait_until(&mut state, deadline).timed_out() {
                    return !state.stop;
                }
            }
            None => signal.condvar.wait(&mut state),
        }
    }
}
