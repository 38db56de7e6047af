//! Progress timer
//!
//! A repeating tokio task that reports ticks on a channel. At most one task
//! is live per `ProgressTimer`: `start` aborts the previous task before
//! spawning the next, and every tick carries the id of the task that sent
//! it so the consumer can drop ticks from a task that was already replaced.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

/// Identifies one spawned timer task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// One progress tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub timer: TimerId,
}

/// Sending half of the tick channel
pub type TimerTickSender = mpsc::UnboundedSender<TimerTick>;

/// Receiving half of the tick channel
pub type TimerTickReceiver = mpsc::UnboundedReceiver<TimerTick>;

struct ActiveTimer {
    id: TimerId,
    handle: JoinHandle<()>,
}

/// Owner of the single progress task
pub struct ProgressTimer {
    ticks: TimerTickSender,
    active: Option<ActiveTimer>,
    next_id: u64,
}

impl ProgressTimer {
    /// Create a stopped timer reporting on `ticks`
    pub fn new(ticks: TimerTickSender) -> Self {
        Self {
            ticks,
            active: None,
            next_id: 1,
        }
    }

    /// Replace any running task with a fresh one ticking every `period`
    ///
    /// The first tick fires one full period after the call.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, period: Duration) -> TimerId {
        self.cancel();

        let id = TimerId(self.next_id);
        self.next_id += 1;

        let ticks = self.ticks.clone();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if ticks.send(TimerTick { timer: id }).is_err() {
                    break;
                }
            }
        });

        trace!(timer = id.0, period_ms = period.as_millis() as u64, "progress timer started");
        self.active = Some(ActiveTimer { id, handle });
        id
    }

    /// Stop the running task, if any
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            active.handle.abort();
            trace!(timer = active.id.0, "progress timer cancelled");
        }
    }

    /// Whether a task is running
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Id of the running task
    pub fn active_id(&self) -> Option<TimerId> {
        self.active.as_ref().map(|active| active.id)
    }

    /// Whether `tick` came from the running task
    pub fn is_current(&self, tick: TimerTick) -> bool {
        self.active_id() == Some(tick.timer)
    }
}

impl Drop for ProgressTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
