//! Simulated output device
//!
//! Stands in for a real audio element: loads complete after a fixed delay,
//! and a playing source reports `Ended` once its known duration has elapsed.
//! Locators containing `missing` fail to load.

use cadenza_core::{CoreError, DeviceEvent, DeviceEventSender, LoadTicket, OutputDevice};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

#[derive(Default)]
struct Inner {
    events: Option<DeviceEventSender>,
    url: Option<String>,
    duration: Option<f64>,
    paused: bool,
    /// Playhead at the last pause/seek
    position: f64,
    /// When rendering last (re)started
    started_at: Option<Instant>,
    pending_load: Option<JoinHandle<()>>,
    pending_end: Option<JoinHandle<()>>,
}

impl Inner {
    fn playhead(&self) -> f64 {
        let running = self
            .started_at
            .map_or(0.0, |started| started.elapsed().as_secs_f64());
        self.position + running
    }

    fn cancel_end(&mut self) {
        if let Some(task) = self.pending_end.take() {
            task.abort();
        }
    }

    fn send(&self, event: DeviceEvent) {
        if let Some(events) = &self.events {
            // Receiver gone means the player shut down
            let _ = events.send(event);
        }
    }
}

/// In-process output device driven by tokio timers
#[derive(Clone)]
pub struct SimulatedDevice {
    inner: Arc<Mutex<Inner>>,
    durations: Arc<HashMap<String, f64>>,
    load_delay: Duration,
}

impl SimulatedDevice {
    /// `durations` maps resolved URLs to their length in seconds
    pub fn new(durations: HashMap<String, f64>, load_delay: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                paused: true,
                ..Inner::default()
            })),
            durations: Arc::new(durations),
            load_delay,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Schedule `Ended` for the remaining part of the source
    fn schedule_end(&self, inner: &mut Inner) {
        inner.cancel_end();

        let Some(duration) = inner.duration else {
            return;
        };
        let remaining = (duration - inner.position).max(0.0);

        let shared = Arc::clone(&self.inner);
        inner.pending_end = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs_f64(remaining)).await;

            let mut inner = shared.lock().unwrap_or_else(PoisonError::into_inner);
            inner.paused = true;
            inner.position = duration;
            inner.started_at = None;
            inner.pending_end = None;
            inner.send(DeviceEvent::Ended);
        }));
    }
}

impl OutputDevice for SimulatedDevice {
    fn attach(&self, events: DeviceEventSender) {
        self.lock().events = Some(events);
    }

    fn load(&self, ticket: LoadTicket, url: &str) {
        let mut inner = self.lock();

        if let Some(task) = inner.pending_load.take() {
            task.abort();
        }
        inner.cancel_end();
        inner.url = Some(url.to_string());
        inner.duration = self.durations.get(url).copied();
        inner.paused = true;
        inner.position = 0.0;
        inner.started_at = None;

        debug!(%ticket, url, "simulated load started");

        let shared = Arc::clone(&self.inner);
        let delay = self.load_delay;
        let url = url.to_string();
        let duration = inner.duration;
        inner.pending_load = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let event = if url.contains("missing") {
                DeviceEvent::LoadFailed {
                    ticket,
                    reason: format!("media not found: {url}"),
                }
            } else {
                DeviceEvent::DataReady { ticket, duration }
            };

            let mut inner = shared.lock().unwrap_or_else(PoisonError::into_inner);
            inner.pending_load = None;
            inner.send(event);
        }));
    }

    fn play(&self) -> cadenza_core::Result<()> {
        let mut inner = self.lock();

        if inner.url.is_none() {
            return Err(CoreError::device("no source loaded"));
        }
        if !inner.paused {
            return Ok(());
        }

        inner.paused = false;
        inner.started_at = Some(Instant::now());
        self.schedule_end(&mut inner);
        trace!(position = inner.position, "simulated playback started");
        Ok(())
    }

    fn pause(&self) {
        let mut inner = self.lock();
        if inner.paused {
            return;
        }

        inner.position = inner.playhead();
        inner.started_at = None;
        inner.paused = true;
        inner.cancel_end();
    }

    fn is_paused(&self) -> bool {
        self.lock().paused
    }

    fn set_current_time(&self, seconds: f64) {
        let mut inner = self.lock();
        inner.position = seconds.max(0.0);

        if !inner.paused {
            inner.started_at = Some(Instant::now());
            self.schedule_end(&mut inner);
        }
    }

    fn set_volume(&self, volume: f64) {
        trace!(volume, "simulated volume");
    }

    fn set_muted(&self, muted: bool) {
        trace!(muted, "simulated mute");
    }

    fn set_loop(&self, looping: bool) {
        trace!(looping, "simulated native loop");
    }
}
