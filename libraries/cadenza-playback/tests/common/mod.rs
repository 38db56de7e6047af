//! Shared test fixtures: a recording output device and a manager harness

#![allow(dead_code)]

use cadenza_core::{DeviceEvent, DeviceEventReceiver, DeviceEventSender, LoadTicket, OutputDevice, Track};
use cadenza_playback::{
    Collaborators, InMemoryNowPlaying, InMemoryPlaylist, MemorySettingsStore, PlaybackManager,
    PlayerConfig, PlayerEvent, TimerTickReceiver,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Everything the device was told to do
#[derive(Debug, Default, Clone)]
pub struct DeviceLog {
    pub loads: Vec<(LoadTicket, String)>,
    pub plays: usize,
    pub pauses: usize,
    pub volume: Option<f64>,
    pub muted: Option<bool>,
    pub looping: Option<bool>,
    pub current_time: Option<f64>,
}

/// Output device that records calls and completes loads on request
pub struct RecordingDevice {
    log: Mutex<DeviceLog>,
    paused: AtomicBool,
    refuse_play: AtomicBool,
    events: Mutex<Option<DeviceEventSender>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self {
            log: Mutex::new(DeviceLog::default()),
            paused: AtomicBool::new(true),
            refuse_play: AtomicBool::new(false),
            events: Mutex::new(None),
        }
    }

    pub fn log(&self) -> DeviceLog {
        self.log.lock().unwrap().clone()
    }

    pub fn load_count(&self) -> usize {
        self.log.lock().unwrap().loads.len()
    }

    pub fn last_load(&self) -> (LoadTicket, String) {
        self.log.lock().unwrap().loads.last().cloned().expect("no load requested")
    }

    /// Make subsequent `play` calls fail
    pub fn refuse_play(&self, refuse: bool) {
        self.refuse_play.store(refuse, Ordering::SeqCst);
    }

    /// Report the most recent load as ready
    pub fn complete_load(&self, duration: Option<f64>) {
        let (ticket, _) = self.last_load();
        self.complete(ticket, duration);
    }

    /// Report `ticket` as ready
    pub fn complete(&self, ticket: LoadTicket, duration: Option<f64>) {
        self.emit(DeviceEvent::DataReady { ticket, duration });
    }

    /// Report the most recent load as failed
    pub fn fail_load(&self, reason: &str) {
        let (ticket, _) = self.last_load();
        self.emit(DeviceEvent::LoadFailed {
            ticket,
            reason: reason.to_string(),
        });
    }

    /// Report the natural end of the current source
    pub fn finish_track(&self) {
        self.paused.store(true, Ordering::SeqCst);
        self.emit(DeviceEvent::Ended);
    }

    fn emit(&self, event: DeviceEvent) {
        let events = self.events.lock().unwrap();
        events
            .as_ref()
            .expect("device not attached")
            .send(event)
            .expect("device event receiver dropped");
    }
}

impl OutputDevice for RecordingDevice {
    fn attach(&self, events: DeviceEventSender) {
        *self.events.lock().unwrap() = Some(events);
    }

    fn load(&self, ticket: LoadTicket, url: &str) {
        self.paused.store(true, Ordering::SeqCst);
        self.log.lock().unwrap().loads.push((ticket, url.to_string()));
    }

    fn play(&self) -> cadenza_core::Result<()> {
        if self.refuse_play.load(Ordering::SeqCst) {
            return Err(cadenza_core::CoreError::device("playback not allowed"));
        }
        self.paused.store(false, Ordering::SeqCst);
        self.log.lock().unwrap().plays += 1;
        Ok(())
    }

    fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
        self.log.lock().unwrap().pauses += 1;
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn set_current_time(&self, seconds: f64) {
        self.log.lock().unwrap().current_time = Some(seconds);
    }

    fn set_volume(&self, volume: f64) {
        self.log.lock().unwrap().volume = Some(volume);
    }

    fn set_muted(&self, muted: bool) {
        self.log.lock().unwrap().muted = Some(muted);
    }

    fn set_loop(&self, looping: bool) {
        self.log.lock().unwrap().looping = Some(looping);
    }
}

pub fn create_test_track(id: u64) -> Track {
    Track::new(id, format!("/music/track{}.flac", id), "3:00")
        .with_title(format!("Track {}", id))
}

pub fn create_tracks(count: u64) -> Vec<Track> {
    (1..=count).map(create_test_track).collect()
}

/// Manager wired to in-memory collaborators and a recording device
pub struct Harness {
    pub manager: PlaybackManager,
    pub device: Arc<RecordingDevice>,
    pub playlist: Arc<InMemoryPlaylist>,
    pub now_playing: Arc<InMemoryNowPlaying>,
    pub settings: Arc<MemorySettingsStore>,
    device_events: DeviceEventReceiver,
    ticks: TimerTickReceiver,
    events: Vec<PlayerEvent>,
}

impl Harness {
    pub async fn new(tracks: Vec<Track>) -> Self {
        Self::with_settings(tracks, MemorySettingsStore::new()).await
    }

    pub async fn with_settings(tracks: Vec<Track>, settings: MemorySettingsStore) -> Self {
        let config = PlayerConfig {
            shuffle_seed: Some(7),
            ..PlayerConfig::default()
        };
        Self::with_config(tracks, settings, config).await
    }

    pub async fn with_config(
        tracks: Vec<Track>,
        settings: MemorySettingsStore,
        config: PlayerConfig,
    ) -> Self {
        let device = Arc::new(RecordingDevice::new());
        let playlist = Arc::new(InMemoryPlaylist::new(tracks));
        let now_playing = Arc::new(InMemoryNowPlaying::new());
        let settings = Arc::new(settings);

        let collaborators = Collaborators {
            device: device.clone(),
            playlist: playlist.clone(),
            now_playing: now_playing.clone(),
            settings: settings.clone(),
        };

        let (tick_tx, ticks) = mpsc::unbounded_channel();
        let (device_tx, device_events) = mpsc::unbounded_channel();

        let mut manager = PlaybackManager::new(config, collaborators, tick_tx);
        manager.init(device_tx).await;

        let mut harness = Self {
            manager,
            device,
            playlist,
            now_playing,
            settings,
            device_events,
            ticks,
            events: Vec::new(),
        };
        harness.collect_events();
        harness.events.clear();
        harness
    }

    /// Apply every pending device notification
    pub fn pump_device(&mut self) {
        while let Ok(event) = self.device_events.try_recv() {
            self.manager.handle_device_event(event);
        }
        self.collect_events();
    }

    /// Apply every pending progress tick; returns how many arrived
    pub fn pump_ticks(&mut self) -> usize {
        let mut count = 0;
        while let Ok(tick) = self.ticks.try_recv() {
            self.manager.handle_tick(tick);
            count += 1;
        }
        count
    }

    /// Play `track` and let the device finish loading it
    pub fn play_loaded(&mut self, track: Track) {
        self.manager.play(track);
        self.device.complete_load(None);
        self.pump_device();
    }

    /// Events emitted since the last call
    pub fn take_events(&mut self) -> Vec<PlayerEvent> {
        self.collect_events();
        std::mem::take(&mut self.events)
    }

    fn collect_events(&mut self) {
        self.events.extend(self.manager.drain_events());
    }
}
