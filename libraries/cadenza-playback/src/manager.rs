//! Playback manager - the transport state machine
//!
//! Owns the `PlaybackState` and the progress timer, drives the output
//! device, and reads the playlist and "now playing" selection from sibling
//! modules. Every entry point runs to completion before the next one starts;
//! `PlaybackService` provides that serialisation for concurrent callers.

use crate::{
    config::PlayerConfig,
    events::PlayerEvent,
    shuffle::ShufflePicker,
    source::resolve_source_path,
    state::PlaybackState,
    timer::{ProgressTimer, TimerTick, TimerTickSender},
    types::{LoadState, LoopMode, PlaybackSnapshot},
};
use cadenza_core::{
    DeviceEvent, DeviceEventSender, LoadTicket, NowPlaying, OutputDevice, Playlist,
    SettingsStore, Track,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Collaborators injected into the manager
#[derive(Clone)]
pub struct Collaborators {
    pub device: Arc<dyn OutputDevice>,
    pub playlist: Arc<dyn Playlist>,
    pub now_playing: Arc<dyn NowPlaying>,
    pub settings: Arc<dyn SettingsStore>,
}

/// Central playback management
///
/// Orchestrates:
/// - Loading gate and device loads (`play`)
/// - Track-end policy (loop mode, shuffle)
/// - Manual navigation (next, previous, random)
/// - Transport (toggle, stop, abort)
/// - Volume, mute, loop mode, and scrubbing
pub struct PlaybackManager {
    config: PlayerConfig,
    state: PlaybackState,

    device: Arc<dyn OutputDevice>,
    playlist: Arc<dyn Playlist>,
    now_playing: Arc<dyn NowPlaying>,
    settings: Arc<dyn SettingsStore>,

    timer: ProgressTimer,
    shuffle: ShufflePicker,
    next_ticket: u64,
    initialized: bool,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl PlaybackManager {
    /// Create a manager; progress ticks are reported on `ticks`
    pub fn new(config: PlayerConfig, collaborators: Collaborators, ticks: TimerTickSender) -> Self {
        let state = PlaybackState::new(config.fps, config.default_volume);
        let shuffle = ShufflePicker::new(config.shuffle_seed);

        Self {
            config,
            state,
            device: collaborators.device,
            playlist: collaborators.playlist,
            now_playing: collaborators.now_playing,
            settings: collaborators.settings,
            timer: ProgressTimer::new(ticks),
            shuffle,
            next_ticket: 1,
            initialized: false,
            pending_events: Vec::new(),
        }
    }

    // ===== Lifecycle =====

    /// One-time device setup
    ///
    /// Attaches the device event channel, disables native looping, and
    /// applies the persisted volume (or the configured default).
    pub async fn init(&mut self, device_events: DeviceEventSender) {
        if self.initialized {
            warn!("playback manager already initialized, ignoring init");
            return;
        }

        self.device.attach(device_events);
        self.device.set_loop(false);

        let level = match self.settings.load_volume().await {
            Ok(Some(level)) => level.min(100),
            Ok(None) => self.config.default_volume,
            Err(e) => {
                warn!(error = %e, "failed to read persisted volume, using default");
                self.config.default_volume
            }
        };

        self.state.volume.set_level(level);
        self.device.set_volume(self.state.volume.device_level());
        self.device.set_muted(self.state.is_mute());
        self.initialized = true;

        info!(volume = level, "playback manager initialized");
    }

    // ===== Transport =====

    /// Load `track` and start it once the device is ready
    ///
    /// Dropped while another load is in flight.
    pub fn play(&mut self, track: Track) {
        if self.state.is_loading() {
            debug!(track_id = track.id, "load in flight, dropping play request");
            return;
        }

        let url = resolve_source_path(&track.music_url, &self.config.media_extension);
        let ticket = self.issue_ticket();

        self.state.load = LoadState::Loading {
            ticket,
            track: track.clone(),
        };
        self.state.source_path.clone_from(&url);
        self.timer.cancel();

        info!(track_id = track.id, %url, %ticket, "loading track");
        self.device.load(ticket, &url);
        self.emit(PlayerEvent::LoadingStarted { track_id: track.id });
        self.emit_state_changed();

        self.now_playing.set_playing_file(track.clone());
        if !self.now_playing.is_in_recent_play() {
            self.playlist.add_recent_play(&track);
        }
        self.emit(PlayerEvent::TrackChanged { track });
    }

    /// Play/pause the selected track
    ///
    /// Starts the selection instead when it is not the loaded source.
    pub fn toggle_play(&mut self) {
        if self.state.is_loading() {
            return;
        }

        let selected = self.now_playing.playing_file();
        if self.playlist.playing_list().is_empty() || selected.is_empty() {
            return;
        }

        let url = resolve_source_path(&selected.music_url, &self.config.media_extension);
        if url != self.state.source_path {
            self.play(selected);
            return;
        }

        if self.device.is_paused() {
            if let Err(e) = self.device.play() {
                warn!(error = %e, "device refused to resume");
                return;
            }
            self.start_progress();
            self.state.playing = true;
        } else {
            self.device.pause();
            self.state.playing = false;
            self.timer.cancel();
        }
        self.emit_state_changed();
    }

    /// Pause and keep the loaded source
    pub fn stop(&mut self) {
        self.device.pause();
        self.halt();
    }

    /// Clear the selection and unload
    ///
    /// Loop mode, volume, and shuffle are untouched. A load still in flight
    /// is abandoned; its completion will be ignored.
    pub fn abort(&mut self) {
        self.now_playing.set_playing_file(Track::empty());
        self.device.pause();

        if let LoadState::Loading { ticket, track } = &self.state.load {
            debug!(track_id = track.id, %ticket, "abandoning in-flight load");
        }
        self.state.load = LoadState::Idle;

        self.timer.cancel();
        self.state.clear_source();
        self.emit_state_changed();
    }

    // ===== Navigation =====

    /// React to the natural end of the current track
    pub fn handle_end(&mut self) {
        if self.state.is_random {
            self.random_play();
            return;
        }

        match self.state.loop_mode {
            LoopMode::Closed => {
                let list = self.playlist.playing_list();
                let current = self.now_playing.playing_file();
                let index = list.iter().position(|track| track.id == current.id);

                match index {
                    Some(i) if i + 1 == list.len() => {
                        debug!(track_id = current.id, "end of playlist reached");
                        self.halt();
                    }
                    Some(i) => self.play(list[i + 1].clone()),
                    None => match list.first() {
                        Some(first) => self.play(first.clone()),
                        None => self.halt(),
                    },
                }
            }
            LoopMode::LoopAll => self.to_next(),
            LoopMode::LoopSingle => {
                let current = self.now_playing.playing_file();
                if current.is_empty() {
                    self.halt();
                } else {
                    self.play(current);
                }
            }
        }
    }

    /// Advance one entry, wrapping past the end
    pub fn to_next(&mut self) {
        let list = self.playlist.playing_list();
        if list.is_empty() {
            return;
        }

        if self.state.is_random {
            self.random_play();
            return;
        }

        let current = self.now_playing.playing_file();
        let index = match list.iter().position(|track| track.id == current.id) {
            Some(i) if i + 1 < list.len() => i + 1,
            _ => 0,
        };
        self.play(list[index].clone());
    }

    /// Go back one entry, wrapping below the start
    pub fn to_prev(&mut self) {
        let list = self.playlist.playing_list();
        if list.is_empty() {
            return;
        }

        if self.state.is_random {
            self.random_play();
            return;
        }

        let current = self.now_playing.playing_file();
        let index = match list.iter().position(|track| track.id == current.id) {
            Some(i) if i > 0 => i - 1,
            _ => list.len() - 1,
        };
        self.play(list[index].clone());
    }

    /// Play a uniformly random entry (may repeat the current one)
    pub fn random_play(&mut self) {
        let list = self.playlist.playing_list();
        if let Some(index) = self.shuffle.pick(list.len()) {
            self.play(list[index].clone());
        }
    }

    // ===== Device & timer input =====

    /// Apply a notification from the output device
    pub fn handle_device_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::DataReady { ticket, duration } => self.handle_data_ready(ticket, duration),
            DeviceEvent::LoadFailed { ticket, reason } => self.handle_load_failed(ticket, &reason),
            DeviceEvent::Ended => self.handle_end(),
        }
    }

    /// Advance the current time by one tick
    ///
    /// Ticks from a timer that has since been cancelled or replaced are
    /// ignored.
    pub fn handle_tick(&mut self, tick: TimerTick) {
        if self.timer.is_current(tick) {
            self.state.current_time += self.config.tick_step();
        }
    }

    fn handle_data_ready(&mut self, ticket: LoadTicket, reported: Option<f64>) {
        let track = match &self.state.load {
            LoadState::Loading {
                ticket: awaited,
                track,
            } if *awaited == ticket => track.clone(),
            _ => {
                debug!(%ticket, "ignoring stale load completion");
                return;
            }
        };

        let duration = match track.duration_secs() {
            Ok(duration) => duration,
            Err(e) => {
                warn!(track_id = track.id, error = %e, "unusable declared duration, using device metadata");
                reported.unwrap_or(0.0)
            }
        };

        self.state.duration = duration;
        self.state.current_time = 0.0;
        self.state.playing = true;
        self.start_progress();

        if let Err(e) = self.device.play() {
            self.fail_load(&track, &e.to_string());
            return;
        }

        self.state.load = LoadState::Idle;
        info!(track_id = track.id, duration, "track loaded");
        self.emit(PlayerEvent::LoadingFinished {
            track_id: track.id,
            duration,
        });
        self.emit_state_changed();
    }

    fn handle_load_failed(&mut self, ticket: LoadTicket, reason: &str) {
        let track = match &self.state.load {
            LoadState::Loading {
                ticket: awaited,
                track,
            } if *awaited == ticket => track.clone(),
            _ => {
                debug!(%ticket, reason, "ignoring stale load failure");
                return;
            }
        };

        self.fail_load(&track, reason);
    }

    /// Release the loading gate after a failed load and surface a notice
    fn fail_load(&mut self, track: &Track, reason: &str) {
        warn!(track_id = track.id, reason, "track failed to load");

        self.state.load = LoadState::Idle;
        self.timer.cancel();
        self.state.clear_source();

        self.emit(PlayerEvent::LoadFailed {
            track_id: track.id,
            reason: reason.to_string(),
        });
        self.emit_state_changed();
    }

    // ===== Volume =====

    /// Set volume (0-100), unmute, and persist
    pub async fn set_volume(&mut self, level: u8) {
        self.state.volume.set_level(level);
        self.state.volume.unmute();

        self.device.set_muted(false);
        self.device.set_volume(self.state.volume.device_level());

        let level = self.state.volume.level();
        if let Err(e) = self.settings.save_volume(level).await {
            warn!(error = %e, volume = level, "failed to persist volume");
        }
        self.emit_volume_changed();
    }

    /// Shift volume by `delta`, clamped to 0-100
    pub async fn add_volume(&mut self, delta: i32) {
        let level = self.state.volume.offset(delta);
        self.set_volume(level).await;
    }

    /// Toggle mute; the volume level is kept
    pub fn toggle_mute(&mut self) {
        self.state.volume.toggle_mute();
        self.device.set_muted(self.state.is_mute());
        self.emit_volume_changed();
    }

    // ===== Modes =====

    /// Step `Closed → LoopAll → LoopSingle → Closed`
    pub fn switch_loop_mode(&mut self) -> LoopMode {
        self.state.loop_mode = self.state.loop_mode.next();
        self.emit(PlayerEvent::LoopModeChanged {
            mode: self.state.loop_mode,
        });
        self.state.loop_mode
    }

    /// Toggle shuffle
    pub fn toggle_random(&mut self) -> bool {
        self.state.is_random = !self.state.is_random;
        self.emit(PlayerEvent::ShuffleChanged {
            enabled: self.state.is_random,
        });
        self.state.is_random
    }

    // ===== Seek =====

    /// Jump to `percent` of the duration
    ///
    /// Does not restart the progress timer; while playing, the UI is told
    /// via `TimeUpdateBegan` and resumes it with `begin_time_update`.
    pub fn handle_select_time(&mut self, percent: f64) {
        self.state.current_time = self.state.duration * percent / 100.0;
        self.device.set_current_time(self.state.current_time);

        if self.state.playing {
            self.emit(PlayerEvent::TimeUpdateBegan {
                position: self.state.current_time,
            });
        }
    }

    /// The user started dragging the seek control
    pub fn handle_input_time(&mut self) {
        self.timer.cancel();
    }

    /// Resume progress reporting after a scrub
    pub fn begin_time_update(&mut self) {
        if self.state.playing {
            self.start_progress();
        }
    }

    // ===== State Queries =====

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.state.snapshot()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether a progress timer is running
    pub fn is_timer_active(&self) -> bool {
        self.timer.is_active()
    }

    // ===== Events =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internal =====

    fn issue_ticket(&mut self) -> LoadTicket {
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }

    fn start_progress(&mut self) {
        self.timer.start(self.config.tick_period());
    }

    /// Mark not playing and stop progress, leaving the device alone
    fn halt(&mut self) {
        self.state.playing = false;
        self.timer.cancel();
        self.emit_state_changed();
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }

    fn emit_state_changed(&mut self) {
        self.emit(PlayerEvent::StateChanged {
            phase: self.state.phase(),
        });
    }

    fn emit_volume_changed(&mut self) {
        self.emit(PlayerEvent::VolumeChanged {
            level: self.state.volume.level(),
            is_muted: self.state.is_mute(),
        });
    }
}
