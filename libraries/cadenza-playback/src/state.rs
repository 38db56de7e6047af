//! Mutable playback record
//!
//! One instance per `PlaybackManager`. Only the manager mutates it; every
//! other consumer gets a shared reference or a `PlaybackSnapshot`.

use crate::types::{LoadState, LoopMode, PlaybackPhase};
use crate::volume::Volume;

/// Transport state
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Resolved URL of the requested source; empty when nothing is loaded
    ///
    /// Set as soon as a load is requested, so "already loaded" checks see it
    /// before the device confirms.
    pub source_path: String,

    /// Whether the device is rendering
    pub playing: bool,

    /// Elapsed seconds, advanced by the progress timer
    pub current_time: f64,

    /// Track length in seconds; set only on a successful load
    pub duration: f64,

    /// Volume level and mute flag
    pub volume: Volume,

    /// Progress ticks per second
    pub fps: u32,

    /// Auto-advance policy
    pub loop_mode: LoopMode,

    /// Shuffle: overrides loop mode for both natural end and manual navigation
    pub is_random: bool,

    /// Loading gate
    pub load: LoadState,
}

impl PlaybackState {
    /// Fresh state for a session
    pub fn new(fps: u32, volume: u8) -> Self {
        Self {
            source_path: String::new(),
            playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: Volume::new(volume),
            fps,
            loop_mode: LoopMode::Closed,
            is_random: false,
            load: LoadState::Idle,
        }
    }

    /// Whether a device load is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading { .. })
    }

    /// Whether audio is muted
    pub fn is_mute(&self) -> bool {
        self.volume.is_muted()
    }

    /// Coarse phase derived from the flags
    pub fn phase(&self) -> PlaybackPhase {
        if self.is_loading() {
            PlaybackPhase::Loading
        } else if self.source_path.is_empty() {
            PlaybackPhase::Idle
        } else if self.playing {
            PlaybackPhase::Playing
        } else {
            PlaybackPhase::Paused
        }
    }

    /// Drop the loaded source; loop, volume, and shuffle settings survive
    pub fn clear_source(&mut self) {
        self.source_path.clear();
        self.duration = 0.0;
        self.current_time = 0.0;
        self.playing = false;
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(5, 30)
    }
}
