//! Core types for playback management

use cadenza_core::{LoadTicket, Track};
use serde::{Deserialize, Serialize};

/// Loop mode
///
/// Governs automatic advancement when a track finishes naturally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoopMode {
    /// Stop at the end of the playlist
    #[default]
    Closed,

    /// Wrap to the start of the playlist
    LoopAll,

    /// Repeat the current track
    LoopSingle,
}

impl LoopMode {
    /// Next mode in the cycle `Closed → LoopAll → LoopSingle → Closed`
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            LoopMode::Closed => LoopMode::LoopAll,
            LoopMode::LoopAll => LoopMode::LoopSingle,
            LoopMode::LoopSingle => LoopMode::Closed,
        }
    }
}

/// Device load state
///
/// `Loading` is the admission gate for `play`: while it is set, further play
/// requests are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    /// No load in flight
    #[default]
    Idle,

    /// Waiting for the device to report on `ticket`
    Loading { ticket: LoadTicket, track: Track },
}

/// Coarse playback phase, derived from the state record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackPhase {
    /// No source loaded
    Idle,

    /// Load request in flight
    Loading,

    /// Currently playing
    Playing,

    /// Source loaded, not playing
    Paused,
}

/// Serialisable copy of the playback state with derived views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub phase: PlaybackPhase,
    pub source_path: String,
    pub playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub current_time_str: String,
    pub duration_str: String,
    /// `None` while duration is zero
    pub progress_percent: Option<f64>,
    pub volume: u8,
    pub is_mute: bool,
    pub loop_mode: LoopMode,
    pub is_random: bool,
    pub is_loading: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_mode_cycles() {
        assert_eq!(LoopMode::Closed.next(), LoopMode::LoopAll);
        assert_eq!(LoopMode::LoopAll.next(), LoopMode::LoopSingle);
        assert_eq!(LoopMode::LoopSingle.next(), LoopMode::Closed);
    }

    #[test]
    fn default_load_state_is_idle() {
        assert_eq!(LoadState::default(), LoadState::Idle);
        assert_eq!(LoopMode::default(), LoopMode::Closed);
    }
}
