//! Playback Events
//!
//! Notifications for UI synchronisation. The manager queues them while it
//! handles a command, device event, or tick; the service drains the queue
//! after each step and broadcasts it.

use crate::types::{LoopMode, PlaybackPhase};
use cadenza_core::{Track, TrackId};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    /// Playback phase changed
    StateChanged { phase: PlaybackPhase },

    /// A new track was requested and is now the "now playing" selection
    TrackChanged { track: Track },

    /// Device load started; the UI shows a loading notice until it finishes
    LoadingStarted { track_id: TrackId },

    /// Device load finished and playback started
    LoadingFinished { track_id: TrackId, duration: f64 },

    /// Device load failed; user-visible notice
    LoadFailed { track_id: TrackId, reason: String },

    /// Volume or mute changed
    VolumeChanged { level: u8, is_muted: bool },

    /// Loop mode changed
    LoopModeChanged { mode: LoopMode },

    /// Shuffle toggled
    ShuffleChanged { enabled: bool },

    /// A scrub landed while playing; the UI resumes progress reporting
    TimeUpdateBegan { position: f64 },
}
