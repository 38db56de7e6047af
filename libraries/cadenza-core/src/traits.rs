/// Collaborator traits for Cadenza playback
///
/// The playback core drives exactly one output device and reads sibling
/// state through these seams. Implementations live with the host
/// application (browser audio element, simulated device, stores).
use crate::error::Result;
use crate::types::Track;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

/// Identifies one `OutputDevice::load` request
///
/// Tickets increase monotonically per player. Completions carrying a ticket
/// other than the one currently awaited are stale and must be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoadTicket(pub u64);

impl fmt::Display for LoadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Notifications emitted by the output device
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// First frame/metadata of the requested source is available
    DataReady {
        ticket: LoadTicket,
        /// Duration reported by the media itself, if known
        duration: Option<f64>,
    },

    /// The requested source could not be loaded or decoded
    LoadFailed { ticket: LoadTicket, reason: String },

    /// Natural end of the current source
    Ended,
}

/// Sending half handed to the device on attach
pub type DeviceEventSender = mpsc::UnboundedSender<DeviceEvent>;

/// Receiving half consumed by the playback service
pub type DeviceEventReceiver = mpsc::UnboundedReceiver<DeviceEvent>;

/// Audio output device
///
/// Mirrors the surface of a media element: a single source slot, transport,
/// and a handful of mutable properties. `load` is asynchronous; its outcome
/// is reported as `DeviceEvent::DataReady` or `DeviceEvent::LoadFailed`.
pub trait OutputDevice: Send + Sync {
    /// Register the channel that receives this device's events
    fn attach(&self, events: DeviceEventSender);

    /// Begin loading `url`, replacing the current source
    fn load(&self, ticket: LoadTicket, url: &str);

    /// Start or resume rendering
    fn play(&self) -> Result<()>;

    /// Pause rendering
    fn pause(&self);

    /// Whether rendering is paused
    fn is_paused(&self) -> bool;

    /// Move the playhead (seconds)
    fn set_current_time(&self, seconds: f64);

    /// Linear volume, 0.0 to 1.0
    fn set_volume(&self, volume: f64);

    /// Mute flag, independent of volume
    fn set_muted(&self, muted: bool);

    /// Native looping of the current source
    fn set_loop(&self, looping: bool);
}

/// Ordered playlist owned by a sibling module
pub trait Playlist: Send + Sync {
    /// Current playing list, in order
    fn playing_list(&self) -> Vec<Track>;

    /// Append to recent-play history
    fn add_recent_play(&self, track: &Track);
}

/// "Now playing" selection owned by a sibling module
pub trait NowPlaying: Send + Sync {
    /// Currently selected track (empty sentinel when nothing is selected)
    fn playing_file(&self) -> Track;

    /// Replace the current selection
    fn set_playing_file(&self, track: Track);

    /// Whether the selected track already sits in recent-play history
    fn is_in_recent_play(&self) -> bool;
}

/// Persistent key/value settings surviving restarts
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Persisted volume (0-100), `None` if never saved
    async fn load_volume(&self) -> Result<Option<u8>>;

    /// Persist volume (0-100)
    async fn save_volume(&self, volume: u8) -> Result<()>;
}
