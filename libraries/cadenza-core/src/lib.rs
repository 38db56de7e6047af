//! Cadenza Core
//!
//! Platform-agnostic types, collaborator traits, and error handling shared by
//! the Cadenza playback crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, duration string parsing
//! - **Collaborator Traits**: `OutputDevice`, `Playlist`, `NowPlaying`, `SettingsStore`
//! - **Device Events**: completion notifications flowing back from the output device
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use cadenza_core::Track;
//!
//! let track = Track::new(7, "/media/intro.flac", "3:25");
//! assert_eq!(track.duration_secs().unwrap(), 205.0);
//! assert!(Track::empty().is_empty());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CoreError, Result};
pub use traits::{
    DeviceEvent, DeviceEventReceiver, DeviceEventSender, LoadTicket, NowPlaying, OutputDevice,
    Playlist, SettingsStore,
};
pub use types::{parse_time_str, Track, TrackId, EMPTY_TRACK_ID};
