//! Cadenza Playback Management
//!
//! Transport control for a single audio output device: the load gate, loop
//! and shuffle policy, a progress timer, volume and mute, and scrubbing.
//!
//! # Features
//!
//! - **Loading gate**: play requests are dropped while a load is in flight
//! - **Loop modes**: Closed, LoopAll, LoopSingle
//! - **Shuffle**: uniform random pick, overrides loop mode
//! - **Progress**: tick-driven current time and `M:SS` formatting
//! - **Volume**: 0-100 with independent mute, persisted through `SettingsStore`
//!
//! # Example
//!
//! ```rust,no_run
//! use cadenza_playback::{
//!     Collaborators, InMemoryNowPlaying, InMemoryPlaylist, MemorySettingsStore,
//!     PlaybackService, PlayerConfig,
//! };
//! use cadenza_core::{OutputDevice, Track};
//! use std::sync::Arc;
//!
//! async fn run(device: Arc<dyn OutputDevice>) -> cadenza_playback::Result<()> {
//!     let tracks = vec![Track::new(1, "/media/intro.flac", "3:25")];
//!     let collaborators = Collaborators {
//!         device,
//!         playlist: Arc::new(InMemoryPlaylist::new(tracks.clone())),
//!         now_playing: Arc::new(InMemoryNowPlaying::new()),
//!         settings: Arc::new(MemorySettingsStore::new()),
//!     };
//!
//!     let (player, _task) = PlaybackService::spawn(PlayerConfig::default(), collaborators);
//!     player.play(tracks[0].clone()).await?;
//!     player.set_volume(80).await?;
//!
//!     let snapshot = player.snapshot().await?;
//!     println!("{} / {}", snapshot.current_time_str, snapshot.duration_str);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod manager;
pub mod memory;
pub mod query;
pub mod service;
pub mod shuffle;
pub mod source;
pub mod state;
pub mod timer;
pub mod types;
pub mod volume;

pub use config::PlayerConfig;
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use history::RecentPlays;
pub use manager::{Collaborators, PlaybackManager};
pub use memory::{InMemoryNowPlaying, InMemoryPlaylist, MemorySettingsStore};
pub use query::format_time;
pub use service::{PlaybackCommand, PlaybackHandle, PlaybackService};
pub use shuffle::ShufflePicker;
pub use source::resolve_source_path;
pub use state::PlaybackState;
pub use timer::{ProgressTimer, TimerId, TimerTick, TimerTickReceiver, TimerTickSender};
pub use types::{LoadState, LoopMode, PlaybackPhase, PlaybackSnapshot};
pub use volume::Volume;
