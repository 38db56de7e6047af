//! In-memory collaborators
//!
//! Lightweight implementations of the collaborator traits for embedding
//! hosts without their own stores, headless tools, and tests.

use crate::history::RecentPlays;
use async_trait::async_trait;
use cadenza_core::{NowPlaying, Playlist, Result, SettingsStore, Track};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

/// Playlist backed by a vector plus a bounded recent-play history
#[derive(Debug, Default)]
pub struct InMemoryPlaylist {
    tracks: RwLock<Vec<Track>>,
    recent: RwLock<RecentPlays>,
}

impl InMemoryPlaylist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks: RwLock::new(tracks),
            recent: RwLock::new(RecentPlays::default()),
        }
    }

    /// Replace the playing list
    pub fn set_tracks(&self, tracks: Vec<Track>) {
        *self.tracks.write().unwrap_or_else(PoisonError::into_inner) = tracks;
    }

    /// Recent plays, oldest first
    pub fn recent_plays(&self) -> Vec<Track> {
        self.recent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .to_vec()
    }
}

impl Playlist for InMemoryPlaylist {
    fn playing_list(&self) -> Vec<Track> {
        self.tracks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn add_recent_play(&self, track: &Track) {
        self.recent
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(track.clone());
    }
}

/// "Now playing" selection
#[derive(Debug, Default)]
pub struct InMemoryNowPlaying {
    current: RwLock<Track>,
    in_recent_play: AtomicBool,
}

impl InMemoryNowPlaying {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark whether the selection is being played from the recent-play view
    pub fn set_in_recent_play(&self, in_recent_play: bool) {
        self.in_recent_play.store(in_recent_play, Ordering::SeqCst);
    }
}

impl NowPlaying for InMemoryNowPlaying {
    fn playing_file(&self) -> Track {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_playing_file(&self, track: Track) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = track;
    }

    fn is_in_recent_play(&self) -> bool {
        self.in_recent_play.load(Ordering::SeqCst)
    }
}

/// Volume setting that lives for the process only
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    volume: Mutex<Option<u8>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a saved volume
    pub fn with_volume(volume: u8) -> Self {
        Self {
            volume: Mutex::new(Some(volume)),
        }
    }

    /// Last saved volume
    pub fn saved_volume(&self) -> Option<u8> {
        *self.volume.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load_volume(&self) -> Result<Option<u8>> {
        Ok(self.saved_volume())
    }

    async fn save_volume(&self, volume: u8) -> Result<()> {
        *self.volume.lock().unwrap_or_else(PoisonError::into_inner) = Some(volume);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_records_recent_plays() {
        let playlist = InMemoryPlaylist::new(vec![Track::new(1, "/a", "1:00")]);
        assert_eq!(playlist.playing_list().len(), 1);

        playlist.add_recent_play(&Track::new(1, "/a", "1:00"));
        assert_eq!(playlist.recent_plays().len(), 1);
    }

    #[test]
    fn now_playing_starts_empty() {
        let now_playing = InMemoryNowPlaying::new();
        assert!(now_playing.playing_file().is_empty());
        assert!(!now_playing.is_in_recent_play());

        now_playing.set_playing_file(Track::new(2, "/b", "2:00"));
        assert_eq!(now_playing.playing_file().id, 2);
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.load_volume().await.unwrap(), None);

        store.save_volume(55).await.unwrap();
        assert_eq!(store.load_volume().await.unwrap(), Some(55));
    }
}
