//! Recent-play history
//!
//! Bounded list of recently played tracks, most recent last. Re-playing a
//! track moves it to the most recent slot instead of duplicating it.

use cadenza_core::Track;
use std::collections::VecDeque;

/// Recent plays with bounded size
#[derive(Debug, Clone)]
pub struct RecentPlays {
    /// History buffer (most recent = back)
    tracks: VecDeque<Track>,

    /// Maximum history size
    max_size: usize,
}

impl RecentPlays {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a play
    ///
    /// An existing entry with the same id is moved to the back; if the
    /// history is full, the oldest entry is discarded.
    pub fn push(&mut self, track: Track) {
        if self.max_size == 0 {
            return;
        }

        self.tracks.retain(|existing| existing.id != track.id);
        if self.tracks.len() >= self.max_size {
            self.tracks.pop_front();
        }
        self.tracks.push_back(track);
    }

    /// All entries, oldest first
    pub fn to_vec(&self) -> Vec<Track> {
        self.tracks.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl Default for RecentPlays {
    fn default() -> Self {
        Self::new(100)
    }
}
