//! Core domain types

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Track identifier assigned by the playlist store
pub type TrackId = u64;

/// Identifier of the "nothing selected" sentinel track
pub const EMPTY_TRACK_ID: TrackId = 0;

/// Track reference handed out by the playlist collaborator
///
/// The playback core reads `id`, `music_url` and `time` only. Display fields
/// ride along so the same value can be shown by the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique identifier (0 = empty sentinel)
    pub id: TrackId,

    /// Media source locator, possibly without the playable extension
    pub music_url: String,

    /// Declared duration, `H:MM:SS` or `M:SS`
    pub time: String,

    /// Track title
    #[serde(default)]
    pub title: String,

    /// Artist name
    #[serde(default)]
    pub artist: String,
}

impl Track {
    /// Create a track with the fields the playback core relies on
    pub fn new(id: TrackId, music_url: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            id,
            music_url: music_url.into(),
            time: time.into(),
            title: String::new(),
            artist: String::new(),
        }
    }

    /// The "nothing selected" sentinel
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the display title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the display artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    /// Whether this is the empty sentinel
    pub fn is_empty(&self) -> bool {
        self.id == EMPTY_TRACK_ID
    }

    /// Declared duration in seconds
    pub fn duration_secs(&self) -> Result<f64> {
        parse_time_str(&self.time)
    }
}

/// Parse a `H:MM:SS`, `M:SS` or bare-seconds string into seconds
///
/// Components are folded base-60 from the left, so `"1:02:03"` is 3723.
/// Only the last component may carry a fractional part.
pub fn parse_time_str(time: &str) -> Result<f64> {
    let trimmed = time.trim();
    let parts: Vec<&str> = trimmed.split(':').collect();

    if trimmed.is_empty() || parts.len() > 3 {
        return Err(CoreError::InvalidDuration(time.to_string()));
    }

    let (last, leading) = parts
        .split_last()
        .ok_or_else(|| CoreError::InvalidDuration(time.to_string()))?;

    let mut total = 0.0;
    for part in leading {
        let value: u64 = part
            .trim()
            .parse()
            .map_err(|_| CoreError::InvalidDuration(time.to_string()))?;
        total = total * 60.0 + value as f64;
    }

    let seconds: f64 = last
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidDuration(time.to_string()))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(CoreError::InvalidDuration(time.to_string()));
    }

    Ok(total * 60.0 + seconds)
}
