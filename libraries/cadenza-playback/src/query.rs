//! Derived views over the playback state

use crate::state::PlaybackState;
use crate::types::PlaybackSnapshot;

/// Format seconds as `M:SS`
///
/// Seconds are floored and zero-padded to two digits; minutes are unpadded.
/// Negative and non-finite inputs format as `0:00`.
pub fn format_time(time: f64) -> String {
    let total = if time.is_finite() && time > 0.0 {
        time.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

impl PlaybackState {
    /// Elapsed time for display, never past the duration
    pub fn current_time_str(&self) -> String {
        format_time(self.current_time.min(self.duration))
    }

    /// Total time for display
    pub fn duration_str(&self) -> String {
        format_time(self.duration)
    }

    /// `current_time / duration * 100`
    ///
    /// NaN or infinite when `duration` is zero; use `progress_percent` for a
    /// guarded value.
    pub fn time_percent(&self) -> f64 {
        self.current_time / self.duration * 100.0
    }

    /// `time_percent`, or `None` before a duration is known
    pub fn progress_percent(&self) -> Option<f64> {
        if self.duration > 0.0 {
            Some(self.time_percent())
        } else {
            None
        }
    }

    /// Serialisable copy including the formatted views
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            phase: self.phase(),
            source_path: self.source_path.clone(),
            playing: self.playing,
            current_time: self.current_time,
            duration: self.duration,
            current_time_str: self.current_time_str(),
            duration_str: self.duration_str(),
            progress_percent: self.progress_percent(),
            volume: self.volume.level(),
            is_mute: self.is_mute(),
            loop_mode: self.loop_mode,
            is_random: self.is_random,
            is_loading: self.is_loading(),
        }
    }
}
