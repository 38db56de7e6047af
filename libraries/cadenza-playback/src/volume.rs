//! Volume control
//!
//! Volume range is 0-100%. The output device takes a linear 0.0-1.0 value,
//! and mute is carried as a separate flag so muting never touches the level.

/// Volume level with an independent mute flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume, clamped to 100
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
            muted: false,
        }
    }

    /// Set volume level (0-100)
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
    }

    /// Get current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Level after applying `delta`, clamped to 0-100
    pub fn offset(&self, delta: i32) -> u8 {
        i32::from(self.level).saturating_add(delta).clamp(0, 100) as u8
    }

    /// Unmute audio (level untouched)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Linear value for the output device (mute is applied separately)
    pub fn device_level(&self) -> f64 {
        f64::from(self.level) / 100.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(30)
    }
}
