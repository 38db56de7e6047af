//! Shuffle selection
//!
//! Uniform random pick over the playing list. The current track is not
//! excluded, so the same track may be picked twice in a row.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random index source for shuffle playback
#[derive(Debug, Clone)]
pub struct ShufflePicker {
    rng: StdRng,
}

impl ShufflePicker {
    /// Deterministic picker when `seed` is set, entropy-seeded otherwise
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Uniform index in `0..len`, `None` for an empty list
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.gen_range(0..len))
        }
    }
}
