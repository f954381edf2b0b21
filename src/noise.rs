use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Seed used when the descriptor carries no `seed` directive and the
/// configuration does not override it.
pub const DEFAULT_SEED: u64 = 42;

/// Deterministic pseudorandom source shared by the blur, temporal blend and
/// audio noise paths.
///
/// Seeded exactly once when a filter is constructed and advanced for every
/// draw thereafter; it is never reset mid-stream, so two runs over the same
/// input with the same seed produce byte-identical output.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    rng: SmallRng,
}

impl NoiseSource {
    /// Create a source from an explicit seed value
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Draw an integer amplitude in the symmetric range `[-magnitude, magnitude]`
    pub fn amplitude(&mut self, magnitude: i32) -> i32 {
        if magnitude <= 0 {
            return 0;
        }
        self.rng.gen_range(-magnitude..=magnitude)
    }

    /// Draw a mix ratio in `[floor, ceil)`
    pub fn mix(&mut self, floor: f32, ceil: f32) -> f32 {
        if ceil <= floor {
            return floor;
        }
        self.rng.gen_range(floor..ceil)
    }

    /// Draw a sample offset in the symmetric range `[-scale, scale]`
    pub fn level(&mut self, scale: f64) -> f64 {
        if scale <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-scale..=scale)
    }
}

impl Default for NoiseSource {
    fn default() -> Self {
        Self::from_seed(DEFAULT_SEED)
    }
}
