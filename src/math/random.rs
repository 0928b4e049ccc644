//! Random sampling used for cloud spawning, hill ratios and branch jitter.
//!
//! Everything random in the scene goes through [`RandomRange`], so tests can
//! swap in a seeded generator or a scripted sequence.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Source of uniform samples
pub trait RandomRange {
    /// Uniform sample in `[min, max)`; returns `min` when the range is empty
    fn random_in_range(&mut self, min: f32, max: f32) -> f32;

    /// Fair coin flip
    fn coin_flip(&mut self) -> bool {
        self.random_in_range(0.0, 1.0) < 0.5
    }
}

/// Sampling interval `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: RandomRange + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.random_in_range(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value < self.max
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Production generator for the scene
#[derive(Debug, Clone)]
pub struct SceneRng {
    rng: SmallRng,
}

impl SceneRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RandomRange for SceneRng {
    fn random_in_range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    fn coin_flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

/// Replays a fixed list of unit samples, scaled into each requested range.
///
/// Samples are taken from `[0, 1)` and wrap around when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    samples: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples, cursor: 0 }
    }

    /// Always returns the same unit sample
    pub fn constant(sample: f32) -> Self {
        Self::new(vec![sample])
    }

    fn next_unit(&mut self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sample = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        sample.clamp(0.0, 0.999_999)
    }
}

impl RandomRange for ScriptedRandom {
    fn random_in_range(&mut self, min: f32, max: f32) -> f32 {
        let t = self.next_unit();
        if max <= min {
            return min;
        }
        min + (max - min) * t
    }
}
