//! Drifting cloud particles
//!
//! Clouds move right at a constant per-tick velocity, leave past the right
//! edge and come back from the left after a randomized delay.

mod clouds;

pub use clouds::{CloudField, CloudLayer, CloudParams, CloudParticle, CloudSeed, CloudTick};
