//! Random-chance helpers
//!
//! The combat code rolls 1-in-n chances pervasively (attrition, passive
//! regeneration, shoving). Everything takes `impl Rng` so the simulation can
//! run on a seeded ChaCha8 stream and tests can assert exact outcomes.

use rand::Rng;

use crate::core::types::Vec2;

/// Roll a 1-in-n chance
pub fn chance(rng: &mut impl Rng, one_in: u32) -> bool {
    one_in > 0 && rng.gen_range(0..one_in) == 0
}

/// Roll a probability in [0, 1]. Values above 1 always hit.
pub fn probability(rng: &mut impl Rng, p: f32) -> bool {
    if p <= 0.0 {
        false
    } else if p >= 1.0 {
        true
    } else {
        rng.gen_bool(p as f64)
    }
}

/// Uniform jitter vector with each component in [-radius, radius]
pub fn jitter(rng: &mut impl Rng, radius: f32) -> Vec2 {
    if radius <= 0.0 {
        return Vec2::default();
    }
    Vec2::new(
        rng.gen_range(-radius..=radius),
        rng.gen_range(-radius..=radius),
    )
}
