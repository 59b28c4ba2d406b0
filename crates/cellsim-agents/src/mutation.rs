//! Trait mutation applied to every newborn.
//!
//! A mutation picks one of the six heritable traits uniformly and decides
//! whether the change is deleterious ([`DELETERIOUS_MUTATION_RATE`]) or
//! beneficial. The size of the change is
//!
//! ```text
//! magnitude = base * mutation_step_multiplier * fuzz
//! fuzz      = 1 + (|N(0, 1)| + 1) / 20
//! ```
//!
//! so a fresh lineage moves a trait by roughly 5% to 20% of its base step.
//! Vision, speed, and trail size have floors; efficiency and bite size
//! scale multiplicatively and never cross zero. The step multiplier itself
//! only ever grows.

use cellsim_types::{TraitKind, Traits};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::config::DELETERIOUS_MUTATION_RATE;

/// Additive vision step before scaling.
const VISION_BASE: f64 = 1.0;
/// Multiplicative efficiency step before scaling.
const EFFICIENCY_BASE: f64 = 1.05;
/// Additive speed step before scaling.
const SPEED_BASE: f64 = 0.25;
/// Additive trail-size step before scaling.
const TRAIL_SIZE_BASE: f64 = 1.0;
/// Multiplicative bite-size step before scaling.
const BITE_SIZE_BASE: f64 = 1.05;
/// Growth factor of the mutation step multiplier.
const STEP_MULTIPLIER_GROWTH: f64 = 1.5;

/// Smallest field of view.
pub const MIN_VISION: u32 = 1;
/// Smallest speed.
pub const MIN_SPEED: f64 = 0.01;
/// Shortest trail.
pub const MIN_TRAIL_SIZE: u32 = 2;

/// Record of one applied mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    /// The trait that changed.
    pub trait_kind: TraitKind,
    /// Whether the change made the cell worse off.
    pub deleterious: bool,
}

/// Mutate exactly one trait of `traits` in place.
pub fn mutate<R: Rng + ?Sized>(traits: &mut Traits, rng: &mut R) -> Mutation {
    let deleterious = rng.random_bool(DELETERIOUS_MUTATION_RATE);
    let fuzz = fuzz_factor(rng);
    let index = rng.random_range(0..TraitKind::ALL.len());
    let trait_kind = TraitKind::ALL
        .get(index)
        .copied()
        .unwrap_or(TraitKind::Vision);

    apply(traits, trait_kind, deleterious, fuzz);
    Mutation {
        trait_kind,
        deleterious,
    }
}

/// `1 + (|z| + 1) / 20` for a standard normal draw `z`.
pub fn fuzz_factor<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    1.0 + (z.abs() + 1.0) / 20.0
}

/// Apply one mutation with a known direction and fuzz.
pub fn apply(traits: &mut Traits, trait_kind: TraitKind, deleterious: bool, fuzz: f64) {
    let scale = traits.mutation_step_multiplier * fuzz;
    match trait_kind {
        TraitKind::Vision => {
            let step = rounded_step(VISION_BASE * scale);
            traits.vision = shift(traits.vision, step, deleterious).max(MIN_VISION);
        }
        TraitKind::Efficiency => {
            let factor = EFFICIENCY_BASE * scale;
            if deleterious {
                traits.efficiency *= factor;
            } else {
                traits.efficiency /= factor;
            }
        }
        TraitKind::Speed => {
            let step = SPEED_BASE * scale;
            let speed = if deleterious {
                traits.speed - step
            } else {
                traits.speed + step
            };
            traits.speed = speed.max(MIN_SPEED);
        }
        TraitKind::TrailSize => {
            let step = rounded_step(TRAIL_SIZE_BASE * scale);
            traits.trail_size = shift(traits.trail_size, step, deleterious).max(MIN_TRAIL_SIZE);
        }
        TraitKind::BiteSize => {
            let factor = BITE_SIZE_BASE * scale;
            if deleterious {
                traits.bite_size /= factor;
            } else {
                traits.bite_size *= factor;
            }
        }
        TraitKind::MutationStepMultiplier => {
            traits.mutation_step_multiplier *= STEP_MULTIPLIER_GROWTH;
        }
    }
}

const fn shift(value: u32, step: u32, down: bool) -> u32 {
    if down {
        value.saturating_sub(step)
    } else {
        value.saturating_add(step)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rounded_step(magnitude: f64) -> u32 {
    let rounded = magnitude.round();
    if !rounded.is_finite() || rounded <= 0.0 {
        0
    } else if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}
