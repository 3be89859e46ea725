//! Uniform sampling of spawn positions, speeds and drifts within the
//! configured world bounds.

use crate::constants::{
    DROP_SPEED_MAX, DROP_SPEED_MIN, FIELD_BOUND_XZ, RAIN_SPAWN_Y_MAX, RAIN_SPAWN_Y_MIN,
    SPARKLE_BAND_Y, SPARKLE_DRIFT_MAX,
};
use glam::Vec3;
use rand::Rng;

/// Position in the top spawn band for a new or recycled rain drop.
pub fn rain_spawn_position(rng: &mut impl Rng) -> Vec3 {
    Vec3::new(
        rng.gen_range(-FIELD_BOUND_XZ..=FIELD_BOUND_XZ),
        rng.gen_range(RAIN_SPAWN_Y_MIN..=RAIN_SPAWN_Y_MAX),
        rng.gen_range(-FIELD_BOUND_XZ..=FIELD_BOUND_XZ),
    )
}

/// Position anywhere in the sparkle volume (full vertical band).
pub fn sparkle_position(rng: &mut impl Rng) -> Vec3 {
    Vec3::new(
        rng.gen_range(-FIELD_BOUND_XZ..=FIELD_BOUND_XZ),
        rng.gen_range(-SPARKLE_BAND_Y..=SPARKLE_BAND_Y),
        rng.gen_range(-FIELD_BOUND_XZ..=FIELD_BOUND_XZ),
    )
}

/// Per-drop fall speed, scaled each tick by the global fall-speed constant.
pub fn fall_speed(rng: &mut impl Rng) -> f32 {
    rng.gen_range(DROP_SPEED_MIN..=DROP_SPEED_MAX)
}

/// Per-axis horizontal drift applied to a sparkle every tick.
pub fn sparkle_drift(rng: &mut impl Rng) -> (f32, f32) {
    (
        rng.gen_range(-SPARKLE_DRIFT_MAX..=SPARKLE_DRIFT_MAX),
        rng.gen_range(-SPARKLE_DRIFT_MAX..=SPARKLE_DRIFT_MAX),
    )
}

/// Phase offset for the sparkle's vertical oscillation.
pub fn sparkle_phase(rng: &mut impl Rng) -> f32 {
    rng.gen_range(0.0..std::f32::consts::TAU)
}
