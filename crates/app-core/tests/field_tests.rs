// Host-side tests for the uniform samplers.

use app_core::constants::{
    DROP_SPEED_MAX, DROP_SPEED_MIN, FIELD_BOUND_XZ, RAIN_SPAWN_Y_MAX, RAIN_SPAWN_Y_MIN,
    SPARKLE_BAND_Y, SPARKLE_DRIFT_MAX,
};
use app_core::field;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn rain_spawn_positions_stay_in_the_band() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..10_000 {
        let p = field::rain_spawn_position(&mut rng);
        assert!(p.x.abs() <= FIELD_BOUND_XZ);
        assert!(p.z.abs() <= FIELD_BOUND_XZ);
        assert!(p.y >= RAIN_SPAWN_Y_MIN && p.y <= RAIN_SPAWN_Y_MAX);
    }
}

#[test]
fn sparkle_positions_fill_the_volume() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut above = 0usize;
    for _ in 0..10_000 {
        let p = field::sparkle_position(&mut rng);
        assert!(p.x.abs() <= FIELD_BOUND_XZ);
        assert!(p.z.abs() <= FIELD_BOUND_XZ);
        assert!(p.y.abs() <= SPARKLE_BAND_Y);
        if p.y > 0.0 {
            above += 1;
        }
    }
    // Roughly half above the midplane; a heavily skewed split would mean
    // the band is not actually being sampled.
    assert!((3_000..=7_000).contains(&above));
}

#[test]
fn fall_speeds_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..10_000 {
        let s = field::fall_speed(&mut rng);
        assert!((DROP_SPEED_MIN..=DROP_SPEED_MAX).contains(&s));
    }
}

#[test]
fn drift_and_phase_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..10_000 {
        let (dx, dz) = field::sparkle_drift(&mut rng);
        assert!(dx.abs() <= SPARKLE_DRIFT_MAX);
        assert!(dz.abs() <= SPARKLE_DRIFT_MAX);
        let phase = field::sparkle_phase(&mut rng);
        assert!((0.0..std::f32::consts::TAU).contains(&phase));
    }
}
