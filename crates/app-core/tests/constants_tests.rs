// Host-side tests for constants and their relationships.

use app_core::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn world_bounds_are_consistent() {
    assert!(FIELD_BOUND_XZ > 0.0);
    assert!(RAIN_SPAWN_Y_MIN < RAIN_SPAWN_Y_MAX);
    // Drops must have room to fall before recycling.
    assert!(RAIN_FLOOR_Y < RAIN_SPAWN_Y_MIN);
    assert!(SPARKLE_BAND_Y > 0.0);
    assert!(SPARKLE_BAND_Y <= FIELD_BOUND_XZ);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn motion_constants_are_positive_and_ordered() {
    assert!(FALL_SPEED > 0.0);
    assert!(DROP_SPEED_MIN > 0.0);
    assert!(DROP_SPEED_MIN < DROP_SPEED_MAX);
    assert!(SPARKLE_DRIFT_MAX > 0.0);
    assert!(SPARKLE_AMPLITUDE > 0.0);
    // Drift per tick must stay tiny relative to the field, or wrap events
    // would dominate the motion.
    assert!(SPARKLE_DRIFT_MAX < FIELD_BOUND_XZ / 100.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn populations_and_weights_are_sane() {
    assert!(RAIN_COUNT > 0);
    assert!(SPARKLE_COUNT > 0);
    assert!(HEART_PROBABILITY > 0.0 && HEART_PROBABILITY < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn sprite_sizing_is_consistent() {
    assert!(MIN_FONT_PX <= BASE_FONT_PX);
    assert!(MAX_TEXT_LEN > 0);
    assert!(BASE_SURFACE_W > 0 && BASE_SURFACE_H > 0);
    assert!(FONT_SHRINK_PER_CHAR > 0.0);
    assert!(SURFACE_PAD_PX >= 0.0);
    assert!(TEXT_SCALE_X > 0.0 && TEXT_SCALE_Y > 0.0);
    assert!(HEART_SURFACE_PX > 0);
    assert!(HEART_SCALE > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn sparkle_visuals_are_consistent() {
    assert!(GLOW_TEXTURE_SIZE > 0);
    assert!(SPARKLE_GLOW_OPACITY > 0.0 && SPARKLE_GLOW_OPACITY <= 1.0);
    // The bright core must sit well inside the glow quad.
    assert!(SPARKLE_CORE_RADIUS < SPARKLE_GLOW_SCALE / 2.0);
}

#[test]
fn word_catalog_is_well_formed() {
    assert!(!WORDS.is_empty());
    for w in WORDS {
        assert!(!w.is_empty());
        assert!(w.chars().count() <= 64, "implausibly long catalog entry");
    }
    // At least one entry exercises the long-text layout path.
    assert!(WORDS.iter().any(|w| w.chars().count() > MAX_TEXT_LEN));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_constants_are_usable() {
    assert!(CAMERA_DISTANCE > 0.0);
    assert!(CAMERA_ZNEAR > 0.0 && CAMERA_ZNEAR < CAMERA_ZFAR);
    assert!(CAMERA_FOVY_RADIANS > 0.0 && CAMERA_FOVY_RADIANS < std::f32::consts::PI);
    assert!(ORBIT_PITCH_LIMIT < std::f32::consts::FRAC_PI_2);
    assert!(SEEK_STEP_SECONDS > 0.0);
}
