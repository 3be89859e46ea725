// Host-side integration tests for the rain/sparkle field.

use app_core::constants::{
    FALL_SPEED, FIELD_BOUND_XZ, RAIN_COUNT, RAIN_FLOOR_Y, RAIN_SPAWN_Y_MAX, RAIN_SPAWN_Y_MIN,
    SPARKLE_AMPLITUDE, SPARKLE_COUNT,
};
use app_core::{RainField, SpriteContent};

fn run_ticks(field: &mut RainField, ticks: usize) -> Vec<usize> {
    let mut all = Vec::new();
    let mut recycled = Vec::new();
    for t in 0..ticks {
        recycled.clear();
        field.tick(t as f64 / 60.0, &mut recycled);
        all.extend_from_slice(&recycled);
    }
    all
}

#[test]
fn populations_are_fixed_over_many_ticks() {
    let mut field = RainField::new(7);
    assert_eq!(field.drops().len(), RAIN_COUNT);
    assert_eq!(field.sparkles().len(), SPARKLE_COUNT);
    run_ticks(&mut field, 10_000);
    assert_eq!(field.drops().len(), RAIN_COUNT);
    assert_eq!(field.sparkles().len(), SPARKLE_COUNT);
}

#[test]
fn drops_fall_by_speed_each_tick() {
    let mut field = RainField::new(11);
    let before: Vec<(f32, f32)> = field
        .drops()
        .iter()
        .map(|d| (d.position.y, d.fall_speed))
        .collect();
    let mut recycled = Vec::new();
    field.tick(0.0, &mut recycled);
    for (i, d) in field.drops().iter().enumerate() {
        if recycled.contains(&i) {
            continue;
        }
        let (y0, speed) = before[i];
        assert!(
            (d.position.y - (y0 - speed * FALL_SPEED)).abs() < 1e-5,
            "drop {i} moved by something other than its speed"
        );
        assert!(d.position.y < y0, "drop {i} did not fall");
    }
}

#[test]
fn recycled_drops_respawn_in_top_band() {
    let mut field = RainField::new(13);
    let mut recycled = Vec::new();
    let mut seen = 0usize;
    for t in 0..5_000 {
        recycled.clear();
        field.tick(t as f64 / 60.0, &mut recycled);
        for &i in &recycled {
            let d = &field.drops()[i];
            assert!(
                d.position.y >= RAIN_SPAWN_Y_MIN && d.position.y <= RAIN_SPAWN_Y_MAX,
                "respawned y {} outside the spawn band",
                d.position.y
            );
            assert!(d.position.x.abs() <= FIELD_BOUND_XZ);
            assert!(d.position.z.abs() <= FIELD_BOUND_XZ);
            assert!(d.position.y >= RAIN_FLOOR_Y);
            seen += 1;
        }
    }
    assert!(seen > 100, "expected plenty of recycles, saw {seen}");
}

#[test]
fn recycling_bumps_generation_once_per_event() {
    let mut field = RainField::new(17);
    let mut generations: Vec<u32> = field.drops().iter().map(|d| d.generation).collect();
    assert!(generations.iter().all(|&g| g == 0));
    let mut recycled = Vec::new();
    for t in 0..5_000 {
        recycled.clear();
        field.tick(t as f64 / 60.0, &mut recycled);
        for &i in &recycled {
            let g = field.drops()[i].generation;
            assert_eq!(g, generations[i] + 1, "generation must advance by one");
            generations[i] = g;
        }
    }
}

#[test]
fn sparkles_stay_inside_bounds() {
    let mut field = RainField::new(19);
    let bases: Vec<f32> = field.sparkles().iter().map(|s| s.base_y).collect();
    let mut recycled = Vec::new();
    for t in 0..50_000 {
        field.tick(t as f64 / 60.0, &mut recycled);
    }
    for (s, base) in field.sparkles().iter().zip(&bases) {
        assert!(s.position.x.abs() <= FIELD_BOUND_XZ + 1e-4);
        assert!(s.position.z.abs() <= FIELD_BOUND_XZ + 1e-4);
        assert!(
            (s.position.y - base).abs() <= SPARKLE_AMPLITUDE + 1e-4,
            "sparkle left its oscillation band"
        );
        assert!((s.base_y - base).abs() < f32::EPSILON, "base must not drift");
    }
}

#[test]
fn sparkle_height_is_a_pure_function_of_the_clock() {
    let mut field = RainField::new(23);
    let mut recycled = Vec::new();
    // Same elapsed time twice in a row: heights must agree exactly even
    // though x/z keep drifting.
    field.tick(12.5, &mut recycled);
    let first: Vec<f32> = field.sparkles().iter().map(|s| s.position.y).collect();
    field.tick(12.5, &mut recycled);
    for (s, y0) in field.sparkles().iter().zip(&first) {
        assert!((s.position.y - y0).abs() < f32::EPSILON);
    }
}

#[test]
fn heart_ratio_is_near_the_configured_weight() {
    let mut field = RainField::new(29);
    let mut recycled = Vec::new();
    let mut hearts = 0usize;
    let mut total = 0usize;
    for t in 0..30_000 {
        recycled.clear();
        field.tick(t as f64 / 60.0, &mut recycled);
        for &i in &recycled {
            total += 1;
            if field.drops()[i].content == SpriteContent::Heart {
                hearts += 1;
            }
        }
        if total >= 2_000 {
            break;
        }
    }
    assert!(total >= 2_000, "not enough recycles to sample: {total}");
    let ratio = hearts as f64 / total as f64;
    assert!(
        (0.15..=0.35).contains(&ratio),
        "heart ratio {ratio} far from configured 0.25"
    );
}
