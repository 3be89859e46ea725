use crate::constants::{
    FALL_SPEED, FIELD_BOUND_XZ, HEART_PROBABILITY, RAIN_COUNT, RAIN_FLOOR_Y, SPARKLE_AMPLITUDE,
    SPARKLE_COUNT, WORDS,
};
use crate::field;
use crate::sprite::SpriteContent;
use glam::Vec3;
use rand::prelude::*;

/// One falling billboard. The slot index is its identity for the renderer;
/// `generation` increments whenever the slot is recycled so stale visuals
/// can be detected and rebuilt.
#[derive(Clone, Debug)]
pub struct RainDrop {
    pub content: SpriteContent,
    pub position: Vec3,
    pub fall_speed: f32,
    pub generation: u32,
}

/// Ambient glow particle. Created once, never replaced: it only drifts,
/// oscillates and wraps.
#[derive(Clone, Debug)]
pub struct Sparkle {
    pub position: Vec3,
    pub base_y: f32,
    pub drift_x: f32,
    pub drift_z: f32,
    pub phase: f32,
}

/// Owns the two transient populations and the random source that feeds
/// spawn positions, speeds and content choices.
pub struct RainField {
    drops: Vec<RainDrop>,
    sparkles: Vec<Sparkle>,
    rng: StdRng,
}

impl RainField {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let drops = (0..RAIN_COUNT)
            .map(|_| RainDrop {
                content: draw_content(&mut rng),
                position: field::rain_spawn_position(&mut rng),
                fall_speed: field::fall_speed(&mut rng),
                generation: 0,
            })
            .collect();
        let sparkles = (0..SPARKLE_COUNT)
            .map(|_| {
                let position = field::sparkle_position(&mut rng);
                let (drift_x, drift_z) = field::sparkle_drift(&mut rng);
                Sparkle {
                    position,
                    base_y: position.y,
                    drift_x,
                    drift_z,
                    phase: field::sparkle_phase(&mut rng),
                }
            })
            .collect();
        Self {
            drops,
            sparkles,
            rng,
        }
    }

    pub fn drops(&self) -> &[RainDrop] {
        &self.drops
    }

    pub fn sparkles(&self) -> &[Sparkle] {
        &self.sparkles
    }

    /// Advance one frame.
    ///
    /// Drops fall by `fall_speed * FALL_SPEED`; a drop crossing the floor is
    /// recycled in place (new content, position and speed, bumped
    /// generation) and its slot index is appended to `recycled`. Sparkle
    /// height is a pure function of `elapsed_secs`, so pausing the loop
    /// never accumulates drift. Slots are processed in index order and
    /// entities never interact.
    pub fn tick(&mut self, elapsed_secs: f64, recycled: &mut Vec<usize>) {
        for (i, d) in self.drops.iter_mut().enumerate() {
            d.position.y -= d.fall_speed * FALL_SPEED;
            if d.position.y < RAIN_FLOOR_Y {
                d.content = draw_content(&mut self.rng);
                d.position = field::rain_spawn_position(&mut self.rng);
                d.fall_speed = field::fall_speed(&mut self.rng);
                d.generation = d.generation.wrapping_add(1);
                recycled.push(i);
            }
        }

        for s in &mut self.sparkles {
            s.position.x += s.drift_x;
            s.position.z += s.drift_z;
            s.position.y = s.base_y + SPARKLE_AMPLITUDE * (elapsed_secs as f32 + s.phase).sin();
            // Teleport to the opposite bound, no bounce.
            if s.position.x < -FIELD_BOUND_XZ {
                s.position.x = FIELD_BOUND_XZ;
            } else if s.position.x > FIELD_BOUND_XZ {
                s.position.x = -FIELD_BOUND_XZ;
            }
            if s.position.z < -FIELD_BOUND_XZ {
                s.position.z = FIELD_BOUND_XZ;
            } else if s.position.z > FIELD_BOUND_XZ {
                s.position.z = -FIELD_BOUND_XZ;
            }
        }
    }
}

fn draw_content(rng: &mut StdRng) -> SpriteContent {
    if rng.gen_bool(HEART_PROBABILITY) {
        SpriteContent::Heart
    } else {
        SpriteContent::Word(WORDS[rng.gen_range(0..WORDS.len())])
    }
}
