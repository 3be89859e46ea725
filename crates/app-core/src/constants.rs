// Shared tuning constants for the rain field, sprite sizing and audio
// transport, used by both the simulation core and the web frontend.

// World bounds
pub const FIELD_BOUND_XZ: f32 = 20.0; // x and z stay within [-20, 20]
pub const RAIN_SPAWN_Y_MIN: f32 = 20.0; // top spawn band
pub const RAIN_SPAWN_Y_MAX: f32 = 30.0;
pub const RAIN_FLOOR_Y: f32 = -10.0; // drops below this are recycled
pub const SPARKLE_BAND_Y: f32 = 10.0; // sparkle y starts within [-10, 10]

// Populations (fixed for the life of the field)
pub const RAIN_COUNT: usize = 60;
pub const SPARKLE_COUNT: usize = 80;

// Motion
pub const FALL_SPEED: f32 = 0.5; // global multiplier applied to per-drop speed
pub const DROP_SPEED_MIN: f32 = 0.1;
pub const DROP_SPEED_MAX: f32 = 0.5;
pub const SPARKLE_DRIFT_MAX: f32 = 0.005; // per-axis drift per tick
pub const SPARKLE_AMPLITUDE: f32 = 0.5; // vertical oscillation around base_y

// Content mix
pub const HEART_PROBABILITY: f64 = 0.25; // heart vs catalog word

// Text sprite sizing
pub const BASE_FONT_PX: f32 = 128.0;
pub const MIN_FONT_PX: f32 = 64.0;
pub const BASE_SURFACE_W: u32 = 1024;
pub const BASE_SURFACE_H: u32 = 256;
pub const MAX_TEXT_LEN: usize = 18; // chars before the font starts shrinking
pub const FONT_SHRINK_PER_CHAR: f32 = 6.0;
pub const SURFACE_PAD_PX: f32 = 32.0;

// World-space billboard scale (constant apparent size at base surface width)
pub const TEXT_SCALE_X: f32 = 6.5;
pub const TEXT_SCALE_Y: f32 = 1.625;

// Heart glyph
pub const HEART_SURFACE_PX: u32 = 512;
pub const HEART_FONT_PX: f32 = 160.0;
pub const HEART_SCALE: f32 = 5.0;

// Sparkle visuals
pub const GLOW_TEXTURE_SIZE: u32 = 128;
pub const SPARKLE_CORE_RADIUS: f32 = 0.12;
pub const SPARKLE_GLOW_SCALE: f32 = 1.2;
pub const SPARKLE_GLOW_OPACITY: f32 = 0.7;

// Camera
pub const CAMERA_DISTANCE: f32 = 50.0;
pub const CAMERA_FOVY_RADIANS: f32 = std::f32::consts::FRAC_PI_4;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;
pub const ORBIT_SENSITIVITY: f32 = 0.005; // radians per dragged pixel
pub const ORBIT_PITCH_LIMIT: f32 = 1.5; // keep the rig away from the poles

// Audio transport
pub const SEEK_STEP_SECONDS: f64 = 10.0; // arrow-key seek step

/// Fixed catalog the falling words are drawn from.
pub const WORDS: &[&str] = &[
    "Anh yêu em",
    "Yêu em nhiều",
    "Mãi yêu em",
    "Yêu em nhất",
    "Em là tất cả",
    "Tình yêu của chúng ta thật đẹp",
    "Yêu em mãi mãi",
    "Em là duy nhất",
    "Yêu em vô cùng",
    "Em là tình yêu của anh",
    "Yêu em thật nhiều",
    "Em là tất cả",
    "Yêu em nhất đời",
    "Em là tình yêu",
    "Yêu em vĩnh viễn",
];
