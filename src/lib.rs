//! Brick Breaker - a pixel-art brick-breaker arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (swept collisions, bounce rules, level flow)
//! - `tuning`: Data-driven game constants
//! - `settings`: Player preferences
//! - `audio`: Event-driven sound effects

pub mod audio;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 100;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field (pixels, excludes the score strip below it)
    pub const FIELD_WIDTH: f32 = 224.0;
    pub const FIELD_HEIGHT: f32 = 256.0;
    /// Wall thickness on the left, right and top
    pub const BORDER_WIDTH: f32 = 8.0;

    /// Every block shares one size
    pub const BLOCK_WIDTH: f32 = 16.0;
    pub const BLOCK_HEIGHT: f32 = 8.0;

    /// Ball defaults
    pub const BALL_WIDTH: f32 = 5.0;
    pub const BALL_HEIGHT: f32 = 4.0;
    /// Distance travelled per tick
    pub const BALL_VELOCITY: f32 = 2.5;
    /// Launch heading, measured from the horizontal axis
    pub const LAUNCH_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

    /// Scales the paddle-relative hit offset, bounding the steepest rebound
    pub const PADDLE_BOUNCE_FACTOR: f32 = 0.75;
    /// Paddle top edge as a fraction of field height
    pub const PADDLE_ROW: f32 = 0.9;

    /// Outward margin added to block edges before the swept test
    pub const COLLISION_PADDING: f32 = 2.0;
}

/// Intersect two inclusive ranges, returning the clamped value.
///
/// Unlike `f32::clamp`, an inverted range (min > max) collapses to `min`
/// instead of panicking.
#[inline]
pub fn clamp_to(value: f32, min: f32, max: f32) -> f32 {
    if max < min {
        return min;
    }
    value.max(min).min(max)
}
