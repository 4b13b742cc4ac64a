//! Data-driven game constants
//!
//! Defaults come from [`crate::consts`]. A JSON document may override any
//! subset of fields; missing fields keep their default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading tuning overrides
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}

/// Width and height of one paddle type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleSize {
    pub width: f32,
    pub height: f32,
}

/// All simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field_width: f32,
    pub field_height: f32,
    pub border_width: f32,

    pub block_width: f32,
    pub block_height: f32,

    pub ball_width: f32,
    pub ball_height: f32,
    /// Distance travelled per tick
    pub ball_velocity: f32,
    /// Launch heading in radians from the horizontal axis
    pub launch_angle: f32,
    /// Ticks per ball sprite frame while the ball is moving
    pub ball_frame_ticks: u32,
    pub ball_frames: u8,

    pub paddle_bounce_factor: f32,
    /// Paddle top edge as a fraction of field height
    pub paddle_row: f32,
    /// Paddle type shown while the level intro plays
    pub spawn_paddle: PaddleSize,
    /// Paddle type used for play
    pub normal_paddle: PaddleSize,
    pub paddle_spawn_frames: u8,
    pub paddle_spawn_step_ticks: u32,

    pub block_flash_frames: u8,
    pub block_flash_step_ticks: u32,

    pub collision_padding: f32,
    /// Length of the frozen level intro
    pub intro_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            border_width: BORDER_WIDTH,
            block_width: BLOCK_WIDTH,
            block_height: BLOCK_HEIGHT,
            ball_width: BALL_WIDTH,
            ball_height: BALL_HEIGHT,
            ball_velocity: BALL_VELOCITY,
            launch_angle: LAUNCH_ANGLE,
            ball_frame_ticks: 6,
            ball_frames: 4,
            paddle_bounce_factor: PADDLE_BOUNCE_FACTOR,
            paddle_row: PADDLE_ROW,
            spawn_paddle: PaddleSize {
                width: 24.0,
                height: 8.0,
            },
            normal_paddle: PaddleSize {
                width: 32.0,
                height: 8.0,
            },
            paddle_spawn_frames: 6,
            paddle_spawn_step_ticks: 20,
            block_flash_frames: 6,
            block_flash_step_ticks: 4,
            collision_padding: COLLISION_PADDING,
            intro_ticks: 150,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let inner_width = self.field_width - 2.0 * self.border_width;
        if inner_width <= 0.0 || self.field_height <= self.border_width {
            return Err(TuningError::Invalid("field is smaller than its borders"));
        }
        if self.ball_velocity <= 0.0 {
            return Err(TuningError::Invalid("ball velocity must be positive"));
        }
        if self.ball_width <= 0.0 || self.ball_height <= 0.0 {
            return Err(TuningError::Invalid("ball size must be positive"));
        }
        if self.block_width <= 0.0 || self.block_height <= 0.0 {
            return Err(TuningError::Invalid("block size must be positive"));
        }
        for paddle in [self.spawn_paddle, self.normal_paddle] {
            if paddle.width <= 0.0 || paddle.height <= 0.0 {
                return Err(TuningError::Invalid("paddle size must be positive"));
            }
            if paddle.width > inner_width {
                return Err(TuningError::Invalid("paddle is wider than the field"));
            }
        }
        if !(0.0..=1.0).contains(&self.paddle_row) {
            return Err(TuningError::Invalid("paddle row must be within 0..=1"));
        }
        if self.paddle_spawn_frames == 0 || self.block_flash_frames == 0 || self.ball_frames == 0
        {
            return Err(TuningError::Invalid("animations need at least one frame"));
        }
        Ok(())
    }

    /// Left wall (inner edge)
    #[inline]
    pub fn min_x(&self) -> f32 {
        self.border_width
    }

    /// Right wall (inner edge)
    #[inline]
    pub fn max_x(&self) -> f32 {
        self.field_width - self.border_width
    }

    /// Ceiling (inner edge)
    #[inline]
    pub fn min_y(&self) -> f32 {
        self.border_width
    }

    /// Loss line: a ball whose bottom edge passes this is gone
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.field_height
    }

    /// Top edge of the paddle row
    #[inline]
    pub fn paddle_y(&self) -> f32 {
        self.field_height * self.paddle_row
    }
}
