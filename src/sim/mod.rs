//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Animations counted in ticks, never wall-clock time
//! - Stable iteration order (block list order)
//! - No rendering or platform dependencies

pub mod animation;
pub mod collision;
pub mod geometry;
pub mod level;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use animation::{FrameAnimation, Playback};
pub use collision::{BlockCollision, BoundsOutcome, nearest_block_collision, paddle_bounce_direction};
pub use geometry::{HitAxis, Rect, Segment, segment_intersection, swept_rect_hit};
pub use level::{LevelDef, LevelError, LevelSet};
pub use snapshot::Snapshot;
pub use state::{
    Ball, BallHold, Block, BlockKind, BlockState, GameEvent, GamePhase, GameState, HitOutcome,
    Paddle, PaddleKind, Scoreboard,
};
pub use tick::{ResolvedHit, TickInput, resolve_block_collisions, tick};
