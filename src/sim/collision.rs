//! Collision detection and response for the ball
//!
//! Blocks use a swept test: the ball's center path for the tick is crossed
//! against the padded block faces that oppose its travel, so even a fast
//! ball cannot slip through a thin row. The paddle, which is only ever met
//! from above, uses a plain overlap test on the projected position.

use glam::Vec2;

use super::geometry::{HitAxis, Rect, swept_rect_hit};
use super::state::{Ball, Block};
use crate::tuning::Tuning;

/// Nearest pending block collision for one resolution pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockCollision {
    /// Index into the block list
    pub index: usize,
    pub axis: HitAxis,
    /// Distance along the ball's path to the impact
    pub distance: f32,
}

/// Result of the wall / ceiling / floor check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsOutcome {
    InPlay,
    /// Reflected off a wall or the ceiling
    Bounced,
    /// Bottom edge crossed the floor line
    Lost,
}

/// Swept test of `ball` against one block, as `(axis, distance)`.
///
/// Dead blocks and a resting ball never collide.
pub fn ball_block_collision(ball: &Ball, block: &Block, padding: f32) -> Option<(HitAxis, f32)> {
    if !block.alive || !ball.is_moving() {
        return None;
    }
    let path = ball.swept_path();
    swept_rect_hit(&path, &block.rect, padding).map(|(axis, u)| (axis, u * ball.velocity))
}

/// Closest collision among `blocks` that `accept` allows.
///
/// Ties keep the earliest block in list order.
pub fn nearest_block_collision(
    ball: &Ball,
    blocks: &[Block],
    padding: f32,
    mut accept: impl FnMut(&BlockCollision) -> bool,
) -> Option<BlockCollision> {
    let mut closest: Option<BlockCollision> = None;
    for (index, block) in blocks.iter().enumerate() {
        let Some(hit) = ball.collide_against_block(index, block, padding) else {
            continue;
        };
        if !accept(&hit) {
            continue;
        }
        if closest.is_none_or(|c| hit.distance < c.distance) {
            closest = Some(hit);
        }
    }
    closest
}

/// Does the ball's next position overlap the paddle?
pub fn ball_paddle_collision(ball: &Ball, paddle: &Rect) -> bool {
    ball.rect.translated(ball.step()).overlaps(paddle)
}

/// Heading after striking the paddle.
///
/// The horizontal component is the hit offset from the paddle center,
/// normalized to the half-width and scaled by `factor`. An offset at or past
/// the edge just inverts the horizontal heading. The result is always a unit
/// vector pointing upward.
pub fn paddle_bounce_direction(ball: &Rect, dir: Vec2, paddle: &Rect, factor: f32) -> Vec2 {
    let half_width = paddle.size.x / 2.0;
    let offset = (ball.center().x - paddle.center().x) / half_width * factor;

    let x = if offset.abs() >= 1.0 {
        (-dir.x).clamp(-1.0, 1.0)
    } else {
        offset
    };
    Vec2::new(x, -(1.0 - x * x).max(0.0).sqrt())
}

/// Keep the ball inside the walls and ceiling.
///
/// Both the current and the projected next position are checked, so a ball
/// nudged past a wall by a bounce earlier in the tick is clamped back.
pub fn apply_world_bounds(ball: &mut Ball, tuning: &Tuning) -> BoundsOutcome {
    let next = ball.rect.translated(ball.step());
    let mut outcome = BoundsOutcome::InPlay;

    if next.left() < tuning.min_x() || ball.rect.left() < tuning.min_x() {
        ball.rect.pos.x = tuning.min_x();
        ball.dir.x = ball.dir.x.abs();
        outcome = BoundsOutcome::Bounced;
    } else if next.right() > tuning.max_x() || ball.rect.right() > tuning.max_x() {
        ball.rect.pos.x = tuning.max_x() - ball.rect.size.x;
        ball.dir.x = -ball.dir.x.abs();
        outcome = BoundsOutcome::Bounced;
    }

    if next.top() < tuning.min_y() || ball.rect.top() < tuning.min_y() {
        ball.rect.pos.y = tuning.min_y();
        ball.dir.y = ball.dir.y.abs();
        outcome = BoundsOutcome::Bounced;
    } else if next.bottom() > tuning.floor_y() {
        outcome = BoundsOutcome::Lost;
    }

    outcome
}
