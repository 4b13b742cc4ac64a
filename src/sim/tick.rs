//! Fixed timestep simulation tick
//!
//! Core game loop that advances the run by one step. Each tick while
//! playing: move the paddle to the latest input sample, resolve the paddle
//! then every block collision on the ball's path, move the ball, and check
//! the walls.

use super::collision::{BlockCollision, BoundsOutcome, nearest_block_collision};
use super::level::LevelError;
use super::state::{Ball, Block, BlockKind, GameEvent, GamePhase, GameState, HitOutcome, Scoreboard};

/// Input sample for a single tick (last write wins)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x in field coordinates; the paddle centers on it
    pub target_x: Option<f32>,
    /// Start the run (in the menu) or release the ball (while playing)
    pub launch: bool,
}

/// What the ball step produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BallStep {
    InPlay,
    Cleared,
    Lost,
}

/// Advance the game state by one fixed timestep.
///
/// Only loading a level can fail; the state is left as it was in that case.
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), LevelError> {
    state.time_ticks += 1;

    match state.phase {
        GamePhase::Menu => {
            if input.launch {
                state.start_run()?;
            }
        }

        GamePhase::LevelIntro => {
            // Frozen apart from the spawn animation
            animate(state);
            state.intro_ticks = state.intro_ticks.saturating_sub(1);
            if state.intro_ticks == 0 {
                state.phase = GamePhase::Playing;
                log::debug!("Level {} intro finished", state.level_index + 1);
            }
        }

        GamePhase::Playing => {
            animate(state);

            if let Some(target) = input.target_x {
                let x = target - state.paddle.width() / 2.0;
                state.paddle.move_to(x, &mut state.ball, &state.tuning);
            }
            if input.launch && state.paddle.release(&mut state.ball, &state.tuning) {
                state.events.push(GameEvent::BallLaunched);
            }

            match step_ball(state) {
                BallStep::InPlay => {}
                BallStep::Cleared => {
                    state.phase = GamePhase::LevelCleared;
                    state.events.push(GameEvent::LevelCleared {
                        level: state.level_index + 1,
                    });
                    log::info!(
                        "Level {} cleared, score {}",
                        state.level_index + 1,
                        state.scoreboard.score
                    );
                }
                BallStep::Lost => {
                    state.phase = GamePhase::BallLost;
                    state.events.push(GameEvent::BallLost);
                    log::info!(
                        "Ball lost on level {}, final score {}",
                        state.level_index + 1,
                        state.scoreboard.score
                    );
                }
            }
        }

        GamePhase::LevelCleared => {
            let next = state.level_index + 1;
            if next < state.levels.len() {
                state.start_level(next)?;
            } else {
                state.events.push(GameEvent::RunCompleted);
                state.phase = GamePhase::Menu;
                log::info!("All levels cleared, final score {}", state.scoreboard.score);
            }
        }

        GamePhase::BallLost => {
            state.phase = GamePhase::Menu;
        }
    }

    Ok(())
}

/// Step every per-tick animation
fn animate(state: &mut GameState) {
    state.paddle.animate(&mut state.ball, &state.tuning);
    for block in &mut state.blocks {
        block.animate();
    }
}

/// One block collision resolved during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedHit {
    pub collision: BlockCollision,
    pub kind: BlockKind,
    pub outcome: HitOutcome,
}

/// Resolve the nearest block hit, re-scan with the new heading, repeat.
///
/// Every re-scan starts from the ball's current point, so a block on the
/// reflected path may be closer than the previous hit. Each (block, face)
/// resolves at most once per tick, which bounds the loop at two hits per
/// block. Stops early once `remaining` reaches zero. The ball's position is
/// not changed.
pub fn resolve_block_collisions(
    ball: &mut Ball,
    blocks: &mut [Block],
    padding: f32,
    scoreboard: &mut Scoreboard,
    remaining: &mut u32,
) -> Vec<ResolvedHit> {
    let mut hits: Vec<ResolvedHit> = Vec::new();

    while let Some(collision) = nearest_block_collision(ball, blocks, padding, |c| {
        !hits
            .iter()
            .any(|h| h.collision.index == c.index && h.collision.axis == c.axis)
    }) {
        let block = &mut blocks[collision.index];
        let kind = block.kind;
        let outcome = ball.resolve_bounce(block, collision.axis, scoreboard, remaining);
        hits.push(ResolvedHit {
            collision,
            kind,
            outcome,
        });

        if *remaining == 0 {
            break;
        }
    }
    hits
}

/// Run the ball's full collision cycle for one tick, then move it
fn step_ball(state: &mut GameState) -> BallStep {
    let ball = &mut state.ball;

    // Paddle first: it moves every tick and is the only thing above the floor
    if ball.dir.y > 0.0 && ball.collide_against_paddle(&state.paddle) {
        ball.resolve_bounce_paddle(&state.paddle, state.tuning.paddle_bounce_factor);
        state.events.push(GameEvent::PaddleHit);
        log::debug!("Paddle bounce, heading ({:.3}, {:.3})", ball.dir.x, ball.dir.y);
    }

    let hits = resolve_block_collisions(
        ball,
        &mut state.blocks,
        state.tuning.collision_padding,
        &mut state.scoreboard,
        &mut state.blocks_remaining,
    );
    for hit in &hits {
        log::debug!(
            "Block {:?} hit on {:?} at distance {:.3}: {:?}",
            hit.kind,
            hit.collision.axis,
            hit.collision.distance,
            hit.outcome
        );
        let destroyed = matches!(hit.outcome, HitOutcome::Destroyed { .. });
        state.events.push(GameEvent::BlockHit {
            kind: hit.kind,
            destroyed,
        });
        if destroyed {
            state.events.push(GameEvent::ScoreChanged {
                score: state.scoreboard.score,
                best_score: state.scoreboard.best_score,
            });
        }
    }

    ball.advance();

    if !hits.is_empty() && state.blocks_remaining == 0 {
        return BallStep::Cleared;
    }
    match ball.check_world_bounds(&state.tuning) {
        BoundsOutcome::Lost => BallStep::Lost,
        BoundsOutcome::InPlay | BoundsOutcome::Bounced => BallStep::InPlay,
    }
}
