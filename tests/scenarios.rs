//! End-to-end ticks through the public simulation API

use glam::Vec2;

use brick_breaker::Tuning;
use brick_breaker::sim::{
    BallHold, Block, BlockKind, BlockState, GameEvent, GamePhase, GameState, HitAxis, HitOutcome,
    LevelSet, Paddle, Rect, Scoreboard, TickInput, resolve_block_collisions, tick,
};

/// A state in `Playing` with a free ball and no level blocks
fn playing_state(ball_pos: Vec2, dir: Vec2) -> GameState {
    let mut state = GameState::new(Tuning::default(), LevelSet::builtin().unwrap());
    state.phase = GamePhase::Playing;
    state.paddle.hold = BallHold::Released;
    state.ball.rect.pos = ball_pos;
    state.ball.dir = dir;
    state.blocks.clear();
    state.blocks_remaining = 0;
    state
}

fn add_block(state: &mut GameState, kind: BlockKind, x: f32, y: f32) {
    let id = state.next_entity_id();
    let block = Block::new(id, kind, Rect::new(x, y, 16.0, 8.0), &state.tuning);
    if kind.counts_for_clear() {
        state.blocks_remaining += 1;
    }
    state.blocks.push(block);
}

#[test]
fn reinforced_block_survives_first_hit() {
    let tuning = Tuning::default();
    let mut board = Scoreboard::default();
    let mut remaining = 1;
    let mut block = Block::new(1, BlockKind::Silver, Rect::new(40.0, 40.0, 16.0, 8.0), &tuning);

    assert_eq!(block.hit(&mut board, &mut remaining), HitOutcome::Damaged);
    assert!(block.alive);
    assert_eq!(block.state(), BlockState::Damaged);

    assert!(matches!(
        block.hit(&mut board, &mut remaining),
        HitOutcome::Destroyed { .. }
    ));
    assert!(!block.alive);
    assert_eq!(remaining, 0);
}

#[test]
fn head_on_hit_destroys_and_scores() {
    let mut state = playing_state(Vec2::new(100.0, 100.0), Vec2::new(0.0, -1.0));
    add_block(&mut state, BlockKind::Red, 90.0, 89.55);
    // Keeps the level from clearing
    add_block(&mut state, BlockKind::White, 24.0, 24.0);

    tick(&mut state, &TickInput::default()).unwrap();

    assert!(!state.blocks[0].alive);
    assert!(state.blocks[1].alive);
    assert_eq!(state.scoreboard.score, BlockKind::Red.score());
    assert_eq!(state.blocks_remaining, 1);
    assert_eq!(state.phase, GamePhase::Playing);
    // Reflected straight down, then moved a full step from the start
    assert_eq!(state.ball.dir, Vec2::new(0.0, 1.0));
    assert!((state.ball.rect.pos.y - 102.5).abs() < 1e-4);

    let events = state.drain_events();
    assert!(events.contains(&GameEvent::BlockHit {
        kind: BlockKind::Red,
        destroyed: true
    }));
    assert!(events.contains(&GameEvent::ScoreChanged {
        score: 90,
        best_score: 90
    }));
}

#[test]
fn paddle_edge_bounce_stays_unit_length() {
    let tuning = Tuning::default();
    let mut state = playing_state(Vec2::ZERO, Vec2::new(0.5, 0.866));
    let mut paddle = Paddle::new(&tuning, &state.ball);
    paddle.rect = Rect::new(100.0, 200.0, 32.0, 8.0);
    state.ball.rect.pos = Vec2::new(131.0 - 2.5, 195.0);

    state.ball.resolve_bounce_paddle(&paddle, tuning.paddle_bounce_factor);
    let dir = state.ball.dir;
    assert!(dir.x > 0.0);
    assert!(dir.x < 1.0);
    assert!(dir.y < 0.0);
    assert!((dir.x * dir.x + dir.y * dir.y - 1.0).abs() < 1e-5);
}

#[test]
fn paddle_bounce_through_tick() {
    let mut state = playing_state(Vec2::ZERO, Vec2::new(0.0, 1.0));
    add_block(&mut state, BlockKind::White, 24.0, 24.0);
    let paddle = state.paddle.rect;
    // Just above the paddle, left of center
    state.ball.rect.pos = Vec2::new(paddle.center().x - 8.0, paddle.top() - 5.5);

    tick(&mut state, &TickInput::default()).unwrap();

    assert!(state.ball.dir.y < 0.0);
    assert!(state.ball.dir.x < 0.0);
    assert!(state.drain_events().contains(&GameEvent::PaddleHit));
}

#[test]
fn last_required_block_clears_with_gold_left() {
    let mut state = playing_state(Vec2::new(100.0, 100.0), Vec2::new(0.0, -1.0));
    add_block(&mut state, BlockKind::Red, 90.0, 89.55);
    add_block(&mut state, BlockKind::Gold, 24.0, 24.0);
    assert_eq!(state.blocks_remaining, 1);

    tick(&mut state, &TickInput::default()).unwrap();

    assert_eq!(state.phase, GamePhase::LevelCleared);
    assert!(state.blocks[1].alive);
    assert!(
        state
            .drain_events()
            .contains(&GameEvent::LevelCleared { level: 1 })
    );

    tick(&mut state, &TickInput::default()).unwrap();
    assert_eq!(state.phase, GamePhase::LevelIntro);
    assert_eq!(state.level_index, 1);
}

#[test]
fn clear_wins_over_loss_in_the_same_tick() {
    let tuning = Tuning::default();
    // About to drop past the floor, moving down onto a block's top face
    let y = tuning.floor_y() - 5.0;
    let mut state = playing_state(Vec2::new(100.0, y), Vec2::new(0.0, 1.0));
    state.paddle.rect.pos.x = 30.0;
    add_block(&mut state, BlockKind::Red, 95.0, y + 6.0);

    tick(&mut state, &TickInput::default()).unwrap();
    assert_eq!(state.phase, GamePhase::LevelCleared);
}

#[test]
fn destroy_twice_counts_once() {
    let mut state = playing_state(Vec2::new(100.0, 100.0), Vec2::ZERO);
    add_block(&mut state, BlockKind::Blue, 40.0, 40.0);
    add_block(&mut state, BlockKind::Blue, 60.0, 40.0);

    let mut board = state.scoreboard;
    let mut remaining = state.blocks_remaining;
    assert!(state.blocks[0].destroy(&mut board, &mut remaining));
    assert!(!state.blocks[0].destroy(&mut board, &mut remaining));

    assert_eq!(remaining, 1);
    assert_eq!(board.score, 100);
}

#[test]
fn fast_ball_does_not_tunnel_through_stack() {
    let mut state = playing_state(Vec2::new(100.0, 100.0), Vec2::new(0.0, -1.0));
    state.ball.velocity = 20.0;
    add_block(&mut state, BlockKind::Green, 95.0, 80.0);
    add_block(&mut state, BlockKind::Green, 95.0, 72.0);

    tick(&mut state, &TickInput::default()).unwrap();

    // Only the nearer block is hit; the ball turns around before the second
    assert!(!state.blocks[0].alive);
    assert!(state.blocks[1].alive);
    assert!(state.ball.dir.y > 0.0);
    assert!(state.ball.rect.pos.y > 100.0);
}

#[test]
fn corner_hits_resolve_in_distance_order() {
    let tuning = Tuning::default();
    let mut ball = brick_breaker::sim::Ball::new(1, &tuning);
    ball.rect.pos = Vec2::new(97.5, 98.0);
    ball.dir = Vec2::new(-1.0, -1.0).normalize();
    ball.velocity = 10.0;

    let mut blocks = vec![
        // Above the ball
        Block::new(2, BlockKind::Red, Rect::new(92.0, 84.0, 16.0, 8.0), &tuning),
        // To its left
        Block::new(3, BlockKind::Red, Rect::new(78.0, 94.0, 16.0, 8.0), &tuning),
    ];
    let mut board = Scoreboard::default();
    let mut remaining = 5;

    let hits = resolve_block_collisions(&mut ball, &mut blocks, 2.0, &mut board, &mut remaining);

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].collision.index, 1);
    assert_eq!(hits[0].collision.axis, HitAxis::Horizontal);
    assert_eq!(hits[1].collision.index, 0);
    assert_eq!(hits[1].collision.axis, HitAxis::Vertical);
    assert!(hits[0].collision.distance <= hits[1].collision.distance);
    assert!(ball.dir.x > 0.0 && ball.dir.y > 0.0);
    assert_eq!(remaining, 3);
    assert_eq!(board.score, 180);
}

#[test]
fn reflected_path_hits_closer_block_in_the_gap() {
    // Two blocks with one empty row between them, ball in the gap heading up
    let angle = 4.527_f32;
    let center = Vec2::new(98.56, 80.03);
    let mut state = playing_state(center - Vec2::new(2.5, 2.0), Vec2::new(angle.cos(), angle.sin()));
    add_block(&mut state, BlockKind::Green, 92.0, 68.0);
    add_block(&mut state, BlockKind::Green, 92.0, 84.0);
    // Keeps the level from clearing
    add_block(&mut state, BlockKind::White, 24.0, 24.0);

    tick(&mut state, &TickInput::default()).unwrap();

    // The upper block is hit first, then the lower one on the reflected path
    assert!(!state.blocks[0].alive);
    assert!(!state.blocks[1].alive);
    assert_eq!(state.blocks_remaining, 1);
    assert!(state.ball.dir.y < 0.0);
    let hits: Vec<_> = state
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::BlockHit { .. }))
        .collect();
    assert_eq!(hits.len(), 2);

    for _ in 0..10 {
        tick(&mut state, &TickInput::default()).unwrap();
        let ball = state.ball.rect;
        for block in state.blocks.iter().filter(|b| b.alive) {
            assert!(!ball.overlaps(&block.rect));
        }
    }
}

#[test]
fn rescan_keeps_a_hit_closer_than_the_first() {
    let tuning = Tuning::default();
    let mut ball = brick_breaker::sim::Ball::new(1, &tuning);
    let angle = 4.527_f32;
    ball.rect.pos = Vec2::new(98.56 - 2.5, 80.03 - 2.0);
    ball.dir = Vec2::new(angle.cos(), angle.sin());

    let mut blocks = vec![
        Block::new(2, BlockKind::Silver, Rect::new(92.0, 68.0, 16.0, 8.0), &tuning),
        Block::new(3, BlockKind::Silver, Rect::new(92.0, 84.0, 16.0, 8.0), &tuning),
    ];
    let mut board = Scoreboard::default();
    let mut remaining = 2;

    let hits = resolve_block_collisions(&mut ball, &mut blocks, 2.0, &mut board, &mut remaining);

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].collision.index, 0);
    assert_eq!(hits[1].collision.index, 1);
    assert_eq!(hits[1].collision.axis, HitAxis::Vertical);
    assert!(hits[1].collision.distance < hits[0].collision.distance);
    // Both damaged, and the ball leaves heading up again
    assert!(blocks.iter().all(|b| b.alive && b.state() == BlockState::Damaged));
    assert!(ball.dir.y < 0.0);
}

#[test]
fn resting_ball_ignores_blocks() {
    let mut state = playing_state(Vec2::new(100.0, 100.0), Vec2::ZERO);
    add_block(&mut state, BlockKind::Red, 90.0, 89.55);
    tick(&mut state, &TickInput::default()).unwrap();
    assert!(state.blocks[0].alive);
    assert!(state.drain_events().is_empty());
}
