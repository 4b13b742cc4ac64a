//! Game state and core simulation types
//!
//! `GameState` is the explicit simulation context: every entity, the score
//! and the level cursor live here and are only touched from `tick`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::{FrameAnimation, Playback};
use super::collision::{self, BlockCollision, BoundsOutcome};
use super::geometry::{HitAxis, Rect, Segment};
use super::level::{LevelError, LevelSet};
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start trigger
    Menu,
    /// Frozen pause at level start while the paddle spawn animation plays
    LevelIntro,
    /// Active gameplay (ball may still be held by the paddle)
    Playing,
    /// Every required block is gone; the next level loads on the next tick
    LevelCleared,
    /// Ball passed the floor; returns to the menu on the next tick
    BallLost,
}

/// Discrete notifications for audio and UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: usize },
    BallLaunched,
    PaddleHit,
    BlockHit { kind: BlockKind, destroyed: bool },
    ScoreChanged { score: u64, best_score: u64 },
    LevelCleared { level: usize },
    BallLost,
    /// The last level in the table was cleared
    RunCompleted,
}

/// Running score, reset per run. `best_score` never decreases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    pub best_score: u64,
}

impl Scoreboard {
    pub fn add(&mut self, points: u64) {
        self.score += points;
        self.best_score = self.best_score.max(self.score);
    }

    /// Start of a new run: score goes back to zero, best score is kept
    pub fn reset(&mut self) {
        self.score = 0;
    }
}

/// Block palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockKind {
    White,
    Orange,
    Cyan,
    Green,
    Red,
    Blue,
    Pink,
    Yellow,
    /// Reinforced: the first hit only damages it
    Silver,
    /// Decorative: absorbs hits, never destroyed, never required for a clear
    Gold,
}

impl BlockKind {
    pub const ALL: [BlockKind; 10] = [
        BlockKind::White,
        BlockKind::Orange,
        BlockKind::Cyan,
        BlockKind::Green,
        BlockKind::Red,
        BlockKind::Blue,
        BlockKind::Pink,
        BlockKind::Yellow,
        BlockKind::Silver,
        BlockKind::Gold,
    ];

    /// Name used in level tables
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::White => "WHITE",
            BlockKind::Orange => "ORANGE",
            BlockKind::Cyan => "CYAN",
            BlockKind::Green => "GREEN",
            BlockKind::Red => "RED",
            BlockKind::Blue => "BLUE",
            BlockKind::Pink => "PINK",
            BlockKind::Yellow => "YELLOW",
            BlockKind::Silver => "SILVER",
            BlockKind::Gold => "GOLD",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Points awarded when destroyed
    pub fn score(self) -> u64 {
        match self {
            BlockKind::White => 50,
            BlockKind::Orange => 60,
            BlockKind::Cyan => 70,
            BlockKind::Green => 80,
            BlockKind::Red => 90,
            BlockKind::Blue => 100,
            BlockKind::Pink => 110,
            BlockKind::Yellow => 120,
            BlockKind::Silver => 200,
            BlockKind::Gold => 0,
        }
    }

    pub fn is_reinforced(self) -> bool {
        self == BlockKind::Silver
    }

    pub fn is_indestructible(self) -> bool {
        self == BlockKind::Gold
    }

    /// Returns true if this block must be destroyed to clear the level
    pub fn counts_for_clear(self) -> bool {
        !self.is_indestructible()
    }
}

/// What a single hit did to a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Destroyed { points: u64 },
    /// Reinforced block took its first hit
    Damaged,
    /// Indestructible block, or a block that was already gone
    Deflected,
}

/// Observable lifecycle of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    Fresh,
    Damaged,
    Destroyed,
}

/// A block entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub kind: BlockKind,
    pub rect: Rect,
    pub alive: bool,
    /// The next hit destroys the block
    pub last_life: bool,
    /// Hit flash shown on reinforced and indestructible blocks
    pub flash: FrameAnimation,
}

impl Block {
    pub fn new(id: u32, kind: BlockKind, rect: Rect, tuning: &Tuning) -> Self {
        Self {
            id,
            kind,
            rect,
            alive: true,
            last_life: !kind.is_reinforced(),
            flash: FrameAnimation::new(
                tuning.block_flash_frames,
                tuning.block_flash_step_ticks,
                Playback::Once,
            ),
        }
    }

    pub fn state(&self) -> BlockState {
        if !self.alive {
            BlockState::Destroyed
        } else if self.kind.is_reinforced() && self.last_life {
            BlockState::Damaged
        } else {
            BlockState::Fresh
        }
    }

    /// Register a ball strike
    pub fn hit(&mut self, scoreboard: &mut Scoreboard, remaining: &mut u32) -> HitOutcome {
        if !self.alive {
            return HitOutcome::Deflected;
        }
        if self.kind.is_indestructible() {
            self.flash.start();
            return HitOutcome::Deflected;
        }
        if !self.last_life {
            self.last_life = true;
            self.flash.start();
            return HitOutcome::Damaged;
        }
        if self.destroy(scoreboard, remaining) {
            HitOutcome::Destroyed {
                points: self.kind.score(),
            }
        } else {
            HitOutcome::Deflected
        }
    }

    /// Remove the block for good, crediting its score.
    ///
    /// Returns false (and changes nothing) if it was already destroyed.
    pub fn destroy(&mut self, scoreboard: &mut Scoreboard, remaining: &mut u32) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.flash.stop();
        if self.kind.counts_for_clear() {
            *remaining = remaining.saturating_sub(1);
        }
        scoreboard.add(self.kind.score());
        true
    }

    /// Step the hit flash; dead blocks are left alone
    pub fn animate(&mut self) {
        if self.alive {
            self.flash.advance();
        }
    }
}

/// Paddle palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddleKind {
    /// Narrow paddle shown while the level intro plays
    Spawn,
    /// Play paddle
    Normal,
}

/// Whether the paddle carries the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallHold {
    /// Ball with this id rides on top of the paddle
    Held { ball_id: u32 },
    Released,
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub kind: PaddleKind,
    pub rect: Rect,
    pub hold: BallHold,
    /// One-shot spawn → normal transition
    pub transition: FrameAnimation,
}

impl Paddle {
    /// Spawn-type paddle centered in the field, holding `ball`
    pub fn new(tuning: &Tuning, ball: &Ball) -> Self {
        let size = tuning.spawn_paddle;
        let x = tuning.field_width / 2.0 - size.width / 2.0;
        Self {
            kind: PaddleKind::Spawn,
            rect: Rect::new(x, tuning.paddle_y(), size.width, size.height),
            hold: BallHold::Held { ball_id: ball.id },
            transition: FrameAnimation::new(
                tuning.paddle_spawn_frames,
                tuning.paddle_spawn_step_ticks,
                Playback::Once,
            ),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.rect.size.x
    }

    pub fn is_holding(&self, ball: &Ball) -> bool {
        matches!(self.hold, BallHold::Held { ball_id } if ball_id == ball.id)
    }

    /// Place the paddle's left edge at `x`, clamped to the walls.
    /// A held ball follows, centered on the paddle.
    pub fn move_to(&mut self, x: f32, ball: &mut Ball, tuning: &Tuning) {
        let max_x = tuning.max_x() - self.width();
        self.rect.pos.x = crate::clamp_to(x, tuning.min_x(), max_x);
        if self.is_holding(ball) {
            ball.rest_on(&self.rect);
        }
    }

    /// Launch the held ball. Returns false if nothing was held.
    pub fn release(&mut self, ball: &mut Ball, tuning: &Tuning) -> bool {
        if !self.is_holding(ball) {
            return false;
        }
        ball.launch(tuning.launch_angle);
        self.hold = BallHold::Released;
        true
    }

    /// Begin the spawn transition. Has no effect once the paddle is `Normal`
    /// or while the transition is already playing.
    pub fn start_transition_animation(&mut self) {
        if self.kind == PaddleKind::Spawn && !self.transition.is_running() {
            self.transition.start();
        }
    }

    /// Step the spawn transition, growing the paddle toward the normal size
    pub fn animate(&mut self, ball: &mut Ball, tuning: &Tuning) {
        if self.kind != PaddleKind::Spawn || !self.transition.is_running() {
            return;
        }
        let finished = self.transition.advance();
        let size = if finished {
            self.kind = PaddleKind::Normal;
            tuning.normal_paddle
        } else {
            let t = self.transition.progress();
            crate::tuning::PaddleSize {
                width: lerp(tuning.spawn_paddle.width, tuning.normal_paddle.width, t),
                height: lerp(tuning.spawn_paddle.height, tuning.normal_paddle.height, t),
            }
        };
        self.resize(size.width, size.height, ball, tuning);
    }

    /// Change size around the current center, keeping the paddle row's top edge
    fn resize(&mut self, width: f32, height: f32, ball: &mut Ball, tuning: &Tuning) {
        let center_x = self.rect.center().x;
        self.rect.size = Vec2::new(width, height);
        self.move_to(center_x - width / 2.0, ball, tuning);
    }

    /// Sprite frame for rendering (0 once the transition is over)
    pub fn sprite_frame(&self) -> u8 {
        self.transition.frame
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub rect: Rect,
    /// Unit heading, or zero while resting on the paddle
    pub dir: Vec2,
    /// Distance per tick along `dir`
    pub velocity: f32,
    /// Looping sprite animation while moving
    pub spin: FrameAnimation,
}

impl Ball {
    pub fn new(id: u32, tuning: &Tuning) -> Self {
        Self {
            id,
            rect: Rect::new(0.0, 0.0, tuning.ball_width, tuning.ball_height),
            dir: Vec2::ZERO,
            velocity: tuning.ball_velocity,
            spin: FrameAnimation::new(tuning.ball_frames, tuning.ball_frame_ticks, Playback::Loop),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.dir != Vec2::ZERO
    }

    /// Displacement for one tick
    #[inline]
    pub fn step(&self) -> Vec2 {
        self.dir * self.velocity
    }

    /// Segment swept by the center during one tick
    pub fn swept_path(&self) -> Segment {
        let start = self.center();
        Segment::new(start, start + self.step())
    }

    /// Sit motionless on top of a paddle, horizontally centered
    pub fn rest_on(&mut self, paddle: &Rect) {
        self.rect.pos = Vec2::new(
            paddle.center().x - self.rect.size.x / 2.0,
            paddle.top() - self.rect.size.y,
        );
    }

    /// Leave the paddle heading up and to the right, `angle` above horizontal
    pub fn launch(&mut self, angle: f32) {
        self.dir = Vec2::new(angle.cos(), -angle.sin());
        self.spin.start();
    }

    /// Move one tick along the current heading
    pub fn advance(&mut self) {
        if self.is_moving() {
            self.rect.pos += self.step();
            self.spin.advance();
        }
    }

    /// Swept test against one block
    pub fn collide_against_block(
        &self,
        index: usize,
        block: &Block,
        padding: f32,
    ) -> Option<BlockCollision> {
        collision::ball_block_collision(self, block, padding).map(|(axis, distance)| {
            BlockCollision {
                index,
                axis,
                distance,
            }
        })
    }

    /// Projected overlap with the paddle
    pub fn collide_against_paddle(&self, paddle: &Paddle) -> bool {
        collision::ball_paddle_collision(self, &paddle.rect)
    }

    /// Reflect off `block` on `axis`, then register the hit
    pub fn resolve_bounce(
        &mut self,
        block: &mut Block,
        axis: HitAxis,
        scoreboard: &mut Scoreboard,
        remaining: &mut u32,
    ) -> HitOutcome {
        self.dir = axis.reflect(self.dir);
        block.hit(scoreboard, remaining)
    }

    /// New heading from where the ball struck the paddle
    pub fn resolve_bounce_paddle(&mut self, paddle: &Paddle, factor: f32) {
        self.dir = collision::paddle_bounce_direction(&self.rect, self.dir, &paddle.rect, factor);
    }

    /// Reflect off the walls and ceiling, or report the ball lost
    pub fn check_world_bounds(&mut self, tuning: &Tuning) -> BoundsOutcome {
        collision::apply_world_bounds(self, tuning)
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub levels: LevelSet,
    /// Current level (0-based index into `levels`)
    pub level_index: usize,
    pub phase: GamePhase,
    /// Ticks left in the level intro
    pub intro_ticks: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub scoreboard: Scoreboard,
    /// Live blocks that still count toward the clear
    pub blocks_remaining: u32,
    /// Background reference of the current level
    pub background: u32,
    pub paddle: Paddle,
    pub ball: Ball,
    pub blocks: Vec<Block>,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// New state sitting in the menu
    pub fn new(tuning: Tuning, levels: LevelSet) -> Self {
        let mut ball = Ball::new(1, &tuning);
        let mut paddle = Paddle::new(&tuning, &ball);
        let x = paddle.rect.left();
        paddle.move_to(x, &mut ball, &tuning);
        Self {
            tuning,
            levels,
            level_index: 0,
            phase: GamePhase::Menu,
            intro_ticks: 0,
            time_ticks: 0,
            scoreboard: Scoreboard::default(),
            blocks_remaining: 0,
            background: 0,
            paddle,
            ball,
            blocks: Vec::new(),
            events: Vec::new(),
            next_id: 2,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin a fresh run from the first level
    pub fn start_run(&mut self) -> Result<(), LevelError> {
        self.start_level(0)?;
        self.scoreboard.reset();
        self.push_score_event();
        log::info!("New run started (best score {})", self.scoreboard.best_score);
        Ok(())
    }

    /// Build `index` and enter its intro.
    ///
    /// The block grid is built before anything is replaced, so an invalid
    /// level leaves the current state untouched.
    pub fn start_level(&mut self, index: usize) -> Result<(), LevelError> {
        let def = self.levels.get(index)?;
        let background = def.background;
        let mut next_id = self.next_id;
        let blocks = def.build_blocks(index, &self.tuning, || {
            let id = next_id;
            next_id += 1;
            id
        })?;
        self.next_id = next_id;

        let ball_id = self.next_entity_id();
        let mut ball = Ball::new(ball_id, &self.tuning);
        let mut paddle = Paddle::new(&self.tuning, &ball);
        let x = paddle.rect.left();
        paddle.move_to(x, &mut ball, &self.tuning);
        paddle.start_transition_animation();

        self.blocks_remaining = blocks.iter().filter(|b| b.kind.counts_for_clear()).count() as u32;
        self.blocks = blocks;
        self.ball = ball;
        self.paddle = paddle;
        self.background = background;
        self.level_index = index;
        self.intro_ticks = self.tuning.intro_ticks;
        self.phase = GamePhase::LevelIntro;
        self.events.push(GameEvent::LevelStarted { level: index + 1 });
        log::info!(
            "Level {} loaded: {} blocks, {} required",
            index + 1,
            self.blocks.len(),
            self.blocks_remaining
        );
        Ok(())
    }

    /// True while the frozen level intro plays
    pub fn level_intro_active(&self) -> bool {
        self.phase == GamePhase::LevelIntro
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_score_event(&mut self) {
        self.events.push(GameEvent::ScoreChanged {
            score: self.scoreboard.score,
            best_score: self.scoreboard.best_score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(kind: BlockKind) -> Block {
        Block::new(7, kind, Rect::new(90.0, 96.0, 16.0, 8.0), &Tuning::default())
    }

    #[test]
    fn test_reinforced_block_takes_two_hits() {
        let mut board = Scoreboard::default();
        let mut remaining = 1;
        let mut silver = block(BlockKind::Silver);
        assert_eq!(silver.state(), BlockState::Fresh);

        assert_eq!(silver.hit(&mut board, &mut remaining), HitOutcome::Damaged);
        assert!(silver.alive);
        assert_eq!(silver.state(), BlockState::Damaged);
        assert!(silver.flash.is_running());
        assert_eq!(remaining, 1);
        assert_eq!(board.score, 0);

        assert_eq!(
            silver.hit(&mut board, &mut remaining),
            HitOutcome::Destroyed { points: 200 }
        );
        assert_eq!(silver.state(), BlockState::Destroyed);
        assert_eq!(remaining, 0);
        assert_eq!(board.score, 200);
    }

    #[test]
    fn test_regular_blocks_break_in_one_hit() {
        for kind in BlockKind::ALL {
            if kind.is_reinforced() || kind.is_indestructible() {
                continue;
            }
            let mut board = Scoreboard::default();
            let mut remaining = 1;
            let mut b = block(kind);
            assert!(matches!(
                b.hit(&mut board, &mut remaining),
                HitOutcome::Destroyed { .. }
            ));
            assert!(!b.alive);
            assert_eq!(board.score, kind.score());
        }
    }

    #[test]
    fn test_gold_never_breaks() {
        let mut board = Scoreboard::default();
        let mut remaining = 3;
        let mut gold = block(BlockKind::Gold);
        for _ in 0..5 {
            assert_eq!(gold.hit(&mut board, &mut remaining), HitOutcome::Deflected);
        }
        assert!(gold.alive);
        assert!(gold.flash.is_running());
        assert_eq!(remaining, 3);
        assert_eq!(board.score, 0);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut board = Scoreboard::default();
        let mut remaining = 2;
        let mut b = block(BlockKind::Green);
        assert!(b.destroy(&mut board, &mut remaining));
        assert!(!b.destroy(&mut board, &mut remaining));
        assert_eq!(remaining, 1);
        assert_eq!(board.score, 80);
        assert_eq!(b.hit(&mut board, &mut remaining), HitOutcome::Deflected);
        assert_eq!(board.score, 80);
    }

    #[test]
    fn test_scoreboard_best_is_monotonic() {
        let mut board = Scoreboard::default();
        board.add(300);
        board.reset();
        board.add(100);
        assert_eq!(board.score, 100);
        assert_eq!(board.best_score, 300);
        board.add(250);
        assert_eq!(board.best_score, 350);
    }

    #[test]
    fn test_block_kind_names_round_trip() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(BlockKind::from_name("white"), None);
        assert_eq!(BlockKind::from_name("PURPLE"), None);
    }

    #[test]
    fn test_paddle_move_clamps_and_carries_ball() {
        let tuning = Tuning::default();
        let mut ball = Ball::new(1, &tuning);
        let mut paddle = Paddle::new(&tuning, &ball);

        paddle.move_to(-50.0, &mut ball, &tuning);
        assert_eq!(paddle.rect.left(), tuning.min_x());
        assert!((ball.center().x - paddle.rect.center().x).abs() < 1e-4);
        assert_eq!(ball.rect.bottom(), paddle.rect.top());

        paddle.move_to(1000.0, &mut ball, &tuning);
        assert_eq!(paddle.rect.right(), tuning.max_x());
        assert!((ball.center().x - paddle.rect.center().x).abs() < 1e-4);
    }

    #[test]
    fn test_release_launches_once() {
        let tuning = Tuning::default();
        let mut ball = Ball::new(1, &tuning);
        let mut paddle = Paddle::new(&tuning, &ball);

        assert!(paddle.release(&mut ball, &tuning));
        assert_eq!(paddle.hold, BallHold::Released);
        assert!((ball.dir.length() - 1.0).abs() < 1e-5);
        assert!(ball.dir.y < 0.0 && ball.dir.x > 0.0);
        assert!((ball.dir.x - 0.5).abs() < 1e-5);

        // Released ball no longer follows the paddle
        let before = ball.rect.pos;
        paddle.move_to(20.0, &mut ball, &tuning);
        assert_eq!(ball.rect.pos, before);
        assert!(!paddle.release(&mut ball, &tuning));
    }

    #[test]
    fn test_paddle_transition_runs_once() {
        let tuning = Tuning::default();
        let mut ball = Ball::new(1, &tuning);
        let mut paddle = Paddle::new(&tuning, &ball);
        let center = paddle.rect.center().x;
        paddle.start_transition_animation();

        let total = paddle.transition.duration_ticks();
        for _ in 0..total {
            paddle.animate(&mut ball, &tuning);
        }
        assert_eq!(paddle.kind, PaddleKind::Normal);
        assert_eq!(paddle.width(), tuning.normal_paddle.width);
        assert!((paddle.rect.center().x - center).abs() < 1e-4);
        assert!((ball.center().x - center).abs() < 1e-4);

        paddle.start_transition_animation();
        assert!(!paddle.transition.is_running());
        assert_eq!(paddle.sprite_frame(), 0);
    }

    #[test]
    fn test_advance_only_when_moving() {
        let tuning = Tuning::default();
        let mut ball = Ball::new(1, &tuning);
        ball.rect.pos = Vec2::new(50.0, 50.0);
        ball.advance();
        assert_eq!(ball.rect.pos, Vec2::new(50.0, 50.0));

        ball.dir = Vec2::new(0.0, -1.0);
        ball.advance();
        assert_eq!(ball.rect.pos, Vec2::new(50.0, 47.5));
    }
}
