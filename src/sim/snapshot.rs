//! Read-only view of the state for rendering
//!
//! The frontend never touches `GameState` directly; it draws whatever the
//! latest snapshot says.

use serde::Serialize;

use super::geometry::Rect;
use super::state::{BlockKind, GamePhase, GameState, PaddleKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaddleView {
    pub rect: Rect,
    pub kind: PaddleKind,
    pub frame: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BallView {
    pub rect: Rect,
    pub frame: u8,
    pub moving: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockView {
    pub rect: Rect,
    pub kind: BlockKind,
    pub alive: bool,
    /// Hit flash frame, 0 when idle
    pub frame: u8,
    /// Reinforced block that already took a hit
    pub damaged: bool,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    /// 1-based level number
    pub level: usize,
    pub level_name: String,
    pub background: u32,
    pub level_intro: bool,
    pub score: u64,
    pub best_score: u64,
    pub paddle: PaddleView,
    pub ball: BallView,
    /// Every block in level order, destroyed ones included
    pub blocks: Vec<BlockView>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let level_name = state
            .levels
            .levels
            .get(state.level_index)
            .map(|def| def.name.clone())
            .unwrap_or_default();

        Self {
            phase: state.phase,
            level: state.level_index + 1,
            level_name,
            background: state.background,
            level_intro: state.level_intro_active(),
            score: state.scoreboard.score,
            best_score: state.scoreboard.best_score,
            paddle: PaddleView {
                rect: state.paddle.rect,
                kind: state.paddle.kind,
                frame: state.paddle.sprite_frame(),
            },
            ball: BallView {
                rect: state.ball.rect,
                frame: state.ball.spin.frame,
                moving: state.ball.is_moving(),
            },
            blocks: state
                .blocks
                .iter()
                .map(|b| BlockView {
                    rect: b.rect,
                    kind: b.kind,
                    alive: b.alive,
                    frame: b.flash.frame,
                    damaged: b.kind.is_reinforced() && b.last_life,
                })
                .collect(),
        }
    }
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}
