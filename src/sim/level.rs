//! Level definitions
//!
//! A level is a grid of block-type names placed at a row/column offset from
//! the top-left wall corner. The built-in table ships in
//! `assets/levels.json`; an unknown type name is a content bug and aborts the
//! load instead of being skipped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Rect;
use super::state::{Block, BlockKind};
use crate::tuning::Tuning;

/// Grid cell name for "no block here"
pub const EMPTY_CELL: &str = "NULL";

const BUILTIN_LEVELS: &str = include_str!("../../assets/levels.json");

/// Errors raised while loading or building levels
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("malformed level table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level table is empty")]
    Empty,
    #[error("no level {0} in the table")]
    NoSuchLevel(usize),
    #[error("level {level}: unknown block type {name:?} at row {row}, column {column}")]
    UnknownBlockType {
        level: usize,
        row: usize,
        column: usize,
        name: String,
    },
    #[error("level {level}: block at row {row}, column {column} lies outside the play field")]
    OutOfField {
        level: usize,
        row: usize,
        column: usize,
    },
    #[error("level {level} has no blocks that can be destroyed")]
    NothingToClear { level: usize },
}

/// One level of the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    #[serde(default)]
    pub name: String,
    /// Rows of empty space between the ceiling and the first block row
    pub row_offset: u32,
    /// Columns of empty space between the left wall and the first column
    pub column_offset: u32,
    /// Background picture, opaque to the simulation
    #[serde(default)]
    pub background: u32,
    /// Block-type names, row by row
    pub structure: Vec<Vec<String>>,
}

impl LevelDef {
    /// Resolve every non-empty cell to `(row, column, kind)`
    pub fn cells(&self, level: usize) -> Result<Vec<(usize, usize, BlockKind)>, LevelError> {
        let mut cells = Vec::new();
        for (row, names) in self.structure.iter().enumerate() {
            for (column, name) in names.iter().enumerate() {
                if name == EMPTY_CELL {
                    continue;
                }
                let kind =
                    BlockKind::from_name(name).ok_or_else(|| LevelError::UnknownBlockType {
                        level,
                        row,
                        column,
                        name: name.clone(),
                    })?;
                cells.push((row, column, kind));
            }
        }
        Ok(cells)
    }

    /// Rectangle of the cell at `(row, column)`
    pub fn cell_rect(&self, row: usize, column: usize, tuning: &Tuning) -> Rect {
        let start_x = self.column_offset as f32 * tuning.block_width + tuning.border_width;
        let start_y = self.row_offset as f32 * tuning.block_height + tuning.border_width;
        Rect::new(
            start_x + tuning.block_width * column as f32,
            start_y + tuning.block_height * row as f32,
            tuning.block_width,
            tuning.block_height,
        )
    }

    /// Instantiate the block grid. `next_id` hands out entity ids.
    pub fn build_blocks(
        &self,
        level: usize,
        tuning: &Tuning,
        mut next_id: impl FnMut() -> u32,
    ) -> Result<Vec<Block>, LevelError> {
        let cells = self.cells(level)?;
        if !cells.iter().any(|(_, _, kind)| kind.counts_for_clear()) {
            return Err(LevelError::NothingToClear { level });
        }

        let mut blocks = Vec::with_capacity(cells.len());
        for (row, column, kind) in cells {
            let rect = self.cell_rect(row, column, tuning);
            if rect.left() < tuning.min_x()
                || rect.right() > tuning.max_x()
                || rect.top() < tuning.min_y()
                || rect.bottom() > tuning.paddle_y()
            {
                return Err(LevelError::OutOfField { level, row, column });
            }
            blocks.push(Block::new(next_id(), kind, rect, tuning));
        }
        Ok(blocks)
    }
}

/// The ordered level table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub levels: Vec<LevelDef>,
}

impl LevelSet {
    /// Levels bundled with the game, checked against the default tuning
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_LEVELS, &Tuning::default())
    }

    /// Parse a table and build every level once to surface content errors
    pub fn from_json(json: &str, tuning: &Tuning) -> Result<Self, LevelError> {
        let set: LevelSet = serde_json::from_str(json)?;
        set.validate(tuning)?;
        Ok(set)
    }

    pub fn validate(&self, tuning: &Tuning) -> Result<(), LevelError> {
        if self.levels.is_empty() {
            return Err(LevelError::Empty);
        }
        for (index, level) in self.levels.iter().enumerate() {
            level.build_blocks(index, tuning, || 0)?;
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<&LevelDef, LevelError> {
        self.levels.get(index).ok_or(LevelError::NoSuchLevel(index))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
