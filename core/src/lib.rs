#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use error::*;
pub use flag::*;
pub use generator::*;
pub use observation::*;
pub use reveal::*;
pub use session::*;
pub use tile::*;
pub use types::*;

mod board;
mod error;
mod flag;
mod generator;
mod observation;
mod reveal;
mod session;
mod tile;
mod types;

/// Fixed square board size and mine count of a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const DEFAULT_SIZE: Coord = 9;
    pub const DEFAULT_MINES: CellCount = 20;

    pub const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates that `mines` still fits when the first click lands in the middle of the board, where the safe
    /// zone is largest.
    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        if size == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        let center = size / 2;
        let available = mult(size, size) - safe_zone_cells(size, (center, center));
        if mines > 0 && mines >= available {
            return Err(GameError::TooManyMines { mines, available });
        }
        Ok(Self::new_unchecked(size, mines))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(Self::DEFAULT_SIZE, Self::DEFAULT_MINES)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Placed,
    Removed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Continue { opened: CellCount },
    MineHit,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}
