use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What an outside agent may know about a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObservedCell {
    Unknown,
    Flagged,
    Open(u8),
    /// Only observable once a game was lost.
    Mine,
}

/// Agent-visible board: ground truth for revealed cells only.
///
/// Built on demand from the board and both masks, never stored alongside them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaskedObservation {
    cells: Array2<ObservedCell>,
}

impl MaskedObservation {
    /// Masks `board` through `revealed` and `flags`. Without a board nothing can have been revealed yet.
    pub fn new(board: Option<&Board>, revealed: &Array2<bool>, flags: &Array2<bool>) -> Result<Self> {
        let dim = revealed.dim();
        if flags.dim() != dim || dim.0 != dim.1 {
            return Err(GameError::InvalidBoardShape);
        }
        if let Some(board) = board {
            if usize::from(board.size()) != dim.0 {
                return Err(GameError::InvalidBoardShape);
            }
        }

        let mut cells = Array2::from_elem(dim, ObservedCell::Unknown);
        for ((row, col), observed) in cells.indexed_iter_mut() {
            if revealed[(row, col)] {
                let Some(board) = board else {
                    return Err(GameError::InvalidBoardShape);
                };
                *observed = match board[(row as Coord, col as Coord)] {
                    Cell::Mine => ObservedCell::Mine,
                    Cell::Clear(count) => ObservedCell::Open(count),
                };
            } else if flags[(row, col)] {
                *observed = ObservedCell::Flagged;
            }
        }

        Ok(Self { cells })
    }

    pub fn cell_at(&self, coords: Coord2) -> ObservedCell {
        self.cells[coords.to_nd_index()]
    }

    /// Row-major rows, the layout agents receive.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = ObservedCell> + '_> + '_ {
        self.cells.rows().into_iter().map(|row| row.into_iter().copied())
    }
}
