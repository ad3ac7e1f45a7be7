use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Ground truth of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Mine,
    /// Number of mines among the up to 8 neighbors.
    Clear(u8),
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Clear(0))
    }
}

/// Fully determined square minefield with precomputed adjacency counts.
///
/// Immutable once built; a session replaces it wholesale on reset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    pub fn from_mine_mask(mine_mask: &Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        if rows != cols || rows > usize::from(Coord::MAX) {
            return Err(GameError::InvalidBoardShape);
        }

        let mut mine_count: CellCount = 0;
        let cells = Array2::from_shape_fn((rows, cols), |(row, col)| {
            if mine_mask[(row, col)] {
                mine_count += 1;
                return Cell::Mine;
            }
            let center = (row as Coord, col as Coord);
            let adjacent = mine_mask
                .iter_neighbors(center)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count();
            Cell::Clear(adjacent as u8)
        });

        Ok(Self { cells, mine_count })
    }

    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default((size as usize, size as usize));

        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(&mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord {
        self.cells.nrows() as Coord
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size(), self.size())
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords].is_mine()
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Iterates every position with its cell, row-major.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.cells[(row as usize, col as usize)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_computed_from_neighbors() {
        let board = Board::from_mine_coords(3, &[(0, 0), (2, 2)]).unwrap();

        assert_eq!(board.mine_count(), 2);
        assert_eq!(board[(0, 0)], Cell::Mine);
        assert_eq!(board[(1, 1)], Cell::Clear(2));
        assert_eq!(board[(0, 2)], Cell::Clear(0));
        assert_eq!(board[(0, 1)], Cell::Clear(1));
        assert_eq!(board.safe_cell_count(), 7);
    }

    #[test]
    fn rejects_out_of_bounds_mines() {
        assert_eq!(
            Board::from_mine_coords(3, &[(3, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn rejects_non_square_masks() {
        let mask: Array2<bool> = Array2::default((2, 3));

        assert_eq!(
            Board::from_mine_mask(&mask),
            Err(GameError::InvalidBoardShape)
        );
    }
}
