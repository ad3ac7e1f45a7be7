use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;

/// Opens `coords` on `revealed`, flood-filling through zero cells.
///
/// A mine only marks its own cell. Otherwise every cell reachable through zero-valued cells is opened together with
/// the numbered cells bordering that region. The mask doubles as the visited set, so a cell is expanded at most once
/// and repeated calls on an open region change nothing.
pub fn reveal(board: &Board, revealed: &mut Array2<bool>, coords: Coord2) -> Result<RevealOutcome> {
    let coords = board.validate_coords(coords)?;
    let size = board.size() as usize;
    if revealed.dim() != (size, size) {
        return Err(GameError::InvalidBoardShape);
    }

    if revealed[coords.to_nd_index()] {
        return Ok(RevealOutcome::NoChange);
    }

    if board.contains_mine(coords) {
        revealed[coords.to_nd_index()] = true;
        log::debug!("Mine hit at {:?}", coords);
        return Ok(RevealOutcome::MineHit);
    }

    let mut opened: CellCount = 0;
    let mut to_visit = Vec::from([coords]);

    while let Some(visit_coords) = to_visit.pop() {
        if revealed[visit_coords.to_nd_index()] {
            continue;
        }

        revealed[visit_coords.to_nd_index()] = true;
        opened += 1;

        let cell = board[visit_coords];
        log::trace!("Flood opened cell at {:?}: {:?}", visit_coords, cell);

        if cell.is_zero() {
            to_visit.extend(
                board
                    .iter_neighbors(visit_coords)
                    .filter(|&pos| !revealed[pos.to_nd_index()]),
            );
        }
    }

    log::debug!("Reveal at {:?} opened {} cells", coords, opened);
    Ok(RevealOutcome::Continue { opened })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;

    fn mask(size: Coord) -> Array2<bool> {
        Array2::default((size as usize, size as usize))
    }

    fn open_set(revealed: &Array2<bool>) -> BTreeSet<Coord2> {
        revealed
            .indexed_iter()
            .filter(|&(_, &open)| open)
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .collect()
    }

    #[test]
    fn mine_reveals_only_itself() {
        let board = Board::from_mine_coords(3, &[(1, 1)]).unwrap();
        let mut revealed = mask(3);

        assert_eq!(reveal(&board, &mut revealed, (1, 1)), Ok(RevealOutcome::MineHit));
        assert_eq!(open_set(&revealed), BTreeSet::from([(1, 1)]));
    }

    #[test]
    fn numbered_cell_does_not_expand() {
        let board = Board::from_mine_coords(3, &[(0, 0)]).unwrap();
        let mut revealed = mask(3);

        assert_eq!(
            reveal(&board, &mut revealed, (1, 1)),
            Ok(RevealOutcome::Continue { opened: 1 })
        );
        assert_eq!(open_set(&revealed), BTreeSet::from([(1, 1)]));
    }

    #[test]
    fn zero_region_opens_with_numbered_border() {
        // column 3 is a wall of mines; columns 0..=1 are zero, column 2 is their numbered border
        let board = Board::from_mine_coords(5, &[(0, 3), (1, 3), (2, 3), (3, 3), (4, 3)]).unwrap();
        let mut revealed = mask(5);

        let outcome = reveal(&board, &mut revealed, (2, 0)).unwrap();

        let expected: BTreeSet<Coord2> = (0..5).flat_map(|row| (0..3).map(move |col| (row, col))).collect();
        assert_eq!(outcome, RevealOutcome::Continue { opened: 15 });
        assert_eq!(open_set(&revealed), expected);
        assert!(!revealed[[0, 4]]);
    }

    #[test]
    fn diagonal_zero_cells_are_connected() {
        // two zero regions touching only at a corner still join under 8-connectivity
        let board = Board::from_mine_coords(4, &[(0, 3), (3, 0)]).unwrap();
        let mut revealed = mask(4);

        reveal(&board, &mut revealed, (0, 0)).unwrap();

        assert!(revealed[[3, 3]]);
        assert!(!revealed[[0, 3]]);
        assert!(!revealed[[3, 0]]);
        assert_eq!(open_set(&revealed).len(), 14);
    }

    #[test]
    fn second_reveal_of_open_region_is_no_op() {
        let board = Board::from_mine_coords(4, &[(3, 3)]).unwrap();
        let mut revealed = mask(4);

        reveal(&board, &mut revealed, (0, 0)).unwrap();
        let before = revealed.clone();

        assert_eq!(reveal(&board, &mut revealed, (0, 0)), Ok(RevealOutcome::NoChange));
        assert_eq!(reveal(&board, &mut revealed, (1, 1)), Ok(RevealOutcome::NoChange));
        assert_eq!(revealed, before);
    }

    #[test]
    fn large_empty_board_does_not_overflow() {
        let board = Board::from_mine_coords(255, &[]).unwrap();
        let mut revealed = mask(255);

        let outcome = reveal(&board, &mut revealed, (127, 127)).unwrap();

        assert_eq!(outcome, RevealOutcome::Continue { opened: 255 * 255 });
        assert!(revealed.iter().all(|&open| open));
    }

    #[test]
    fn rejects_bad_coords_and_mask_shape() {
        let board = Board::from_mine_coords(3, &[]).unwrap();

        assert_eq!(
            reveal(&board, &mut mask(3), (3, 0)),
            Err(GameError::InvalidCoords)
        );
        assert_eq!(
            reveal(&board, &mut mask(2), (0, 0)),
            Err(GameError::InvalidBoardShape)
        );
    }
}
