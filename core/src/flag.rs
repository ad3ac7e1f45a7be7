use ndarray::Array2;

use crate::*;

/// Toggles the player marker at `coords`; revealed cells are left alone.
pub fn toggle_flag(
    revealed: &Array2<bool>,
    flags: &mut Array2<bool>,
    coords: Coord2,
) -> Result<MarkOutcome> {
    use MarkOutcome::*;

    if revealed.dim() != flags.dim() {
        return Err(GameError::InvalidBoardShape);
    }
    let (rows, cols) = flags.dim();
    if usize::from(coords.0) >= rows || usize::from(coords.1) >= cols {
        return Err(GameError::InvalidCoords);
    }

    let index = coords.to_nd_index();
    if revealed[index] {
        return Ok(NoChange);
    }

    let flag = &mut flags[index];
    *flag = !*flag;
    Ok(if *flag { Placed } else { Removed })
}
