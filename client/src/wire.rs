use sweeper_core::{Action, Coord, MaskedObservation, ObservedCell};
use sweeper_protocol::{BoardObservation, FLAGGED_CELL, MINE_CELL, MoveResponse, UNKNOWN_CELL};

use crate::MoveError;

pub fn encode_cell(cell: ObservedCell) -> i8 {
    match cell {
        ObservedCell::Unknown => UNKNOWN_CELL,
        ObservedCell::Flagged => FLAGGED_CELL,
        ObservedCell::Open(count) => count as i8,
        ObservedCell::Mine => MINE_CELL,
    }
}

pub fn encode_observation(obs: &MaskedObservation) -> BoardObservation {
    BoardObservation(
        obs.rows()
            .map(|row| row.map(encode_cell).collect())
            .collect(),
    )
}

/// Turns a provider answer into an action, rejecting cells outside a `size`-wide board.
pub fn decode_move(response: &MoveResponse, size: Coord) -> Result<Action, MoveError> {
    let [row, col] = response.position;
    let out_of_bounds = || MoveError::OutOfBounds {
        position: response.position,
        size,
    };
    let row = Coord::try_from(row).map_err(|_| out_of_bounds())?;
    let col = Coord::try_from(col).map_err(|_| out_of_bounds())?;
    if row >= size || col >= size {
        return Err(out_of_bounds());
    }

    Ok(if response.flag {
        Action::flag((row, col))
    } else {
        Action::reveal((row, col))
    })
}
