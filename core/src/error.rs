use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines: {mines} requested but only {available} cells lie outside the safe zone")]
    TooManyMines { mines: CellCount, available: CellCount },
    #[error("Gave up placing mines after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Move was computed for game {issued} but the session is on game {current}")]
    StaleGeneration { issued: u64, current: u64 },
}

pub type Result<T> = core::result::Result<T, GameError>;
