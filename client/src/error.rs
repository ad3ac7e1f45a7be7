use sweeper_core::{Coord, GameError};
use thiserror::Error;

/// Failure talking to the move-provider. Nothing local has changed when one of these is returned.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to reach move provider: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Move provider answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed move provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum MoveError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("Another agent move is already in flight")]
    Busy,
    #[error("Move {position:?} lies outside the {size}x{size} board")]
    OutOfBounds { position: [usize; 2], size: Coord },
    #[error("Discarded move computed for game {issued}, the session moved on to game {current}")]
    Stale { issued: u64, current: u64 },
    #[error("Game rejected the move: {0}")]
    Rejected(GameError),
}

impl From<GameError> for MoveError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::StaleGeneration { issued, current } => Self::Stale { issued, current },
            err => Self::Rejected(err),
        }
    }
}
