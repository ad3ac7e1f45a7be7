//! Wire format spoken between the game and a move-provider.
//!
//! A move request is a bare JSON array of rows, one integer per cell. The provider answers with a single action.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cell the agent knows nothing about.
pub const UNKNOWN_CELL: i8 = -1;
/// Hidden cell carrying a player flag.
pub const FLAGGED_CELL: i8 = 9;
/// Revealed mine, only present once a game was lost.
pub const MINE_CELL: i8 = 10;

/// Move-selection strategies the provider implements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Deterministic rule-based solver.
    Basic,
    /// Guesses the cell least likely to hold a mine.
    Probability,
    /// Trainable reinforcement-learning agent.
    #[serde(rename = "rl", alias = "reinforcement")]
    Reinforcement,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Self::Basic, Self::Probability, Self::Reinforcement];

    /// Path segment selecting the strategy on the provider.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Probability => "probability",
            Self::Reinforcement => "rl",
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Basic
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" | "rules" | "rule-based" => Ok(Self::Basic),
            "probability" | "prob" => Ok(Self::Probability),
            "rl" | "reinforcement" => Ok(Self::Reinforcement),
            _ => Err(format!("Unknown strategy: {}", s)),
        }
    }
}

/// Request body: `size` rows of `size` cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardObservation(pub Vec<Vec<i8>>);

impl BoardObservation {
    pub fn size(&self) -> usize {
        self.0.len()
    }
}

/// Provider answer: the cell to act on and whether to flag it instead of revealing it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    #[serde(rename = "move")]
    pub position: [usize; 2],
    /// Older providers omit the field and only ever reveal.
    #[serde(default)]
    pub flag: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainResponse {
    pub message: String,
}
