use ndarray::Array2;
use rand::prelude::*;

use super::*;

/// Rejection-sampling generator: draws uniform cells and discards those that already hold a mine or lie in the safe
/// zone of the first click.
#[derive(Clone, Debug, PartialEq)]
pub struct SafeZoneGenerator {
    seed: u64,
    max_attempts: Option<u32>,
}

impl SafeZoneGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_attempts: None,
        }
    }

    /// Overrides the sampling budget, which otherwise scales with the board area.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

impl BoardGenerator for SafeZoneGenerator {
    fn generate(self, config: GameConfig, safe_origin: Coord2) -> Result<Board> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let max_attempts = self
            .max_attempts
            .unwrap_or_else(|| default_attempt_budget(config));
        place_mines(&mut rng, config, safe_origin, max_attempts)
    }
}

fn default_attempt_budget(config: GameConfig) -> u32 {
    u32::from(config.total_cells()).saturating_mul(256).max(4096)
}

/// Number of cells within Chebyshev distance 1 of `origin`, clipped to the board.
pub fn safe_zone_cells(size: Coord, origin: Coord2) -> CellCount {
    let span = |pos: Coord| {
        let lo = pos.saturating_sub(1);
        let hi = pos.saturating_add(1).min(size.saturating_sub(1));
        CellCount::from(hi - lo + 1)
    };
    span(origin.0) * span(origin.1)
}

/// Places mines with `rng` until `config.mines` are down or `max_attempts` draws were spent.
pub fn place_mines<R: Rng>(
    rng: &mut R,
    config: GameConfig,
    safe_origin: Coord2,
    max_attempts: u32,
) -> Result<Board> {
    let size = config.size;
    if !in_bounds(safe_origin, size) {
        return Err(GameError::InvalidCoords);
    }

    let available = config.total_cells() - safe_zone_cells(size, safe_origin);
    if config.mines > 0 && config.mines >= available {
        log::warn!(
            "Cannot keep start tile safe, requested {} mines but only {} cells are outside the safe zone",
            config.mines,
            available
        );
        return Err(GameError::TooManyMines {
            mines: config.mines,
            available,
        });
    }

    let mut mines: Array2<bool> = Array2::default((size as usize, size as usize));
    let mut mines_placed: CellCount = 0;
    let mut attempts: u32 = 0;

    while mines_placed < config.mines {
        if attempts >= max_attempts {
            log::warn!(
                "Mine placement gave up after {} attempts with {} of {} placed",
                attempts,
                mines_placed,
                config.mines
            );
            return Err(GameError::GenerationExhausted { attempts });
        }
        attempts += 1;

        let candidate: Coord2 = (rng.random_range(0..size), rng.random_range(0..size));
        if mines[candidate.to_nd_index()] || chebyshev(candidate, safe_origin) <= 1 {
            continue;
        }

        mines[candidate.to_nd_index()] = true;
        mines_placed += 1;
    }

    log::debug!(
        "Placed {} mines in {} draws around safe origin {:?}",
        mines_placed,
        attempts,
        safe_origin
    );
    Board::from_mine_mask(&mines)
}
