use core::fmt;
use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress (first click)
/// - InProgress -> Lost
/// - InProgress -> Won
/// - any -> NotStarted (reset)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    Lost,
    Won,
}

impl SessionPhase {
    pub const fn is_started(self) -> bool {
        !matches!(self, Self::NotStarted)
    }

    /// Indicates no further clicks are accepted until a reset
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Lost | Self::Won)
    }
}

impl Default for SessionPhase {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Outcome of a click on the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    NoChange,
    Continue,
    /// The game is lost; the caller decides when to reset.
    MineHit,
    /// Every safe cell is open.
    Cleared,
}

impl ClickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn needs_reset(self) -> bool {
        matches!(self, Self::MineHit)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Reveal,
    Flag,
}

/// A single player or agent move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub coords: Coord2,
    pub kind: ActionKind,
}

impl Action {
    pub const fn reveal(coords: Coord2) -> Self {
        Self {
            coords,
            kind: ActionKind::Reveal,
        }
    }

    pub const fn flag(coords: Coord2) -> Self {
        Self {
            coords,
            kind: ActionKind::Flag,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Click(ClickOutcome),
    Mark(MarkOutcome),
}

/// One game at a time: owns the board, both masks and the phase, and replaces all of them on reset.
///
/// Every reset bumps the generation, which lets late answers computed for an earlier game be told apart.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    board: Option<Board>,
    revealed: Array2<bool>,
    flags: Array2<bool>,
    phase: SessionPhase,
    generation: u64,
    revealed_count: CellCount,
    flagged_count: CellCount,
    seeds: SmallRng,
}

impl GameSession {
    /// Boards are laid out from seeds drawn out of `seed`, so a session replays identically.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let dim = (config.size as usize, config.size as usize);
        Self {
            config,
            board: None,
            revealed: Array2::default(dim),
            flags: Array2::default(dim),
            phase: Default::default(),
            generation: 0,
            revealed_count: 0,
            flagged_count: 0,
            seeds: SmallRng::seed_from_u64(seed),
        }
    }

    /// Resumes play on a known layout, as if its first click had already happened.
    ///
    /// Later games after a reset are generated from `seed` as usual.
    pub fn from_board(board: Board, seed: u64) -> Self {
        let mut session = Self::new(board.game_config(), seed);
        session.board = Some(board);
        session.phase = SessionPhase::InProgress;
        session
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn size(&self) -> Coord {
        self.config.size
    }

    /// The layout, once the first click generated one.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn revealed(&self) -> &Array2<bool> {
        &self.revealed
    }

    pub fn flags(&self) -> &Array2<bool> {
        &self.flags
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size()) && self.revealed[coords.to_nd_index()]
    }

    /// Flag on a hidden cell. A flag opened by the flood fill no longer counts.
    pub fn is_flagged(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size()) && {
            let index = coords.to_nd_index();
            self.flags[index] && !self.revealed[index]
        }
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// How many mines have not been flagged yet, counting only flags on hidden cells.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count as isize)
    }

    /// Out-of-bounds coordinates read as [`Tile::Hidden`].
    pub fn tile_at(&self, coords: Coord2) -> Tile {
        if !in_bounds(coords, self.size()) {
            return Tile::Hidden;
        }
        let index = coords.to_nd_index();
        match &self.board {
            Some(board) if self.revealed[index] => match board[coords] {
                Cell::Mine => Tile::Mine,
                Cell::Clear(count) => Tile::Open(count),
            },
            _ if self.flags[index] => Tile::Flagged,
            _ => Tile::Hidden,
        }
    }

    pub fn observe(&self) -> Result<MaskedObservation> {
        MaskedObservation::new(self.board.as_ref(), &self.revealed, &self.flags)
    }

    /// Opens a cell. The first click of a game lays out the board around it before revealing.
    pub fn click(&mut self, coords: Coord2) -> Result<ClickOutcome> {
        self.validate_coords(coords)?;

        match self.phase {
            SessionPhase::Lost | SessionPhase::Won => return Err(GameError::AlreadyEnded),
            SessionPhase::NotStarted => self.start(coords)?,
            SessionPhase::InProgress => {}
        }

        let Some(board) = self.board.as_ref() else {
            return Err(GameError::InvalidBoardShape);
        };

        let revealed = reveal(board, &mut self.revealed, coords)?;
        if revealed.has_update() {
            self.flagged_count = self.count_hidden_flags();
        }

        Ok(match revealed {
            RevealOutcome::NoChange => ClickOutcome::NoChange,
            RevealOutcome::MineHit => {
                self.phase = SessionPhase::Lost;
                log::debug!("Game {} lost at {:?}", self.generation, coords);
                ClickOutcome::MineHit
            }
            RevealOutcome::Continue { opened } => {
                self.revealed_count += opened;
                if self.revealed_count == board.safe_cell_count() {
                    self.phase = SessionPhase::Won;
                    log::debug!("Game {} cleared", self.generation);
                    ClickOutcome::Cleared
                } else {
                    ClickOutcome::Continue
                }
            }
        })
    }

    /// Toggles a flag in any phase; revealed cells are left unchanged.
    pub fn flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.validate_coords(coords)?;

        let outcome = toggle_flag(&self.revealed, &mut self.flags, coords)?;
        match outcome {
            MarkOutcome::Placed => self.flagged_count += 1,
            MarkOutcome::Removed => self.flagged_count -= 1,
            MarkOutcome::NoChange => {}
        }
        Ok(outcome)
    }

    /// Abandons the current game, whatever its phase, and waits for a new first click.
    pub fn reset(&mut self) {
        let dim = (self.config.size as usize, self.config.size as usize);
        self.board = None;
        self.revealed = Array2::default(dim);
        self.flags = Array2::default(dim);
        self.phase = SessionPhase::NotStarted;
        self.revealed_count = 0;
        self.flagged_count = 0;
        self.generation = self.generation.wrapping_add(1);
        log::debug!("Session reset, now on game {}", self.generation);
    }

    pub fn apply(&mut self, action: Action) -> Result<ActionOutcome> {
        match action.kind {
            ActionKind::Reveal => self.click(action.coords).map(ActionOutcome::Click),
            ActionKind::Flag => self.flag(action.coords).map(ActionOutcome::Mark),
        }
    }

    /// Applies `action` only if the session is still on game `generation`.
    pub fn apply_for(&mut self, generation: u64, action: Action) -> Result<ActionOutcome> {
        if generation != self.generation {
            return Err(GameError::StaleGeneration {
                issued: generation,
                current: self.generation,
            });
        }
        self.apply(action)
    }

    fn count_hidden_flags(&self) -> CellCount {
        self.flags
            .iter()
            .zip(self.revealed.iter())
            .filter(|&(&flag, &open)| flag && !open)
            .count() as CellCount
    }

    fn start(&mut self, safe_origin: Coord2) -> Result<()> {
        let seed = self.seeds.random();
        let board = SafeZoneGenerator::new(seed).generate(self.config, safe_origin)?;
        self.board = Some(board);
        self.phase = SessionPhase::InProgress;
        log::debug!(
            "Game {} started at {:?} with seed {}",
            self.generation,
            safe_origin,
            seed
        );
        Ok(())
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }
}

/// Text grid with column and row headers, one glyph per cell.
impl fmt::Display for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        write!(f, "   ")?;
        for col in 0..size {
            write!(f, "{:>2}", col % 100)?;
        }
        writeln!(f)?;
        for row in 0..size {
            write!(f, "{:>2} ", row % 100)?;
            for col in 0..size {
                write!(f, " {}", self.tile_at((row, col)).glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn started_session(mines: &[Coord2], first_click: Coord2) -> GameSession {
        let board = Board::from_mine_coords(5, mines).unwrap();
        let mut session = GameSession::from_board(board, 0);
        session.click(first_click).unwrap();
        session
    }

    #[test]
    fn first_click_generates_safe_board_and_starts() {
        let mut session = GameSession::new(GameConfig::default(), 11);
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert!(session.board().is_none());

        let outcome = session.click((4, 4)).unwrap();

        assert!(matches!(outcome, ClickOutcome::Continue | ClickOutcome::Cleared));
        assert_eq!(session.phase(), SessionPhase::InProgress);
        let board = session.board().unwrap();
        assert_eq!(board.mine_count(), 20);
        for row in 3..=5 {
            for col in 3..=5 {
                assert!(!board.contains_mine((row, col)));
                assert!(session.is_revealed((row, col)), "({row}, {col}) should be open");
            }
        }
    }

    #[test]
    fn mine_hit_loses_and_leaves_flags_alone() {
        let mut session = started_session(&[(0, 0), (4, 4)], (1, 1));
        assert_eq!(session.phase(), SessionPhase::InProgress);
        session.flag((4, 4)).unwrap();
        let flags_before = session.flags().clone();

        assert_eq!(session.click((0, 0)), Ok(ClickOutcome::MineHit));

        assert!(ClickOutcome::MineHit.needs_reset());
        assert_eq!(session.phase(), SessionPhase::Lost);
        assert_eq!(session.flags(), &flags_before);
        assert_eq!(session.tile_at((0, 0)), Tile::Mine);
        assert_eq!(session.click((2, 2)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn flag_after_reveal_does_not_change_flags() {
        let mut session = started_session(&[(4, 4)], (0, 0));
        assert!(session.is_revealed((0, 0)));

        let outcome = session.flag((0, 0)).unwrap();
        assert_eq!(outcome, MarkOutcome::NoChange);
        assert!(!outcome.has_update());
        assert!(!session.is_flagged((0, 0)));
        assert_eq!(session.flagged_count(), 0);
    }

    #[test]
    fn flag_toggles_and_tracks_mines_left() {
        let mut session = started_session(&[(4, 4), (4, 3)], (3, 3));
        assert_eq!(session.tile_at((3, 3)), Tile::Open(2));

        assert_eq!(session.flag((4, 4)), Ok(MarkOutcome::Placed));
        assert_eq!(session.mines_left(), 1);
        assert_eq!(session.tile_at((4, 4)), Tile::Flagged);
        assert_eq!(session.flag((4, 4)), Ok(MarkOutcome::Removed));
        assert_eq!(session.mines_left(), 2);
    }

    #[test]
    fn flags_are_allowed_before_the_first_click() {
        let mut session = GameSession::new(GameConfig::default(), 3);

        assert_eq!(session.flag((8, 8)), Ok(MarkOutcome::Placed));
        session.click((0, 0)).unwrap();

        assert!(session.is_flagged((8, 8)) || session.is_revealed((8, 8)));
        assert_eq!(session.flag((9, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn clearing_every_safe_cell_wins() {
        let mut session = GameSession::new(GameConfig::new_unchecked(3, 0), 5);

        assert_eq!(session.click((1, 1)), Ok(ClickOutcome::Cleared));
        assert_eq!(session.phase(), SessionPhase::Won);
        assert_eq!(session.revealed_count(), 9);
    }

    #[test]
    fn clicking_open_cell_is_no_change() {
        let mut session = started_session(&[(0, 0)], (1, 1));

        assert_eq!(session.click((1, 1)), Ok(ClickOutcome::NoChange));
        assert_eq!(session.revealed_count(), 1);
    }

    #[test]
    fn reset_then_click_starts_fresh_game() {
        let mut session = started_session(&[(0, 4)], (1, 3));
        session.click((0, 4)).unwrap();
        assert_eq!(session.phase(), SessionPhase::Lost);
        let previous = session.generation();

        session.reset();

        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(session.generation(), previous + 1);
        assert!(session.board().is_none());
        assert!(session.revealed().iter().all(|&open| !open));
        assert!(session.flags().iter().all(|&flag| !flag));
        assert_eq!(session.revealed_count(), 0);

        session.click((2, 2)).unwrap();
        assert!(session.phase().is_started());
        assert!(session.is_revealed((2, 2)));
    }

    #[test]
    fn reset_mid_game_is_allowed() {
        let mut session = GameSession::new(GameConfig::default(), 1);
        session.click((4, 4)).unwrap();
        session.flag((0, 0)).ok();
        assert_eq!(session.phase(), SessionPhase::InProgress);

        session.reset();

        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(session.flagged_count(), 0);

        assert!(session.click((0, 0)).unwrap().has_update());
        assert!(session.phase().is_started());
        assert!(session.is_revealed((0, 0)));
        assert!(session.board().is_some_and(|board| !board.contains_mine((0, 0))));
    }

    #[test]
    fn reset_after_win_starts_fresh_game() {
        let mut session = GameSession::new(GameConfig::new_unchecked(3, 0), 5);
        assert_eq!(session.click((1, 1)), Ok(ClickOutcome::Cleared));
        assert_eq!(session.click((0, 0)), Err(GameError::AlreadyEnded));

        session.reset();

        assert_eq!(session.revealed_count(), 0);
        assert_eq!(session.click((0, 0)), Ok(ClickOutcome::Cleared));
        assert_eq!(session.phase(), SessionPhase::Won);
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn flood_fill_over_a_flag_drops_it_from_the_count() {
        let board = Board::from_mine_coords(5, &[(4, 4)]).unwrap();
        let mut session = GameSession::from_board(board, 0);
        session.flag((0, 1)).unwrap();
        session.flag((3, 4)).unwrap();
        assert_eq!(session.flagged_count(), 2);
        assert_eq!(session.mines_left(), -1);

        // (3, 4) borders the mine, so the flood opens it as a number
        session.click((0, 0)).unwrap();

        assert_eq!(session.tile_at((0, 1)), Tile::Open(0));
        assert!(!session.is_flagged((0, 1)));
        assert!(!session.is_flagged((3, 4)));
        assert_eq!(session.flagged_count(), 0);
        assert_eq!(session.mines_left(), 1);
    }

    #[test]
    fn flood_fill_keeps_flags_on_cells_it_does_not_reach() {
        let mut session = started_session(&[(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)], (0, 3));
        session.flag((2, 0)).unwrap();
        session.flag((2, 4)).unwrap();
        assert_eq!(session.flagged_count(), 2);

        session.click((4, 0)).unwrap();

        assert!(session.is_revealed((2, 0)));
        assert!(session.is_flagged((2, 4)));
        assert_eq!(session.flagged_count(), 1);
        assert_eq!(session.mines_left(), 4);
        assert_eq!(session.flag((2, 4)), Ok(MarkOutcome::Removed));
        assert_eq!(session.flagged_count(), 0);
    }

    #[test]
    fn tile_outside_the_board_is_hidden() {
        let session = started_session(&[(4, 4)], (4, 3));

        assert_eq!(session.tile_at((5, 0)), Tile::Hidden);
        assert_eq!(session.tile_at((0, 200)), Tile::Hidden);
    }

    #[test]
    fn stale_generation_is_rejected_without_mutation() {
        let mut session = GameSession::new(GameConfig::default(), 9);
        let issued = session.generation();
        session.reset();

        assert_eq!(
            session.apply_for(issued, Action::reveal((4, 4))),
            Err(GameError::StaleGeneration {
                issued,
                current: issued + 1
            })
        );
        assert_eq!(session.phase(), SessionPhase::NotStarted);
    }

    #[test]
    fn flag_action_leaves_reveal_mask_unchanged() {
        let mut session = started_session(&[(4, 4)], (4, 3));
        let revealed_before = session.revealed().clone();
        assert!(!session.is_revealed((2, 3)));

        let outcome = session.apply(Action::flag((2, 3))).unwrap();

        assert_eq!(outcome, ActionOutcome::Mark(MarkOutcome::Placed));
        assert!(session.is_flagged((2, 3)));
        assert_eq!(session.revealed(), &revealed_before);
    }

    #[test]
    fn reveal_action_on_zero_cell_opens_region() {
        let mut session = started_session(&[(4, 4)], (4, 3));
        assert_eq!(session.board().unwrap()[(2, 3)], Cell::Clear(0));

        let outcome = session.apply(Action::reveal((2, 3))).unwrap();

        assert_eq!(outcome, ActionOutcome::Click(ClickOutcome::Cleared));
        for (coords, cell) in session.board().unwrap().iter_cells() {
            assert_eq!(session.is_revealed(coords), !cell.is_mine(), "at {:?}", coords);
        }
    }

    #[test]
    fn display_renders_glyph_grid() {
        let mut session = started_session(&[(0, 0)], (4, 4));
        session.flag((0, 0)).unwrap();

        let text = session.to_string();
        let lines: alloc::vec::Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "    0 1 2 3 4");
        assert_eq!(lines[1].trim_end(), " 0  F 1");
        assert_eq!(lines[5].trim_end(), " 4");
    }
}
