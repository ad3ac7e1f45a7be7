use crate::*;
pub use safe_zone::*;

mod safe_zone;

pub trait BoardGenerator {
    /// Lays out `config.mines` mines, keeping the 3x3 zone around `safe_origin` clear.
    fn generate(self, config: GameConfig, safe_origin: Coord2) -> Result<Board>;
}
