use serde::{Deserialize, Serialize};

/// Player-visible state of a cell, what a front-end draws.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Hidden,
    Flagged,
    Open(u8),
    Mine,
}

impl Tile {
    /// Text glyph: `X` for a mine, `F` for a flag, blank for zero and the digit otherwise.
    pub const fn glyph(self) -> char {
        match self {
            Self::Hidden => '#',
            Self::Flagged => 'F',
            Self::Mine => 'X',
            Self::Open(0) => ' ',
            Self::Open(count) => (b'0' + count) as char,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::Hidden
    }
}
