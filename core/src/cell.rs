use serde::{Deserialize, Serialize};

/// One grid position as seen by both the engine and the front-end.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) is_mine: bool,
    pub(crate) is_revealed: bool,
    pub(crate) is_flagged: bool,
    pub(crate) neighbor_mines: u8,
}

impl Cell {
    /// Only meaningful to show once the cell is revealed or the game is over.
    pub const fn is_mine(self) -> bool {
        self.is_mine
    }

    pub const fn is_revealed(self) -> bool {
        self.is_revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.is_flagged
    }

    /// Adjacent mine count, unused for mine cells.
    pub const fn neighbor_mines(self) -> u8 {
        self.neighbor_mines
    }

    /// A revealed cell with no adjacent mines.
    pub const fn is_blank(self) -> bool {
        self.is_revealed && !self.is_mine && self.neighbor_mines == 0
    }

    pub(crate) const fn can_reveal(self) -> bool {
        !self.is_revealed && !self.is_flagged
    }

    pub(crate) const fn symbol(self) -> char {
        match (self.is_revealed, self.is_flagged, self.is_mine) {
            (false, true, _) => 'F',
            (false, false, _) => '#',
            (true, _, true) => '*',
            (true, _, false) => match self.neighbor_mines {
                0 => '.',
                n => (b'0' + n) as char,
            },
        }
    }
}
