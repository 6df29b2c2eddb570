use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Smallest row/column count accepted for a custom board.
pub const CUSTOM_MIN_SIDE: Coord = 5;
/// Largest row/column count accepted for a custom board.
pub const CUSTOM_MAX_SIDE: Coord = 30;

/// Board dimensions `(rows, cols)` and the number of mines to place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const BEGINNER: Self = Self::new_unchecked((9, 9), 10);
    pub const INTERMEDIATE: Self = Self::new_unchecked((16, 16), 40);
    pub const EXPERT: Self = Self::new_unchecked((16, 30), 99);

    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Accepts a configuration only if it leaves at least one safe cell.
    pub fn try_new(size: Coord2, mines: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        if mines >= mult(size.0, size.1) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(size, mines))
    }

    /// Clamps user-entered values into the custom difficulty bounds: each side in `[5, 30]` and
    /// mines in `[1, floor(rows * cols * 0.8)]`.
    pub fn custom((rows, cols): Coord2, mines: CellCount) -> Self {
        let rows = rows.clamp(CUSTOM_MIN_SIDE, CUSTOM_MAX_SIDE);
        let cols = cols.clamp(CUSTOM_MIN_SIDE, CUSTOM_MAX_SIDE);
        let max_mines = mult(rows, cols) * 4 / 5;
        let clamped = mines.clamp(1, max_mines);
        if clamped != mines {
            log::warn!(
                "Custom mine count {} out of range, using {} for {}x{}",
                mines,
                clamped,
                rows,
                cols
            );
        }
        Self::new_unchecked((rows, cols), clamped)
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::BEGINNER
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
    Custom { size: Coord2, mines: CellCount },
}

impl Difficulty {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
            Self::Custom { .. } => "custom",
        }
    }

    pub fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::BEGINNER,
            Self::Intermediate => GameConfig::INTERMEDIATE,
            Self::Expert => GameConfig::EXPERT,
            Self::Custom { size, mines } => GameConfig::custom(size, mines),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom {
                size: (rows, cols),
                mines,
            } => write!(f, "custom:{rows}x{cols}:{mines}"),
            preset => f.write_str(preset.name()),
        }
    }
}

/// Parses `beginner`, `intermediate`, `expert` or `custom:ROWSxCOLS:MINES`.
impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        for preset in [Self::Beginner, Self::Intermediate, Self::Expert] {
            if s.eq_ignore_ascii_case(preset.name()) {
                return Ok(preset);
            }
        }

        let rest = s
            .strip_prefix("custom:")
            .ok_or(GameError::UnknownDifficulty)?;
        let (dims, mines) = rest.split_once(':').ok_or(GameError::UnknownDifficulty)?;
        let (rows, cols) = dims
            .split_once(['x', 'X'])
            .ok_or(GameError::UnknownDifficulty)?;

        // oversized sides saturate, they get clamped anyway
        let side = |v: &str| -> Result<Coord> {
            v.trim()
                .parse::<u32>()
                .map(|n| n.min(Coord::MAX.into()) as Coord)
                .map_err(|_| GameError::UnknownDifficulty)
        };
        let mines = mines
            .trim()
            .parse::<u32>()
            .map(|n| n.min(CellCount::MAX.into()) as CellCount)
            .map_err(|_| GameError::UnknownDifficulty)?;

        Ok(Self::Custom {
            size: (side(rows)?, side(cols)?),
            mines,
        })
    }
}
