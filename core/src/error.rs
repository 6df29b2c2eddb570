use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines, at least one cell must be safe")]
    TooManyMines,
    #[error("Mine layout does not match the board size")]
    InvalidBoardShape,
    #[error("Board must have at least one row and one column")]
    InvalidSize,
    #[error("Unknown difficulty, expected beginner, intermediate, expert or custom")]
    UnknownDifficulty,
}

pub type Result<T> = core::result::Result<T, GameError>;
