use thiserror::Error;

use crate::PowerUp;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("No charges left for {0}")]
    NoCharges(PowerUp),
    #[error("Nothing to undo")]
    EmptyUndoLog,
    #[error("Unknown difficulty")]
    UnknownDifficulty,
    #[error("Unknown power-up")]
    UnknownPowerUp,
}

pub type Result<T> = core::result::Result<T, GameError>;
