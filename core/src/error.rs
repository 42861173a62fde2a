use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Cannot place {requested} mines, only {available} tiles are outside the safe zone")]
    NotEnoughCandidates {
        requested: CellCount,
        available: CellCount,
    },
    #[error("Mine sampler did not return the requested number of distinct candidates")]
    SamplerContract,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
