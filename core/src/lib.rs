#![no_std]

extern crate alloc;

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use chord::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use input::*;
pub use reveal::RevealReport;
pub use session::*;
pub use tile::*;
pub use types::*;

mod chord;
mod engine;
mod error;
mod generator;
mod grid;
mod input;
mod reveal;
mod session;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    /// Builds a config without normalizing it, callers are responsible for keeping `mines` below the tile count.
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Normalizes the requested configuration: both dimensions are at least one and at least one tile is left free
    /// of mines, so the first reveal can always be made safe.
    pub fn new((size_x, size_y): Coord2, mines: CellCount) -> Self {
        let size_x = size_x.clamp(1, Coord::MAX);
        let size_y = size_y.clamp(1, Coord::MAX);
        let max_mines = mult(size_x, size_y) - 1;
        if mines > max_mines {
            log::warn!(
                "Too many mines requested, clamping {} to {} for a {}x{} field",
                mines,
                max_mines,
                size_x,
                size_y
            );
        }
        Self::new_unchecked((size_x, size_y), mines.min(max_mines))
    }

    pub const fn total_tiles(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResizeOutcome {
    Unchanged,
    Changed,
}

impl ResizeOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Outcome of revealing one or more tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Used to merge outcomes when revealing several tiles at once
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
