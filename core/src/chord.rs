use serde::{Deserialize, Serialize};

use crate::reveal::reveal_tile;
use crate::*;

/// Two-phase chord gesture: `begin` highlights the covered neighbors of a tile, `end` either reveals all of them or
/// drops the highlight.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordController {
    chording: bool,
}

/// How a chord gesture finished.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChordOutcome {
    /// The center was not a revealed number matching its flags, highlights were dropped.
    Abandoned,
    /// Every unflagged tile around the center was revealed.
    Revealed(RevealReport),
}

impl ChordController {
    pub fn is_chording(&self) -> bool {
        self.chording
    }

    pub fn begin(&mut self, grid: &mut Grid, coords: Coord2) {
        let pressed = grid
            .neighborhood(coords, 1)
            .into_iter()
            .filter(|&index| grid[index].press())
            .count();
        log::trace!("Chord started at {:?}, {} tiles pressed", coords, pressed);
        self.chording = true;
    }

    pub fn end(&mut self, grid: &mut Grid, coords: Coord2) -> ChordOutcome {
        self.chording = false;

        if !grid.tile(coords).is_revealed() {
            log::trace!("Chord abandoned at covered tile {:?}", coords);
            self.abandon(grid, coords);
            return ChordOutcome::Abandoned;
        }

        let flags = count_flags(grid, coords);
        let mines = grid.adjacent_mine_count(coords);
        if flags != mines {
            log::debug!(
                "Chord at {:?} abandoned, {} flags around {} mines",
                coords,
                flags,
                mines
            );
            self.abandon(grid, coords);
            return ChordOutcome::Abandoned;
        }

        let mut report = RevealReport::default();
        for index in grid.neighborhood(coords, 1) {
            let neighbor = grid.coords_of(index);
            report.merge(reveal_tile(grid, neighbor));
        }
        log::debug!("Chord at {:?} revealed {} tiles", coords, report.revealed);
        ChordOutcome::Revealed(report)
    }

    /// Ends the chord wherever its highlight was moved to, releasing every pressed tile of the grid.
    pub(crate) fn cancel(&mut self, grid: &mut Grid) {
        self.chording = false;
        for tile in grid.iter_mut() {
            tile.release();
        }
    }

    /// Drops the highlight around `coords` without revealing anything.
    fn abandon(&mut self, grid: &mut Grid, coords: Coord2) {
        self.chording = false;
        for index in grid.neighborhood(coords, 1) {
            grid[index].release();
        }
    }
}

fn count_flags(grid: &Grid, coords: Coord2) -> u8 {
    grid.neighborhood(coords, 1)
        .into_iter()
        .filter(|&index| grid[index].is_flagged())
        .count() as u8
}
