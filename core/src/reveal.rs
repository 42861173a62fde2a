use alloc::collections::VecDeque;

use crate::*;

/// What a single reveal request did to the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RevealReport {
    /// Tiles that went from covered to revealed.
    pub revealed: CellCount,
    pub hit_mine: bool,
}

impl RevealReport {
    pub(crate) fn merge(&mut self, other: RevealReport) {
        self.revealed += other.revealed;
        self.hit_mine |= other.hit_mine;
    }
}

/// Reveals the tile at `coords`, flooding through connected empty tiles.
///
/// Revealed and flagged tiles are left alone. A mine is revealed like any other tile but stops the cascade.
pub(crate) fn reveal_tile(grid: &mut Grid, coords: Coord2) -> RevealReport {
    let mut report = RevealReport::default();
    let index = grid.index_of(coords);

    if !grid[index].open() {
        return report;
    }
    report.revealed += 1;

    match grid[index].content {
        TileContent::Mine => {
            log::debug!("Revealed mine at {:?}", coords);
            report.hit_mine = true;
        }
        TileContent::Empty => {
            report.revealed += flood_fill(grid, index);
            log::debug!(
                "Flood opened {} tiles starting at {:?}",
                report.revealed,
                coords
            );
        }
        _ => log::debug!("Revealed number at {:?}", coords),
    }
    report
}

/// Breadth-first expansion from an already revealed empty tile, returns how many tiles it opened.
///
/// Only empty tiles are queued, and a tile is queued by the same step that opens it, so every tile enters the queue at
/// most once.
fn flood_fill(grid: &mut Grid, seed: CellCount) -> CellCount {
    let mut opened = 0;
    let mut to_visit = VecDeque::from([seed]);

    while let Some(current) = to_visit.pop_front() {
        for neighbor in grid.neighborhood(grid.coords_of(current), 1) {
            if !grid[neighbor].open() {
                continue;
            }
            opened += 1;
            log::trace!("Flood opened tile {} from {}", neighbor, current);

            if grid[neighbor].content == TileContent::Empty {
                to_visit.push_back(neighbor);
            }
        }
    }
    opened
}
