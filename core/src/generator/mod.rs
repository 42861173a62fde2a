use alloc::vec::Vec;

use crate::*;
pub use random::*;

mod random;

/// Source of randomness for mine placement.
pub trait Sampler {
    /// Draws `amount` distinct elements of `candidates` uniformly at random, without replacement.
    fn sample(&mut self, candidates: &[CellCount], amount: usize) -> Vec<CellCount>;
}

impl<F> Sampler for F
where
    F: FnMut(&[CellCount], usize) -> Vec<CellCount>,
{
    fn sample(&mut self, candidates: &[CellCount], amount: usize) -> Vec<CellCount> {
        self(candidates, amount)
    }
}

/// Places mines on a fresh grid while keeping the first revealed tile safe.
#[derive(Clone, Debug)]
pub struct MineGenerator<S> {
    sampler: S,
}

impl<S: Sampler> MineGenerator<S> {
    pub fn new(sampler: S) -> Self {
        Self { sampler }
    }

    /// Safe zone radius around the first click: the full 3x3 square when there is enough room for it, otherwise just
    /// the clicked tile.
    pub const fn safe_radius(total_tiles: CellCount, mines: CellCount) -> Radius {
        if total_tiles.saturating_sub(mines) >= 9 { 1 } else { 0 }
    }

    /// Places exactly `mines` mines outside the safe zone around `first` and numbers every other tile.
    ///
    /// Expects a grid without mines. On error the grid is left untouched.
    pub fn generate(&mut self, grid: &mut Grid, mines: CellCount, first: Coord2) -> Result<()> {
        let first = grid.validate_coords(first)?;
        let total_tiles = grid.tile_count();
        let radius = Self::safe_radius(total_tiles, mines);
        let safe_zone = grid.neighborhood(first, radius);
        let candidates = exclude_sorted(total_tiles, &safe_zone);

        if candidates.len() < usize::from(mines) {
            log::error!(
                "Cannot place {} mines, only {} candidates outside the safe zone around {:?}",
                mines,
                candidates.len(),
                first
            );
            return Err(GameError::NotEnoughCandidates {
                requested: mines,
                available: candidates.len() as CellCount,
            });
        }

        let picked = self.sampler.sample(&candidates, mines.into());
        if !is_valid_selection(&picked, &candidates, mines.into()) {
            log::error!(
                "Sampler returned {} tiles for {} requested mines, or tiles outside the candidates",
                picked.len(),
                mines
            );
            return Err(GameError::SamplerContract);
        }

        for index in picked {
            grid[index].content = TileContent::Mine;
        }
        grid.assign_numbers();

        log::debug!(
            "Generated {} mines, first click at {:?} with a safe radius of {}",
            mines,
            first,
            radius
        );
        Ok(())
    }
}

/// Every index in `0..total` except the ones in `excluded`, which must be sorted.
fn exclude_sorted(total: CellCount, excluded: &[CellCount]) -> Vec<CellCount> {
    let mut excluded = excluded.iter().copied().peekable();
    (0..total)
        .filter(|&index| {
            if excluded.peek() == Some(&index) {
                excluded.next();
                false
            } else {
                true
            }
        })
        .collect()
}

/// Whether `picked` holds exactly `amount` distinct members of the sorted `candidates`.
fn is_valid_selection(picked: &[CellCount], candidates: &[CellCount], amount: usize) -> bool {
    if picked.len() != amount {
        return false;
    }
    let mut sorted = picked.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len() == amount
        && sorted
            .iter()
            .all(|index| candidates.binary_search(index).is_ok())
}
