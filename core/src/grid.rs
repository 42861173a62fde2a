use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular field of tiles stored row-major, so the flat index of `(x, y)` is `x + y * width`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    size: Coord2,
    tiles: Array2<Tile>,
}

impl Grid {
    /// A fresh field where every tile is empty, hidden and unmarked. Dimensions are at least one tile.
    pub fn new((width, height): Coord2) -> Self {
        let size = (width.max(1), height.max(1));
        Self {
            size,
            tiles: Array2::default(Self::shape(size)),
        }
    }

    /// Builds a numbered field with mines at exactly `mine_coords`.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut grid = Self::new(size);
        for &coords in mine_coords {
            let coords = grid.validate_coords(coords)?;
            grid.tile_mut(coords).content = TileContent::Mine;
        }
        grid.assign_numbers();
        Ok(grid)
    }

    fn shape((width, height): Coord2) -> [usize; 2] {
        [height.into(), width.into()]
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn width(&self) -> Coord {
        self.size.0
    }

    pub fn height(&self) -> Coord {
        self.size.1
    }

    pub fn tile_count(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn contains(&self, (x, y): Coord2) -> bool {
        x < self.size.0 && y < self.size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn index_of(&self, (x, y): Coord2) -> CellCount {
        CellCount::from(x) + CellCount::from(y) * CellCount::from(self.size.0)
    }

    pub fn coords_of(&self, index: CellCount) -> Coord2 {
        let width = CellCount::from(self.size.0);
        ((index % width) as Coord, (index / width) as Coord)
    }

    pub fn tile(&self, (x, y): Coord2) -> &Tile {
        &self.tiles[[usize::from(y), usize::from(x)]]
    }

    pub fn tile_mut(&mut self, (x, y): Coord2) -> &mut Tile {
        &mut self.tiles[[usize::from(y), usize::from(x)]]
    }

    /// All tiles in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    pub fn mine_count(&self) -> CellCount {
        self.iter().filter(|tile| tile.is_mine()).count() as CellCount
    }

    /// Every index in the square of half-width `radius` centered at `center`, clipped to the field, ascending.
    pub fn neighborhood(&self, center: Coord2, radius: Radius) -> Neighborhood {
        let mut indices = Neighborhood::new();
        if radius < 0 {
            return indices;
        }

        let radius = i32::from(radius);
        let (x, y) = (i32::from(center.0), i32::from(center.1));
        let x_min = (x - radius).max(0);
        let x_max = (x + radius).min(i32::from(self.size.0) - 1);
        let y_min = (y - radius).max(0);
        let y_max = (y + radius).min(i32::from(self.size.1) - 1);

        for ny in y_min..=y_max {
            for nx in x_min..=x_max {
                indices.push(self.index_of((nx as Coord, ny as Coord)));
            }
        }
        indices
    }

    /// Mines among the 3x3 square around `coords`, the center included.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.neighborhood(coords, 1)
            .into_iter()
            .filter(|&index| self[index].is_mine())
            .count() as u8
    }

    /// Writes the adjacent mine count into every tile that is not a mine.
    pub(crate) fn assign_numbers(&mut self) {
        for index in 0..self.tile_count() {
            if self[index].is_mine() {
                continue;
            }
            let count = self.adjacent_mine_count(self.coords_of(index));
            self[index].content = TileContent::from_count(count);
        }
    }
}

impl Index<CellCount> for Grid {
    type Output = Tile;

    fn index(&self, index: CellCount) -> &Self::Output {
        self.tile(self.coords_of(index))
    }
}

impl IndexMut<CellCount> for Grid {
    fn index_mut(&mut self, index: CellCount) -> &mut Self::Output {
        self.tile_mut(self.coords_of(index))
    }
}
