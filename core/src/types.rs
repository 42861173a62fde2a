use smallvec::SmallVec;

/// Single coordinate axis used for field width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts, tile counts, and flat tile indices.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Half-width of a square neighborhood, negative values select nothing.
pub type Radius = i16;

/// Flat tile indices of a neighborhood, in ascending order. Inline up to a 3x3 square.
pub type Neighborhood = SmallVec<[CellCount; 9]>;

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}
