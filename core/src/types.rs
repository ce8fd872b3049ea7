/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for cell totals and pair counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Logical value shared by the two cards of a pair.
pub type PairId = u16;

/// Milliseconds of an injected monotonic clock. The core never reads a
/// clock itself; callers pass `now` into the time-sensitive transitions.
pub type TimeMs = u64;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}
