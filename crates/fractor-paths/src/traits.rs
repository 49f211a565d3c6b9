use fractor_core::Point;

/// Neighbour enumeration over some grid.
pub trait Pather {
    /// Append neighbors of `p` into `buf`. The caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

/// Pather whose steps carry a positive cost.
pub trait WeightedPather: Pather {
    /// Cost of stepping from `from` onto the adjacent `to`. Must be > 0.
    fn cost(&self, from: Point, to: Point) -> i32;
}

/// Pather with a distance estimate for A*.
pub trait AstarPather: WeightedPather {
    /// Estimated cost from `from` to `to`.
    ///
    /// Should not overestimate; the search still terminates if it does, but
    /// the path found may then not be the cheapest.
    fn estimate(&self, from: Point, to: Point) -> i32;
}
