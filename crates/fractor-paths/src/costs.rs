use fractor_core::{Point, Range};

use crate::traits::{AstarPather, Pather, WeightedPather};

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Per-cell traversal cost over a rectangle.
///
/// Stepping onto a cell costs that cell's value. Cells with a cost of zero
/// or less are impassable. Movement is 4-directional.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostGrid {
    bounds: Range,
    costs: Vec<i32>,
}

impl CostGrid {
    /// A grid where every cell costs `cost`.
    pub fn new(bounds: Range, cost: i32) -> Self {
        Self {
            bounds,
            costs: vec![cost; bounds.len()],
        }
    }

    /// A grid whose costs are computed per point, in row-major order.
    pub fn from_fn(bounds: Range, f: impl FnMut(Point) -> i32) -> Self {
        Self {
            bounds,
            costs: bounds.iter().map(f).collect(),
        }
    }

    pub fn bounds(&self) -> Range {
        self.bounds
    }

    fn index(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        let x = (p.x - self.bounds.min.x) as usize;
        let y = (p.y - self.bounds.min.y) as usize;
        Some(y * self.bounds.width() as usize + x)
    }

    /// Cost of stepping onto `p`, or `None` outside the grid.
    pub fn at(&self, p: Point) -> Option<i32> {
        self.index(p).map(|i| self.costs[i])
    }

    /// Set the cost of `p`. Panics outside the grid.
    pub fn set(&mut self, p: Point, cost: i32) {
        let Some(i) = self.index(p) else {
            panic!("CostGrid::set: {p} outside {}", self.bounds);
        };
        self.costs[i] = cost;
    }

    pub fn passable(&self, p: Point) -> bool {
        self.at(p).is_some_and(|c| c > 0)
    }
}

impl Pather for CostGrid {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(p.neighbors_4().into_iter().filter(|&n| self.passable(n)));
    }
}

impl WeightedPather for CostGrid {
    fn cost(&self, _from: Point, to: Point) -> i32 {
        self.at(to).unwrap_or(1)
    }
}

impl AstarPather for CostGrid {
    /// Chebyshev distance scaled by the cheaper of the two endpoints.
    fn estimate(&self, from: Point, to: Point) -> i32 {
        let scale = match (self.at(from), self.at(to)) {
            (Some(a), Some(b)) => a.min(b).max(0),
            (Some(c), None) | (None, Some(c)) => c.max(0),
            (None, None) => 0,
        };
        chebyshev(from, to).saturating_mul(scale)
    }
}
