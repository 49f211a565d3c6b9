//! Freeform regions.
//!
//! A [`Blob`] is an arbitrary set of points. It backs every non-rectangular
//! area the generators reason about: river banks, the cave surrounding a
//! room, the union of several rooms.

use std::collections::BTreeSet;
use std::ops::{Add, Sub};

use crate::geom::{Direction, Point, Range, Span};

/// An ordered set of points.
///
/// Iteration is row-major, so anything derived from a blob is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Blob {
    points: BTreeSet<Point>,
}

impl Blob {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every point of a rectangle.
    pub fn from_range(r: Range) -> Self {
        Self {
            points: r.iter().collect(),
        }
    }

    /// Build a blob row by row: each `(y, span)` pair contributes the points
    /// `(x, y)` for every `x` in the span.
    pub fn from_row_spans(rows: impl IntoIterator<Item = (i32, Span)>) -> Self {
        let mut points = BTreeSet::new();
        for (y, span) in rows {
            for x in span {
                points.insert(Point::new(x, y));
            }
        }
        Self { points }
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.points.contains(&p)
    }

    pub fn insert(&mut self, p: Point) -> bool {
        self.points.insert(p)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Row-major iterator over the blob's points.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().copied()
    }

    pub fn points(&self) -> &BTreeSet<Point> {
        &self.points
    }

    pub fn union(&self, other: &Blob) -> Blob {
        Blob {
            points: self.points.union(&other.points).copied().collect(),
        }
    }

    pub fn difference(&self, other: &Blob) -> Blob {
        Blob {
            points: self.points.difference(&other.points).copied().collect(),
        }
    }

    /// Points of `self` that are also in `set`.
    pub fn intersection(&self, set: &BTreeSet<Point>) -> Blob {
        Blob {
            points: self.points.intersection(set).copied().collect(),
        }
    }

    /// Points with at least one axis neighbour outside the blob, each paired
    /// with the first such outward direction.
    pub fn iter_border(&self) -> impl Iterator<Item = (Point, Direction)> + '_ {
        self.points.iter().filter_map(move |&p| {
            Direction::ORTHOGONAL
                .into_iter()
                .find(|&d| !self.contains(p + d))
                .map(|d| (p, d))
        })
    }

    /// Smallest range containing every point, or the empty range.
    pub fn bounds(&self) -> Range {
        let mut it = self.points.iter();
        let Some(&first) = it.next() else {
            return Range::default();
        };
        let (mut min, mut max) = (first, first);
        for &p in it {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        Range::new(min.x, min.y, max.x + 1, max.y + 1)
    }
}

impl From<Range> for Blob {
    fn from(r: Range) -> Self {
        Blob::from_range(r)
    }
}

impl FromIterator<Point> for Blob {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl Add for Blob {
    type Output = Blob;
    fn add(self, rhs: Blob) -> Blob {
        self.union(&rhs)
    }
}

impl Sub for Blob {
    type Output = Blob;
    fn sub(self, rhs: Blob) -> Blob {
        self.difference(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_difference() {
        let a = Blob::from_range(Range::new(0, 0, 3, 3));
        let b = Blob::from_range(Range::new(1, 1, 2, 2));
        let ring = a.clone() - b.clone();
        assert_eq!(ring.len(), 8);
        assert!(!ring.contains(Point::new(1, 1)));
        assert_eq!(ring + b, a);
    }

    #[test]
    fn row_spans() {
        let blob = Blob::from_row_spans([(0, Span::new(2, 4)), (1, Span::new(3, 3))]);
        assert_eq!(blob.len(), 4);
        assert!(blob.contains(Point::new(3, 1)));
        assert!(!blob.contains(Point::new(2, 1)));
        assert_eq!(blob.bounds(), Range::new(2, 0, 5, 2));
    }

    #[test]
    fn border_of_square() {
        let blob = Blob::from_range(Range::new(0, 0, 3, 3));
        let border: Vec<_> = blob.iter_border().collect();
        assert_eq!(border.len(), 8);
        assert!(border.contains(&(Point::new(1, 0), Direction::Up)));
        assert!(border.contains(&(Point::new(2, 1), Direction::Right)));
    }

    #[test]
    fn empty_blob_bounds() {
        assert!(Blob::new().bounds().is_empty());
    }
}
