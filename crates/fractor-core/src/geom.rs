//! Geometry primitives: [`Point`], [`Direction`], [`Range`] and [`Span`].
//!
//! X grows right, Y grows down. Ranges are half-open, but the generators
//! mostly reason about the inclusive wall lines of a rectangle, so
//! [`Range`] also offers inclusive `left/right/top/bottom` accessors and
//! rebuilders.

use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D integer point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a point shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The point one step away in direction `d`.
    #[inline]
    pub fn step(self, d: Direction) -> Self {
        self + d.offset()
    }

    /// The four axis neighbours (up, right, down, left).
    #[inline]
    pub fn neighbors_4(self) -> [Point; 4] {
        [
            Self::new(self.x, self.y - 1),
            Self::new(self.x + 1, self.y),
            Self::new(self.x, self.y + 1),
            Self::new(self.x - 1, self.y),
        ]
    }

    /// All eight neighbours (axis + diagonal).
    #[inline]
    pub fn neighbors_8(self) -> [Point; 8] {
        [
            Self::new(self.x, self.y - 1),
            Self::new(self.x + 1, self.y - 1),
            Self::new(self.x + 1, self.y),
            Self::new(self.x + 1, self.y + 1),
            Self::new(self.x, self.y + 1),
            Self::new(self.x - 1, self.y + 1),
            Self::new(self.x - 1, self.y),
            Self::new(self.x - 1, self.y - 1),
        ]
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Row-major: rows first, then columns.
impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Direction> for Point {
    type Output = Self;
    #[inline]
    fn add(self, d: Direction) -> Self {
        self.step(d)
    }
}

impl Sub<Direction> for Point {
    type Output = Self;
    #[inline]
    fn sub(self, d: Direction) -> Self {
        self - d.offset()
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the eight compass directions, clockwise from `Up`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::UpRight,
        Direction::DownRight,
        Direction::UpLeft,
        Direction::DownLeft,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Unit offset of this direction.
    pub const fn offset(self) -> Point {
        match self {
            Direction::Up => Point::new(0, -1),
            Direction::UpRight => Point::new(1, -1),
            Direction::Right => Point::new(1, 0),
            Direction::DownRight => Point::new(1, 1),
            Direction::Down => Point::new(0, 1),
            Direction::DownLeft => Point::new(-1, 1),
            Direction::Left => Point::new(-1, 0),
            Direction::UpLeft => Point::new(-1, -1),
        }
    }

    /// Direction whose offset is `(dx, dy)`, with both components in -1..=1.
    pub fn from_offset(dx: i32, dy: i32) -> Option<Direction> {
        Self::ALL
            .into_iter()
            .find(|d| d.offset() == Point::new(dx, dy))
    }

    pub fn opposite(self) -> Direction {
        Self::ALL[(self.index() + 4) % 8]
    }

    /// Whether `other` is 45° away from `self`.
    pub fn adjacent_to(self, other: Direction) -> bool {
        let diff = (self.index() + 8 - other.index()) % 8;
        diff == 1 || diff == 7
    }
}

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// An inclusive run of integer coordinates `start..=end`.
///
/// A span with `end < start` is empty.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: i32,
    pub end: i32,
}

impl Span {
    #[inline]
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn len(self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start + 1) as usize
        }
    }

    pub fn is_empty(self) -> bool {
        self.end < self.start
    }

    pub fn contains(self, v: i32) -> bool {
        v >= self.start && v <= self.end
    }

    pub fn iter(self) -> std::ops::RangeInclusive<i32> {
        self.start..=self.end
    }
}

impl IntoIterator for Span {
    type Item = i32;
    type IntoIter = std::ops::RangeInclusive<i32>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open rectangle \[min, max). `min` is inclusive, `max` is exclusive.
///
/// All empty ranges are considered equal.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl PartialEq for Range {
    fn eq(&self, other: &Self) -> bool {
        (self.min == other.min && self.max == other.max) || (self.is_empty() && other.is_empty())
    }
}

impl Eq for Range {}

impl std::hash::Hash for Range {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.is_empty() {
            Point::ZERO.hash(state);
            Point::ZERO.hash(state);
        } else {
            self.min.hash(state);
            self.max.hash(state);
        }
    }
}

impl Range {
    /// Create a new range from two corners and auto-canonicalize so that
    /// `min` ≤ `max` on each axis.
    #[inline]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// Range with top-left corner `origin` and the given size.
    #[inline]
    pub fn sized(origin: Point, size: Point) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Size as a `Point` (x = width, y = height).
    #[inline]
    pub fn size(self) -> Point {
        Point::new(self.width(), self.height())
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    /// Inclusive left column.
    #[inline]
    pub fn left(self) -> i32 {
        self.min.x
    }

    /// Inclusive right column.
    #[inline]
    pub fn right(self) -> i32 {
        self.max.x - 1
    }

    /// Inclusive top row.
    #[inline]
    pub fn top(self) -> i32 {
        self.min.y
    }

    /// Inclusive bottom row.
    #[inline]
    pub fn bottom(self) -> i32 {
        self.max.y - 1
    }

    /// Same range with its inclusive left column moved to `x`.
    #[inline]
    pub fn with_left(self, x: i32) -> Self {
        Self {
            min: Point::new(x, self.min.y),
            max: self.max,
        }
    }

    /// Same range with its inclusive right column moved to `x`.
    #[inline]
    pub fn with_right(self, x: i32) -> Self {
        Self {
            min: self.min,
            max: Point::new(x + 1, self.max.y),
        }
    }

    /// Same range with its inclusive top row moved to `y`.
    #[inline]
    pub fn with_top(self, y: i32) -> Self {
        Self {
            min: Point::new(self.min.x, y),
            max: self.max,
        }
    }

    /// Same range with its inclusive bottom row moved to `y`.
    #[inline]
    pub fn with_bottom(self, y: i32) -> Self {
        Self {
            min: self.min,
            max: Point::new(self.max.x, y + 1),
        }
    }

    /// Return a range with coordinates shifted by the given deltas.
    ///
    /// If the result would be empty, returns the zero (empty) range.
    #[inline]
    pub fn shift(self, dx0: i32, dy0: i32, dx1: i32, dy1: i32) -> Self {
        let r = Self {
            min: self.min.shift(dx0, dy0),
            max: self.max.shift(dx1, dy1),
        };
        if r.is_empty() { Self::default() } else { r }
    }

    /// The range without its one-cell border.
    #[inline]
    pub fn interior(self) -> Self {
        self.shift(1, 1, -1, -1)
    }

    /// Center cell, rounding towards `min`.
    #[inline]
    pub fn center(self) -> Point {
        Point::new(
            self.min.x + self.width() / 2,
            self.min.y + self.height() / 2,
        )
    }

    /// Total number of cells in the range.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.width() as usize) * (self.height() as usize)
    }

    /// Whether the range has zero or negative area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Whether `p` is inside the half-open range.
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Reports whether range `self` is completely contained in range `r`.
    ///
    /// Empty ranges are always considered "in" any range.
    #[inline]
    pub fn in_range(self, r: Range) -> bool {
        if self.is_empty() {
            return true;
        }
        self.intersect(r) == self
    }

    /// Intersection of two ranges (may be empty).
    #[inline]
    pub fn intersect(self, other: Range) -> Self {
        let r = Self {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if r.is_empty() { Self::default() } else { r }
    }

    /// Whether the two ranges overlap (non-empty intersection).
    #[inline]
    pub fn overlaps(self, other: Range) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Row-major iterator over every point in the range.
    #[inline]
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            cur: self.min,
        }
    }

    /// Inclusive x coordinates of the range.
    #[inline]
    pub fn columns(self) -> Span {
        Span::new(self.left(), self.right())
    }

    /// Inclusive y coordinates of the range.
    #[inline]
    pub fn rows(self) -> Span {
        Span::new(self.top(), self.bottom())
    }

    /// Every cell on the outer ring, paired with the direction pointing out
    /// of the range. Corners carry the diagonal direction.
    pub fn iter_border(self) -> impl Iterator<Item = (Point, Direction)> {
        self.iter().filter_map(move |p| {
            let dx = if p.x == self.left() {
                -1
            } else if p.x == self.right() {
                1
            } else {
                0
            };
            let dy = if p.y == self.top() {
                -1
            } else if p.y == self.bottom() {
                1
            } else {
                0
            };
            if dx == 0 && dy == 0 {
                None
            } else {
                Direction::from_offset(dx, dy).map(|d| (p, d))
            }
        })
    }

    /// Number of cells along the edge facing `edge`.
    pub fn edge_length(self, edge: Direction) -> i32 {
        match edge {
            Direction::Up | Direction::Down => self.width(),
            Direction::Left | Direction::Right => self.height(),
            _ => panic!("edge_length: {edge:?} is not an orthogonal direction"),
        }
    }

    /// Absolute coordinates running along the edge facing `edge`.
    pub fn edge_span(self, edge: Direction) -> Span {
        match edge {
            Direction::Up | Direction::Down => self.columns(),
            Direction::Left | Direction::Right => self.rows(),
            _ => panic!("edge_span: {edge:?} is not an orthogonal direction"),
        }
    }

    /// The point at absolute coordinate `n` along the edge facing `edge`,
    /// `depth` cells inwards from that edge.
    pub fn edge_point(self, edge: Direction, n: i32, depth: i32) -> Point {
        match edge {
            Direction::Up => Point::new(n, self.top() + depth),
            Direction::Down => Point::new(n, self.bottom() - depth),
            Direction::Left => Point::new(self.left() + depth, n),
            Direction::Right => Point::new(self.right() - depth, n),
            _ => panic!("edge_point: {edge:?} is not an orthogonal direction"),
        }
    }
}

impl IntoIterator for Range {
    type Item = Point;
    type IntoIter = RangeIter;
    #[inline]
    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{})", self.min, self.max)
    }
}

impl Add<Point> for Range {
    type Output = Range;

    #[inline]
    fn add(self, p: Point) -> Range {
        Range {
            min: self.min + p,
            max: self.max + p,
        }
    }
}

impl Sub<Point> for Range {
    type Output = Range;

    #[inline]
    fn sub(self, p: Point) -> Range {
        Range {
            min: self.min - p,
            max: self.max - p,
        }
    }
}

// ---------------------------------------------------------------------------
// RangeIter
// ---------------------------------------------------------------------------

/// Row-major iterator over the points in a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    cur: Point,
}

impl Iterator for RangeIter {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        if self.cur.y >= self.range.max.y || self.range.is_empty() {
            return None;
        }
        let p = self.cur;
        self.cur.x += 1;
        if self.cur.x >= self.range.max.x {
            self.cur.x = self.range.min.x;
            self.cur.y += 1;
        }
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.range.is_empty() || self.cur.y >= self.range.max.y {
            return (0, Some(0));
        }
        let w = self.range.width() as usize;
        let remaining_in_row = (self.range.max.x - self.cur.x) as usize;
        let remaining_rows = (self.range.max.y - self.cur.y - 1) as usize;
        let total = remaining_in_row + remaining_rows * w;
        (total, Some(total))
    }
}

impl ExactSizeIterator for RangeIter {}
