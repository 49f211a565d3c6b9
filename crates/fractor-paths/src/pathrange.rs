use fractor_core::{Point, Range};

// ---------------------------------------------------------------------------
// Internal node for the A* priority-queue search
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) g: i32,
    pub(crate) f: i32,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: 0,
            f: 0,
            parent: usize::MAX,
            generation: 0,
            open: false,
        }
    }
}

/// Reference into the node array, ordered by `f` for use in `BinaryHeap`.
///
/// Ties on `f` are broken by index so that searches are reproducible.
#[derive(Clone, Copy, Eq, PartialEq)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: i32,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first.
        other.f.cmp(&self.f).then(other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Sentinel cost for nodes not reached yet.
pub(crate) const UNREACHABLE: i32 = i32::MAX;

// ---------------------------------------------------------------------------
// PathRange
// ---------------------------------------------------------------------------

/// Search workspace over a grid rectangle.
///
/// Holds the A* nodes and the component labels, reused from one query to
/// the next. A* nodes left over from an earlier search are told apart by
/// their generation.
pub struct PathRange {
    pub(crate) rng: Range,
    pub(crate) width: usize,
    pub(crate) astar_nodes: Vec<Node>,
    pub(crate) astar_generation: u32,
    pub(crate) cc_labels: Vec<i32>,
    pub(crate) cc_stack: Vec<usize>,
    // shared scratch buffer for neighbor queries
    pub(crate) nbuf: Vec<Point>,
}

impl PathRange {
    /// Create a new `PathRange` for the given grid rectangle.
    pub fn new(rng: Range) -> Self {
        let w = rng.width().max(0) as usize;
        let len = rng.len();
        Self {
            rng,
            width: w,
            astar_nodes: vec![Node::default(); len],
            astar_generation: 0,
            cc_labels: vec![-1; len],
            cc_stack: Vec::new(),
            nbuf: Vec::with_capacity(8),
        }
    }

    /// The grid rectangle being searched.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        let x = (idx % self.width) as i32 + self.rng.min.x;
        let y = (idx / self.width) as i32 + self.rng.min.y;
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idx_round_trips_with_offset_range() {
        let pr = PathRange::new(Range::new(3, 4, 8, 9));
        for p in pr.range().iter() {
            let i = pr.idx(p).unwrap();
            assert_eq!(pr.point(i), p);
        }
        assert_eq!(pr.idx(Point::new(2, 4)), None);
        assert_eq!(pr.idx(Point::new(8, 4)), None);
    }
}
