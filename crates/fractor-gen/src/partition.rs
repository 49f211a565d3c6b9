//! Rooms laid out by binary space partitioning.

use std::cmp::Reverse;

use fractor_core::{Point, Range};
use rand::{Rng, RngExt};

use crate::fractor::{Strategy, Workspace};
use crate::room::Room;

/// Splits the region into up to `wanted_regions` rectangles and puts one
/// random room in each.
///
/// Rooms are not joined by hallways; whether two of them touch is up to
/// chance.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryPartition {
    /// Smallest partition (and room) size, walls included.
    pub minimum_size: Point,
    pub wanted_regions: usize,
}

impl Default for BinaryPartition {
    fn default() -> Self {
        Self {
            minimum_size: Point::new(5, 5),
            wanted_regions: 7,
        }
    }
}

impl BinaryPartition {
    pub fn new(minimum_size: Point) -> Self {
        assert!(
            minimum_size.x > 0 && minimum_size.y > 0,
            "BinaryPartition: invalid minimum size {minimum_size}"
        );
        Self {
            minimum_size,
            ..Self::default()
        }
    }

    /// Cut `region` into non-overlapping pieces.
    ///
    /// The largest piece is split until there are `wanted_regions` of them
    /// or none can be split any further. A piece is split across whichever
    /// axis has more room relative to the minimum size; one with less than
    /// twice the minimum on both axes is left whole.
    pub fn maximally_partition(&self, rng: &mut impl Rng, region: Range) -> Vec<Range> {
        let mut pending = vec![region];
        let mut done = Vec::new();

        while !pending.is_empty() && pending.len() + done.len() < self.wanted_regions {
            let largest = pending.remove(0);
            match self.partition(rng, largest) {
                Some((a, b)) => {
                    pending.push(a);
                    pending.push(b);
                    pending.sort_by_key(|r| Reverse(r.len()));
                }
                None => done.push(largest),
            }
        }

        pending.extend(done);
        log::debug!("partitioned {region} into {} regions", pending.len());
        pending
    }

    fn partition(&self, rng: &mut impl Rng, region: Range) -> Option<(Range, Range)> {
        let rel_height = region.height() as f64 / self.minimum_size.y as f64;
        let rel_width = region.width() as f64 / self.minimum_size.x as f64;

        if rel_height < 2.0 && rel_width < 2.0 {
            return None;
        }

        if rel_height > rel_width {
            // The last row of the first half.
            let top = region.top() + self.minimum_size.y - 1;
            let bottom = region.bottom() - self.minimum_size.y;
            assert!(top <= bottom, "partition: {top} > {bottom} in {region}");
            let mid = rng.random_range(top..=bottom);
            Some((region.with_bottom(mid), region.with_top(mid + 1)))
        } else {
            let left = region.left() + self.minimum_size.x - 1;
            let right = region.right() - self.minimum_size.x;
            assert!(left <= right, "partition: {left} > {right} in {region}");
            let mid = rng.random_range(left..=right);
            Some((region.with_right(mid), region.with_left(mid + 1)))
        }
    }
}

impl Strategy for BinaryPartition {
    fn generate<R: Rng>(&mut self, ws: &mut Workspace<R>) {
        for region in self.maximally_partition(&mut ws.rng, ws.region) {
            Room::randomize(&mut ws.rng, region, self.minimum_size).draw_to_canvas(&mut ws.canvas);
        }
    }
}
