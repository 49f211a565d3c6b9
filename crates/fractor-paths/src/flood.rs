//! Valley flooding: join a set of seed points with low paths.
//!
//! Every seed starts as its own puddle. The water level then rises: cells
//! are flooded in ascending depth order, each one joining the puddle of the
//! lowest adjacent flooded cell and remembering which neighbour flooded it.
//! A cell touching two or more puddles is a junction. It merges those
//! puddles, and the path from the junction back down to each puddle's seed
//! becomes part of the result. Flooding stops once a single puddle remains.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet};

use fractor_core::Point;

type PuddleId = usize;

/// A cell waiting to be flooded, ordered so that `BinaryHeap` pops the
/// lowest depth first and breaks ties by row-major position.
struct Pending {
    depth: f64,
    p: Point,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .depth
            .total_cmp(&self.depth)
            .then_with(|| other.p.cmp(&self.p))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Connect every goal lying in `region` with a network of paths that
/// follows the lowest ground of `depth`.
///
/// Returns the junctions and the paths leading from them down to the
/// goals, seeds included. The result is a subset of `region`. With fewer
/// than two goals inside the region there is nothing to connect and the
/// result is empty.
///
/// Movement is 4-directional. A cell with no flooded neighbour when its
/// turn comes is parked until a neighbour floods, so basins without a goal
/// of their own are still crossed.
pub fn flood_valleys(
    region: impl IntoIterator<Item = Point>,
    goals: impl IntoIterator<Item = Point>,
    depth: impl Fn(Point) -> f64,
) -> BTreeSet<Point> {
    let region: BTreeSet<Point> = region.into_iter().collect();
    let goals: BTreeSet<Point> = goals.into_iter().collect();

    let mut flooded: HashMap<Point, PuddleId> = HashMap::new();
    let mut puddle_map: BTreeMap<PuddleId, PuddleId> = BTreeMap::new();
    for (puddle, &p) in goals.iter().filter(|&&p| region.contains(&p)).enumerate() {
        flooded.insert(p, puddle);
        puddle_map.insert(puddle, puddle);
    }

    let mut paths = BTreeSet::new();
    if puddle_map.len() < 2 {
        return paths;
    }

    let mut pending: BinaryHeap<Pending> = region
        .iter()
        .filter(|p| !flooded.contains_key(p))
        .map(|&p| Pending { depth: depth(p), p })
        .collect();
    let mut parked: HashSet<Point> = HashSet::new();
    // For every flooded cell: the lowest neighbour it touched in each puddle.
    let mut path_from: HashMap<Point, BTreeMap<PuddleId, Point>> = HashMap::new();

    while let Some(Pending { p, .. }) = pending.pop() {
        if flooded.contains_key(&p) {
            continue;
        }

        let mut adjacent: BTreeMap<PuddleId, Vec<Point>> = BTreeMap::new();
        for n in p.neighbors_4() {
            if let Some(&puddle) = flooded.get(&n) {
                adjacent.entry(puddle_map[&puddle]).or_default().push(n);
            }
        }
        let Some(&this_puddle) = adjacent.keys().next() else {
            parked.insert(p);
            continue;
        };

        let lowest = path_from.entry(p).or_default();
        for (&puddle, points) in &adjacent {
            if let Some(&low) = points
                .iter()
                .min_by(|a, b| depth(**a).total_cmp(&depth(**b)))
            {
                lowest.insert(puddle, low);
            }
        }

        flooded.insert(p, this_puddle);
        for n in p.neighbors_4() {
            if parked.remove(&n) {
                pending.push(Pending { depth: depth(n), p: n });
            }
        }

        if adjacent.len() < 2 {
            continue;
        }

        // A junction: trace the way back down into every puddle it touches.
        paths.insert(p);
        for &puddle in adjacent.keys() {
            let mut cursor = Some(p);
            while let Some(cur) = cursor {
                paths.insert(cur);
                cursor = path_from.get(&cur).and_then(|cands| {
                    cands
                        .iter()
                        .filter(|&(cand_puddle, _)| puddle_map[cand_puddle] == puddle)
                        .map(|(_, &cand)| cand)
                        .min_by(|a, b| depth(*a).total_cmp(&depth(*b)))
                });
            }
        }

        // Merge everything mapped to any touched puddle into this one.
        for to in puddle_map.values_mut() {
            if adjacent.contains_key(to) {
                *to = this_puddle;
            }
        }

        let remaining: BTreeSet<PuddleId> = puddle_map.values().copied().collect();
        log::trace!("flood_valleys: junction at {p}, {} puddles left", remaining.len());
        if remaining.len() == 1 {
            break;
        }
    }

    paths
}
