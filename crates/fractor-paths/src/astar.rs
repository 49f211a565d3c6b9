use std::collections::BinaryHeap;

use fractor_core::Point;

use crate::PathRange;
use crate::pathrange::{NodeRef, UNREACHABLE};
use crate::traits::AstarPather;

impl PathRange {
    /// Compute the cheapest path from `from` to whichever of `goals` the
    /// search reaches first.
    ///
    /// The heuristic for a node is the smallest [`AstarPather::estimate`]
    /// towards any goal. Goals outside the range are ignored.
    ///
    /// Returns the full path (including both endpoints) or `None` if no goal
    /// is reachable within the current range.
    pub fn astar_nearest<P: AstarPather>(
        &mut self,
        pather: &P,
        from: Point,
        goals: &[Point],
    ) -> Option<Vec<Point>> {
        let start_idx = self.idx(from)?;
        let goal_idxs: Vec<usize> = goals.iter().filter_map(|&g| self.idx(g)).collect();
        if goal_idxs.is_empty() {
            return None;
        }
        if goal_idxs.contains(&start_idx) {
            return Some(vec![from]);
        }
        let goal_points: Vec<Point> = goal_idxs.iter().map(|&i| self.point(i)).collect();
        let estimate = |p: Point| {
            goal_points
                .iter()
                .map(|&g| pather.estimate(p, g))
                .min()
                .unwrap_or(0)
        };

        // Bump generation to lazily invalidate all nodes.
        self.astar_generation = self.astar_generation.wrapping_add(1);
        let cur_gen = self.astar_generation;

        {
            let node = &mut self.astar_nodes[start_idx];
            node.g = 0;
            node.f = estimate(from);
            node.parent = usize::MAX;
            node.generation = cur_gen;
            node.open = true;
        }

        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        open.push(NodeRef {
            idx: start_idx,
            f: self.astar_nodes[start_idx].f,
        });

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let found = 'search: loop {
            let Some(current) = open.pop() else {
                break 'search None;
            };

            let ci = current.idx;

            // Skip stale entries.
            if self.astar_nodes[ci].generation != cur_gen || !self.astar_nodes[ci].open {
                continue;
            }

            if goal_idxs.contains(&ci) {
                break 'search Some(ci);
            }

            self.astar_nodes[ci].open = false;
            let current_g = self.astar_nodes[ci].g;
            let current_point = self.point(ci);

            nbuf.clear();
            pather.neighbors(current_point, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                let tentative_g = current_g.saturating_add(pather.cost(current_point, np));

                let n = &mut self.astar_nodes[ni];
                if n.generation == cur_gen {
                    if tentative_g >= n.g {
                        continue;
                    }
                } else {
                    n.generation = cur_gen;
                    n.g = UNREACHABLE;
                }

                n.g = tentative_g;
                n.f = tentative_g.saturating_add(estimate(np));
                n.parent = ci;
                n.open = true;

                open.push(NodeRef { idx: ni, f: n.f });
            }
        };

        self.nbuf = nbuf;

        let goal_idx = found?;
        let mut path = Vec::new();
        let mut ci = goal_idx;
        while ci != usize::MAX {
            path.push(self.point(ci));
            ci = self.astar_nodes[ci].parent;
        }
        path.reverse();
        log::trace!("astar: {} -> {} in {} steps", from, path[path.len() - 1], path.len() - 1);
        Some(path)
    }

    /// Cheapest path between two points. See [`astar_nearest`](Self::astar_nearest).
    pub fn astar_path<P: AstarPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
    ) -> Option<Vec<Point>> {
        self.astar_nearest(pather, from, &[to])
    }
}

#[cfg(test)]
mod tests {
    use crate::{CostGrid, PathRange, WeightedPather};
    use fractor_core::{Point, Range};

    fn path_cost(grid: &CostGrid, path: &[Point]) -> i32 {
        path.windows(2).map(|w| grid.cost(w[0], w[1])).sum()
    }

    fn is_contiguous(path: &[Point]) -> bool {
        path.windows(2)
            .all(|w| crate::manhattan(w[0], w[1]) == 1)
    }

    #[test]
    fn straight_line_on_uniform_costs() {
        let rng = Range::new(0, 0, 10, 10);
        let grid = CostGrid::new(rng, 1);
        let mut pr = PathRange::new(rng);
        let path = pr
            .astar_path(&grid, Point::new(0, 0), Point::new(5, 0))
            .unwrap();
        assert_eq!(path.first(), Some(&Point::new(0, 0)));
        assert_eq!(path.last(), Some(&Point::new(5, 0)));
        assert_eq!(path.len(), 6);
        assert!(is_contiguous(&path));
    }

    #[test]
    fn start_on_goal() {
        let rng = Range::new(0, 0, 4, 4);
        let grid = CostGrid::new(rng, 1);
        let mut pr = PathRange::new(rng);
        let p = Point::new(2, 2);
        assert_eq!(pr.astar_nearest(&grid, p, &[Point::new(0, 0), p]), Some(vec![p]));
    }

    #[test]
    fn picks_nearest_goal() {
        let rng = Range::new(0, 0, 20, 3);
        let grid = CostGrid::new(rng, 1);
        let mut pr = PathRange::new(rng);
        let goals = [Point::new(19, 1), Point::new(3, 1)];
        let path = pr.astar_nearest(&grid, Point::new(0, 1), &goals).unwrap();
        assert_eq!(path.last(), Some(&Point::new(3, 1)));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn detours_around_expensive_cells() {
        // A costly band across the middle with a cheap gap at x = 8.
        let rng = Range::new(0, 0, 10, 7);
        let grid = CostGrid::from_fn(rng, |p| if p.y == 3 && p.x != 8 { 50 } else { 1 });
        let mut pr = PathRange::new(rng);
        let path = pr
            .astar_path(&grid, Point::new(1, 0), Point::new(1, 6))
            .unwrap();
        assert!(is_contiguous(&path));
        assert!(path.contains(&Point::new(8, 3)));
        assert!(path_cost(&grid, &path) < 50);
    }

    #[test]
    fn walls_block_and_no_path_is_none() {
        let rng = Range::new(0, 0, 5, 5);
        let grid = CostGrid::from_fn(rng, |p| if p.x == 2 { 0 } else { 1 });
        let mut pr = PathRange::new(rng);
        assert_eq!(pr.astar_path(&grid, Point::new(0, 0), Point::new(4, 4)), None);
    }

    #[test]
    fn goals_outside_range_are_ignored() {
        let rng = Range::new(0, 0, 5, 5);
        let grid = CostGrid::new(rng, 1);
        let mut pr = PathRange::new(rng);
        assert_eq!(pr.astar_nearest(&grid, Point::new(0, 0), &[Point::new(9, 9)]), None);
        let path = pr
            .astar_nearest(&grid, Point::new(0, 0), &[Point::new(9, 9), Point::new(0, 2)])
            .unwrap();
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn reuses_caches_between_queries() {
        let rng = Range::new(0, 0, 8, 8);
        let grid = CostGrid::new(rng, 2);
        let mut pr = PathRange::new(rng);
        let a = pr.astar_path(&grid, Point::new(0, 0), Point::new(7, 7)).unwrap();
        let b = pr.astar_path(&grid, Point::new(7, 7), Point::new(0, 0)).unwrap();
        assert_eq!(a.len(), 15);
        assert_eq!(b.len(), 15);
        assert_eq!(path_cost(&grid, &a), 28);
    }
}
