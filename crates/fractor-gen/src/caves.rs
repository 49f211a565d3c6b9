//! Cellular automaton caves.
//!
//! Cells start out as random walls, then a majority rule is applied for a
//! number of generations: a cell ends up a wall when it and its eight
//! neighbours hold at least `wall_threshold` walls between them. With the
//! default threshold of 5 this is the classic "4-5 rule": walls survive
//! with four walled neighbours, floors turn to wall with five.
//!
//! Nothing joins up the pockets this leaves behind; a carved region may well
//! end up as several disjoint caves.

use std::collections::{BTreeMap, BTreeSet};

use fractor_core::{Blob, Point};
use rand::{Rng, RngExt};

use crate::canvas::MapCanvas;
use crate::tile::{Tile, TileKind};

/// Parameters of the cave automaton.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaveRule {
    /// Chance (0.0–1.0) of a cell starting out as a wall.
    pub wall_init_pct: f64,
    /// Walls needed among a cell and its 8 neighbours for it to be a wall.
    pub wall_threshold: usize,
    /// Number of smoothing passes.
    pub generations: usize,
}

impl Default for CaveRule {
    fn default() -> Self {
        Self {
            wall_init_pct: 0.40,
            wall_threshold: 5,
            generations: 5,
        }
    }
}

impl CaveRule {
    /// Run the automaton over `region` and return which of its points are
    /// walls.
    ///
    /// `force_walls` and `force_floors` are fixed for every generation, with
    /// floors winning where both name a point. They may lie outside
    /// `region`, in which case they only influence their neighbours.
    /// Any other point outside the region counts as a wall.
    pub fn generate(
        &self,
        rng: &mut impl Rng,
        region: &Blob,
        force_walls: impl IntoIterator<Item = Point>,
        force_floors: impl IntoIterator<Item = Point>,
    ) -> BTreeSet<Point> {
        let mut forced: BTreeMap<Point, bool> = BTreeMap::new();
        for p in force_walls {
            forced.insert(p, true);
        }
        for p in force_floors {
            forced.insert(p, false);
        }

        let mut grid: BTreeMap<Point, bool> = region
            .iter()
            .map(|p| (p, rng.random::<f64>() < self.wall_init_pct))
            .collect();
        grid.extend(forced.iter().map(|(&p, &wall)| (p, wall)));

        for _ in 0..self.generations {
            let mut next = forced.clone();
            for p in region.iter() {
                if forced.contains_key(&p) {
                    continue;
                }
                let walls = std::iter::once(p)
                    .chain(p.neighbors_8())
                    .filter(|q| grid.get(q).copied().unwrap_or(true))
                    .count();
                next.insert(p, walls >= self.wall_threshold);
            }
            grid = next;
        }

        region.iter().filter(|p| grid[p]).collect()
    }
}

/// Carve caves into `region` of the canvas: walls become `wall_tile`,
/// everything else cave floor.
pub fn generate_caves(
    rng: &mut impl Rng,
    canvas: &mut MapCanvas,
    region: &Blob,
    rule: &CaveRule,
    wall_tile: impl Into<Tile>,
    force_walls: impl IntoIterator<Item = Point>,
    force_floors: impl IntoIterator<Item = Point>,
) {
    let walls = rule.generate(rng, region, force_walls, force_floors);
    let wall_tile = wall_tile.into();
    for p in region.iter() {
        if walls.contains(&p) {
            canvas.set_architecture(p, wall_tile.clone());
        } else {
            canvas.set_architecture(p, TileKind::CaveFloor);
        }
    }
    log::debug!(
        "caves: {} walls, {} floors over {} points",
        walls.len(),
        region.len() - walls.len(),
        region.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use fractor_core::Range;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn same_seed_same_caves() {
        let region = Blob::from_range(Range::new(0, 0, 40, 25));
        let walls = [Point::new(20, 12)];
        let floors = [Point::new(5, 5), Point::new(6, 5)];
        let a = CaveRule::default().generate(&mut StdRng::seed_from_u64(42), &region, walls, floors);
        let b = CaveRule::default().generate(&mut StdRng::seed_from_u64(42), &region, walls, floors);
        assert_eq!(a, b);
    }

    #[test]
    fn produces_both_walls_and_floors() {
        let region = Blob::from_range(Range::new(0, 0, 40, 40));
        let walls = CaveRule::default().generate(&mut StdRng::seed_from_u64(1), &region, [], []);
        assert!(!walls.is_empty());
        assert!(walls.len() < region.len());
    }

    #[test]
    fn forced_points_hold() {
        let region = Blob::from_range(Range::new(0, 0, 20, 20));
        let force_walls: Vec<Point> = (0..20).map(|x| Point::new(x, 10)).collect();
        let force_floors = [Point::new(3, 3), Point::new(4, 10)];
        let walls = CaveRule::default().generate(
            &mut StdRng::seed_from_u64(7),
            &region,
            force_walls.iter().copied(),
            force_floors,
        );
        for p in &force_walls {
            assert_eq!(walls.contains(p), p.x != 4);
        }
        assert!(!walls.contains(&Point::new(3, 3)));
    }

    #[test]
    fn all_walls_when_threshold_is_zero() {
        let region = Blob::from_range(Range::new(0, 0, 6, 6));
        let rule = CaveRule {
            wall_threshold: 0,
            ..CaveRule::default()
        };
        let walls = rule.generate(&mut StdRng::seed_from_u64(3), &region, [], []);
        assert_eq!(walls.len(), region.len());
    }

    #[test]
    fn carves_onto_canvas() {
        let mut canvas = MapCanvas::new(Point::new(30, 30));
        canvas.clear(TileKind::Floor);
        let region = Blob::from_range(Range::new(5, 5, 25, 25));
        generate_caves(
            &mut StdRng::seed_from_u64(11),
            &mut canvas,
            &region,
            &CaveRule::default(),
            TileKind::CaveWall,
            [],
            [],
        );
        for p in canvas.rect().iter() {
            let kind = canvas.architecture(p).kind();
            if region.contains(p) {
                assert!(matches!(kind, TileKind::CaveWall | TileKind::CaveFloor));
            } else {
                assert_eq!(kind, TileKind::Floor);
            }
        }
    }
}
