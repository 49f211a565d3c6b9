//! Organic outdoor terrain: noise-driven grass and forest, a meandering
//! river with bridges, dirt paths joining the low ground and a ragged cave
//! wall around the edge.

use std::collections::{BTreeMap, BTreeSet};

use fractor_core::{Blob, Direction, Point, Range, Span};
use fractor_paths::flood_valleys;
use rand::Rng;

use crate::error::GenError;
use crate::fractor::{Strategy, Workspace};
use crate::noisefield::NoiseField;
use crate::random::{choose, random_normal_int, random_normal_range};
use crate::tile::TileKind;

/// Noise parameters of [`PerlinTerrain`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerlinConfig {
    pub terrain_resolution: u32,
    pub terrain_octaves: u32,
    pub river_center_resolution: u32,
    pub river_width_resolution: u32,
    pub river_width_octaves: u32,
    pub border_resolution: u32,
    /// Thickest the surrounding cave wall gets; it is at least 1.
    pub max_border_depth: i32,
}

impl Default for PerlinConfig {
    fn default() -> Self {
        Self {
            terrain_resolution: 6,
            terrain_octaves: 1,
            river_center_resolution: 3,
            river_width_resolution: 6,
            river_width_octaves: 2,
            border_resolution: 6,
            max_border_depth: 5,
        }
    }
}

/// Outdoor terrain generated from Perlin noise.
///
/// Low noise is read as ground that is walked often: cut grass, then tall
/// grass, then trees where nobody goes.
#[derive(Debug, Clone, Default)]
pub struct PerlinTerrain {
    pub config: PerlinConfig,
    left_bank: Blob,
    river: Blob,
    right_bank: Blob,
    local_minima: BTreeSet<Point>,
}

/// Regions narrower than this leave no room for a river and its banks.
const MIN_WIDTH: i32 = 12;
const MIN_HEIGHT: i32 = 4;

impl PerlinTerrain {
    pub fn new(config: PerlinConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn river(&self) -> &Blob {
        &self.river
    }

    pub fn left_bank(&self) -> &Blob {
        &self.left_bank
    }

    pub fn right_bank(&self) -> &Blob {
        &self.right_bank
    }

    /// Local minima of the terrain noise, plus the bridge landings.
    pub fn local_minima(&self) -> &BTreeSet<Point> {
        &self.local_minima
    }

    /// Carve a river from top to bottom. Returns its span on every row.
    fn carve_river<R: Rng>(&mut self, ws: &mut Workspace<R>) -> BTreeMap<i32, Span> {
        let region = ws.region;
        let cfg = &self.config;
        let center_noise = NoiseField::line(&mut ws.rng, region.height(), cfg.river_center_resolution, 1);
        let width_noise = NoiseField::line(
            &mut ws.rng,
            region.height(),
            cfg.river_width_resolution,
            cfg.river_width_octaves,
        );

        let mut center = random_normal_int(
            &mut ws.rng,
            region.center().x as f64,
            region.width() as f64 / 4.0 / 3.0,
        ) as f64;

        let mut spans = BTreeMap::new();
        let (mut left, mut right) = (Vec::new(), Vec::new());
        for (i, y) in region.rows().iter().enumerate() {
            let i = i as i32;
            center += (center_noise.at_line(i) - 0.5) * 3.0;
            let width = width_noise.at_line(i) * 2.0 + 5.0;
            // Leave at least one column of bank on either side.
            let lo = region.left() as f64 + 1.0 + width / 2.0;
            let hi = region.right() as f64 - 1.5 - width / 2.0;
            center = center.clamp(lo, hi);

            let x0 = ((center - width / 2.0).floor() as i32).max(region.left() + 1);
            let x1 = ((x0 as f64 + width + 0.5).floor() as i32).min(region.right() - 1);
            for x in x0..=x1 {
                ws.canvas.set_architecture(Point::new(x, y), TileKind::Water);
            }
            left.push((y, Span::new(region.left(), x0 - 1)));
            right.push((y, Span::new(x1 + 1, region.right())));
            spans.insert(y, Span::new(x0, x1));
        }

        self.left_bank = Blob::from_row_spans(left);
        self.right_bank = Blob::from_row_spans(right);
        self.river = Blob::from_row_spans(spans.iter().map(|(&y, &s)| (y, s)));
        log::debug!(
            "river: {} water, banks {} and {}",
            self.river.len(),
            self.left_bank.len(),
            self.right_bank.len()
        );
        spans
    }

    /// Bridge the river once per run of rows with open ground on both banks.
    fn place_bridges<R: Rng>(&mut self, ws: &mut Workspace<R>, river: &BTreeMap<i32, Span>) {
        let mut runs: Vec<(i32, i32)> = Vec::new();
        let mut current: Option<(i32, i32)> = None;
        for (&y, span) in river {
            let west = ws.canvas.architecture(Point::new(span.start - 1, y));
            let east = ws.canvas.architecture(Point::new(span.end + 1, y));
            if !west.is(TileKind::Tree) && !east.is(TileKind::Tree) {
                current = Some(match current {
                    Some((start, _)) => (start, y),
                    None => (y, y),
                });
            } else if let Some(run) = current.take() {
                runs.push(run);
            }
        }
        runs.extend(current);

        for &(start, end) in &runs {
            let y = random_normal_range(&mut ws.rng, start, end);
            let span = river[&y];
            self.local_minima.insert(Point::new(span.start - 1, y));
            self.local_minima.insert(Point::new(span.end + 1, y));
            for x in span {
                ws.canvas.set_architecture(Point::new(x, y), TileKind::Bridge);
            }
        }
        log::debug!("{} bridges", runs.len());
    }

    /// Frame the region with a cave wall of noisy thickness.
    fn carve_border<R: Rng>(&self, ws: &mut Workspace<R>) {
        let region = ws.region;
        for edge in Direction::ORTHOGONAL {
            let wall_noise = NoiseField::line(
                &mut ws.rng,
                region.edge_length(edge),
                self.config.border_resolution,
                1,
            );
            for (i, n) in region.edge_span(edge).iter().enumerate() {
                let v = wall_noise.at_line(i as i32);
                let depth = 1 + (v * self.config.max_border_depth as f64) as i32;
                for m in 0..depth {
                    let p = region.edge_point(edge, n, m);
                    if region.contains(p) {
                        ws.canvas.set_architecture(p, TileKind::CaveWall);
                    }
                }
            }
        }
    }
}

/// Points of `region` that lie no higher than any axis neighbour inside it.
///
/// Along the edges a point also counts when it is strictly lower than its
/// neighbours running along that edge, treating missing ones as 1.0.
pub fn local_minima(region: Range, depth: impl Fn(Point) -> Option<f64>) -> BTreeSet<Point> {
    let mut minima = BTreeSet::new();
    for p in region.iter() {
        let Some(n) = depth(p) else { continue };
        if p.neighbors_4()
            .into_iter()
            .filter_map(&depth)
            .all(|m| m >= n)
        {
            minima.insert(p);
        }
    }

    let lower_than = |p: Point, a: Point, b: Point| match depth(p) {
        Some(n) => n < depth(a).unwrap_or(1.0) && n < depth(b).unwrap_or(1.0),
        None => false,
    };
    for x in region.columns() {
        for y in [region.top(), region.bottom()] {
            let p = Point::new(x, y);
            if lower_than(p, p.shift(-1, 0), p.shift(1, 0)) {
                minima.insert(p);
            }
        }
    }
    for y in region.rows() {
        for x in [region.left(), region.right()] {
            let p = Point::new(x, y);
            if lower_than(p, p.shift(0, -1), p.shift(0, 1)) {
                minima.insert(p);
            }
        }
    }
    minima
}

impl PerlinTerrain {
    /// Everything but the border: terrain bands, river, bridges and the
    /// dirt paths joining the low ground of each bank.
    fn grow_forest<R: Rng>(&mut self, ws: &mut Workspace<R>) {
        let region = ws.region;
        assert!(
            region.width() >= MIN_WIDTH && region.height() >= MIN_HEIGHT,
            "PerlinTerrain: region {region} too small"
        );

        let noise = NoiseField::new(
            &mut ws.rng,
            region,
            self.config.terrain_resolution,
            self.config.terrain_octaves,
        );
        for p in region.iter() {
            let n = noise.at(p);
            let kind = if n < 0.3 {
                TileKind::CutGrass
            } else if n < 0.6 {
                TileKind::Grass
            } else {
                TileKind::Tree
            };
            ws.canvas.set_architecture(p, kind);
        }
        self.local_minima = local_minima(region, |p| noise.get(p));

        let river = self.carve_river(ws);
        self.place_bridges(ws, &river);

        for &p in &self.local_minima {
            if !self.river.contains(p) {
                ws.canvas.set_architecture(p, TileKind::Dirt);
            }
        }

        for bank in [&self.left_bank, &self.right_bank] {
            let paths = flood_valleys(bank.iter(), self.local_minima.iter().copied(), |p| noise.at(p));
            log::debug!("forest paths: {} points", paths.len());
            for p in paths {
                ws.canvas.set_architecture(p, TileKind::Dirt);
            }
        }
    }
}

impl Strategy for PerlinTerrain {
    fn generate<R: Rng>(&mut self, ws: &mut Workspace<R>) {
        self.grow_forest(ws);
        self.carve_border(ws);
    }

    /// The standard items, plus a key.
    fn place_stuff<R: Rng>(&mut self, ws: &mut Workspace<R>) -> Result<(), GenError> {
        ws.place_default_stuff()?;
        let floor = ws.walkable_points("player")?;
        if let Some(&p) = choose(&mut ws.rng, &floor) {
            ws.canvas.add_item(p, TileKind::Key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Fractor, MapCanvas};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    fn terrain(seed: u64, size: Point) -> Fractor<PerlinTerrain, StdRng> {
        let mut fractor = Fractor::new(size, PerlinTerrain::default(), StdRng::seed_from_u64(seed));
        fractor.generate();
        fractor
    }

    /// Whether all of `targets` are 4-connected through `cells`.
    fn connected(cells: &BTreeSet<Point>, targets: &[Point]) -> bool {
        let Some(&start) = targets.first() else {
            return true;
        };
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(p) = queue.pop_front() {
            for n in p.neighbors_4() {
                if cells.contains(&n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        targets.iter().all(|t| seen.contains(t))
    }

    #[test]
    fn minima_of_a_bowl() {
        let region = Range::new(0, 0, 5, 5);
        let bowl = |p: Point| {
            region
                .contains(p)
                .then(|| ((p.x - 2).abs() + (p.y - 2).abs()) as f64 / 10.0)
        };
        let minima = local_minima(region, bowl);
        assert!(minima.contains(&Point::new(2, 2)));
        // Mid-edge points are strictly lower than their neighbours along
        // the edge.
        assert!(minima.contains(&Point::new(2, 0)));
        assert!(minima.contains(&Point::new(0, 2)));
        assert!(!minima.contains(&Point::new(1, 1)));
        assert!(!minima.contains(&Point::new(0, 0)));
    }

    #[test]
    fn flat_ground_is_all_minima() {
        let region = Range::new(0, 0, 4, 3);
        let minima = local_minima(region, |p| region.contains(p).then_some(0.5));
        assert_eq!(minima.len(), region.len());
    }

    #[test]
    fn river_splits_the_banks() {
        for seed in 0..5 {
            let f = terrain(seed, Point::new(60, 40));
            let s = f.strategy();
            assert!(!s.river().is_empty());
            assert!(!s.left_bank().is_empty() && !s.right_bank().is_empty());
            let region = f.region();
            for y in region.rows() {
                let row: Vec<_> = s.river().iter().filter(|p| p.y == y).collect();
                assert!(row.len() >= 5, "river too narrow on row {y}");
                assert!(row.iter().all(|p| region.contains(*p)));
            }
            let total = s.left_bank().len() + s.river().len() + s.right_bank().len();
            assert_eq!(total, region.len());
        }
    }

    #[test]
    fn small_regions_keep_a_bank_on_each_side() {
        for size in [
            Point::new(12, 12),
            Point::new(13, 20),
            Point::new(16, 20),
            Point::new(30, 20),
        ] {
            for seed in 0..200 {
                let f = terrain(seed, size);
                let s = f.strategy();
                let region = f.region();
                for y in region.rows() {
                    assert!(
                        s.left_bank().contains(Point::new(region.left(), y)),
                        "seed {seed}, {size}: no left bank on row {y}"
                    );
                    assert!(
                        s.right_bank().contains(Point::new(region.right(), y)),
                        "seed {seed}, {size}: no right bank on row {y}"
                    );
                }
            }
        }
    }

    #[test]
    fn forest_paths_join_the_minima_of_each_bank() {
        let size = Point::new(50, 30);
        let mut carved = 0;
        for seed in 0..20 {
            let mut ws = Workspace {
                rng: StdRng::seed_from_u64(seed),
                canvas: MapCanvas::new(size),
                region: Range::sized(Point::ZERO, size),
            };
            let mut forest = PerlinTerrain::default();
            forest.grow_forest(&mut ws);

            let dirt: BTreeSet<Point> = ws
                .canvas
                .rect()
                .iter()
                .filter(|&p| ws.canvas.architecture(p).is(TileKind::Dirt))
                .collect();
            for bank in [forest.left_bank(), forest.right_bank()] {
                let minima: Vec<Point> = forest
                    .local_minima()
                    .iter()
                    .copied()
                    .filter(|&p| bank.contains(p))
                    .collect();
                for p in &minima {
                    assert!(dirt.contains(p), "seed {seed}: minimum {p} is not dirt");
                }
                assert!(connected(&dirt, &minima), "seed {seed}: minima not joined");
            }
            carved += dirt
                .iter()
                .filter(|&p| !forest.local_minima().contains(p))
                .count();
        }
        assert!(carved > 0);
    }

    #[test]
    fn river_cells_are_water_or_bridge() {
        let f = terrain(3, Point::new(50, 30));
        let s = f.strategy();
        let border = Blob::from_range(f.region()) - Blob::from_range(f.region().interior());
        for p in s.river().iter().filter(|p| !border.contains(*p)) {
            let kind = f.canvas().architecture(p).kind();
            assert!(
                matches!(kind, TileKind::Water | TileKind::Bridge | TileKind::CaveWall),
                "{kind:?} in the river at {p}"
            );
        }
    }

    #[test]
    fn edges_are_cave_wall() {
        let f = terrain(8, Point::new(40, 30));
        for (p, _) in f.region().iter_border() {
            assert!(f.canvas().architecture(p).is(TileKind::CaveWall));
        }
    }

    #[test]
    fn bridge_landings_are_minima() {
        for seed in 0..10 {
            let f = terrain(seed, Point::new(60, 40));
            let canvas = f.canvas();
            for p in canvas.rect().iter() {
                if canvas.architecture(p).is(TileKind::Bridge) && f.strategy().river().contains(p) {
                    let row = p.y;
                    let xs: Vec<i32> = f.strategy().river().iter().filter(|q| q.y == row).map(|q| q.x).collect();
                    let (lo, hi) = (xs[0], xs[xs.len() - 1]);
                    assert!(f.strategy().local_minima().contains(&Point::new(lo - 1, row)));
                    assert!(f.strategy().local_minima().contains(&Point::new(hi + 1, row)));
                }
            }
        }
    }

    #[test]
    fn deterministic_under_seed() {
        let a = terrain(21, Point::new(45, 35)).finish().render();
        let b = terrain(21, Point::new(45, 35)).finish().render();
        assert_eq!(a, b);
    }

    #[test]
    fn full_map_has_a_key() {
        let fractor = Fractor::new(Point::new(60, 40), PerlinTerrain::default(), StdRng::seed_from_u64(5));
        let map = fractor.generate_map(Some("up"), Some("down")).unwrap();
        assert_eq!(map.count_kind(TileKind::Key), 1);
        assert_eq!(map.count_kind(TileKind::StairsUp), 1);
        assert_eq!(map.count_kind(TileKind::StairsDown), 1);
        assert!(map.count_kind(TileKind::Water) > 0);
    }

    #[test]
    #[should_panic]
    fn too_narrow() {
        terrain(0, Point::new(8, 20));
    }
}
