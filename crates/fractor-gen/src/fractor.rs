//! The map generation driver.
//!
//! A [`Fractor`] pairs a [`Strategy`] (the layout algorithm) with the
//! [`Workspace`] it draws into. Generating a map runs, in order: the
//! strategy's layout, item and creature placement, the optional up and
//! down portals, then finalization into a [`TileMap`].

use fractor_core::{Point, Range};
use rand::Rng;

use crate::canvas::MapCanvas;
use crate::error::GenError;
use crate::random::{choose, sample};
use crate::tile::{TileInstance, TileKind};
use crate::tilemap::TileMap;

/// What a strategy works on: the canvas, the part of it to fill and the
/// random source.
pub struct Workspace<R: Rng> {
    pub rng: R,
    pub canvas: MapCanvas,
    /// The part of the canvas being generated. Defaults to all of it.
    pub region: Range,
}

impl<R: Rng> Workspace<R> {
    /// Scatter the standard set of creatures and items on walkable ground:
    /// one salamango, armor, two potions, a gem and a crate.
    ///
    /// Ten distinct points are drawn, so smaller maps fail with
    /// [`GenError::SampleTooLarge`].
    pub fn place_default_stuff(&mut self) -> Result<(), GenError> {
        let floor = self.walkable_points("player")?;
        let points = sample(&mut self.rng, &floor, 10)?;
        self.canvas.set_creature(points[0], TileKind::Salamango);
        self.canvas.add_item(points[1], TileKind::Armor);
        self.canvas.add_item(points[2], TileKind::Potion);
        self.canvas.add_item(points[3], TileKind::Potion);
        self.canvas.add_item(points[4], TileKind::Gem);
        self.canvas.add_item(points[5], TileKind::Crate);
        Ok(())
    }

    /// Put a portal leading to `destination` on a random walkable point
    /// that does not hold a portal already.
    ///
    /// The canvas is left untouched on failure.
    pub fn place_portal_randomly(&mut self, kind: TileKind, destination: &str) -> Result<(), GenError> {
        let candidates: Vec<Point> = self
            .canvas
            .walkable()
            .iter()
            .copied()
            .filter(|&p| !self.canvas.architecture(p).kind().is_portal())
            .collect();
        self.place_portal_among(&candidates, kind, destination)
    }

    /// Like [`place_portal_randomly`](Self::place_portal_randomly), choosing
    /// among `candidates` only.
    pub fn place_portal_among(
        &mut self,
        candidates: &[Point],
        kind: TileKind,
        destination: &str,
    ) -> Result<(), GenError> {
        let p = *choose(&mut self.rng, candidates).ok_or(GenError::NoOpenSpace { purpose: "portal" })?;
        self.canvas
            .set_architecture(p, TileInstance::portal(kind, destination));
        log::debug!("{kind:?} to {destination:?} at {p}");
        Ok(())
    }

    /// All walkable points, or [`GenError::NoOpenSpace`] if there are none.
    pub fn walkable_points(&self, purpose: &'static str) -> Result<Vec<Point>, GenError> {
        if self.canvas.walkable().is_empty() {
            return Err(GenError::NoOpenSpace { purpose });
        }
        Ok(self.canvas.walkable().iter().copied().collect())
    }
}

/// A layout algorithm.
///
/// Only [`generate`](Strategy::generate) is required. The placement steps
/// default to scattering the standard items and putting portals on random
/// walkable points.
pub trait Strategy {
    /// Draw the layout into `ws.region` of the canvas.
    fn generate<R: Rng>(&mut self, ws: &mut Workspace<R>);

    fn place_stuff<R: Rng>(&mut self, ws: &mut Workspace<R>) -> Result<(), GenError> {
        ws.place_default_stuff()
    }

    fn place_portal<R: Rng>(
        &mut self,
        ws: &mut Workspace<R>,
        kind: TileKind,
        destination: &str,
    ) -> Result<(), GenError> {
        ws.place_portal_randomly(kind, destination)
    }
}

/// Generates one map with strategy `S`.
pub struct Fractor<S, R: Rng> {
    ws: Workspace<R>,
    strategy: S,
}

impl<S: Strategy, R: Rng> Fractor<S, R> {
    /// A fractor filling a canvas of `size` entirely.
    pub fn new(size: Point, strategy: S, rng: R) -> Self {
        let canvas = MapCanvas::new(size);
        let region = canvas.rect();
        Self {
            ws: Workspace { rng, canvas, region },
            strategy,
        }
    }

    /// Restrict generation to `region`. Panics if it leaves the canvas.
    pub fn with_region(mut self, region: Range) -> Self {
        assert!(
            !region.is_empty() && region.in_range(self.ws.canvas.rect()),
            "Fractor: region {region} outside canvas {}",
            self.ws.canvas.rect()
        );
        self.ws.region = region;
        self
    }

    pub fn canvas(&self) -> &MapCanvas {
        &self.ws.canvas
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn region(&self) -> Range {
        self.ws.region
    }

    /// Run the layout step.
    pub fn generate(&mut self) {
        self.strategy.generate(&mut self.ws);
        log::debug!(
            "layout done: {} walkable points in {}",
            self.ws.canvas.walkable().len(),
            self.ws.region
        );
    }

    pub fn place_stuff(&mut self) -> Result<(), GenError> {
        self.strategy.place_stuff(&mut self.ws)
    }

    pub fn place_portal(&mut self, kind: TileKind, destination: &str) -> Result<(), GenError> {
        self.strategy.place_portal(&mut self.ws, kind, destination)
    }

    /// Finalize the canvas.
    pub fn finish(self) -> TileMap {
        self.ws.canvas.into_tile_map()
    }

    /// Generate a complete map, with stairs up to `up` and down to `down`
    /// when given.
    ///
    /// On error the fractor is gone with its half-drawn canvas; retry with
    /// a new one.
    pub fn generate_map(mut self, up: Option<&str>, down: Option<&str>) -> Result<TileMap, GenError> {
        self.generate();
        self.place_stuff()?;
        if let Some(dest) = up {
            self.place_portal(TileKind::StairsUp, dest)?;
        }
        if let Some(dest) = down {
            self.place_portal(TileKind::StairsDown, dest)?;
        }
        log::debug!(
            "map finished: {} walkable components",
            self.ws.canvas.walkable_components()
        );
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Floor everywhere.
    struct OpenField;

    impl Strategy for OpenField {
        fn generate<R: Rng>(&mut self, ws: &mut Workspace<R>) {
            for p in ws.region.iter() {
                ws.canvas.set_architecture(p, TileKind::Floor);
            }
        }
    }

    /// Leaves the canvas solid.
    struct Nothing;

    impl Strategy for Nothing {
        fn generate<R: Rng>(&mut self, _ws: &mut Workspace<R>) {}
    }

    #[test]
    fn default_placement() {
        let fractor = Fractor::new(Point::new(8, 8), OpenField, StdRng::seed_from_u64(1));
        let map = fractor.generate_map(Some("up"), Some("down")).unwrap();
        assert_eq!(map.count_kind(TileKind::Salamango), 1);
        assert_eq!(map.count_kind(TileKind::Armor), 1);
        assert_eq!(map.count_kind(TileKind::Potion), 2);
        assert_eq!(map.count_kind(TileKind::Gem), 1);
        assert_eq!(map.count_kind(TileKind::Crate), 1);
        assert_eq!(map.count_kind(TileKind::StairsUp), 1);
        assert_eq!(map.count_kind(TileKind::StairsDown), 1);
        let down = map.find_kind(TileKind::StairsDown);
        assert_eq!(map.stack(down[0]).architecture.destination(), Some("down"));
    }

    #[test]
    fn region_limits_generation() {
        let fractor = Fractor::new(Point::new(10, 10), OpenField, StdRng::seed_from_u64(2))
            .with_region(Range::new(2, 2, 6, 7));
        let map = fractor.generate_map(None, None).unwrap();
        assert_eq!(map.count_kind(TileKind::Floor), 20);
        assert_eq!(map.count_kind(TileKind::CaveWall), 80);
    }

    #[test]
    fn too_little_room_for_items() {
        let fractor = Fractor::new(Point::new(3, 3), OpenField, StdRng::seed_from_u64(3));
        assert_eq!(
            fractor.generate_map(None, None),
            Err(GenError::SampleTooLarge {
                wanted: 10,
                available: 9
            })
        );
        let fractor = Fractor::new(Point::new(3, 3), Nothing, StdRng::seed_from_u64(3));
        assert_eq!(
            fractor.generate_map(None, None),
            Err(GenError::NoOpenSpace { purpose: "player" })
        );
    }

    #[test]
    fn portal_without_open_space_leaves_canvas_alone() {
        let mut fractor = Fractor::new(Point::new(6, 4), Nothing, StdRng::seed_from_u64(4));
        fractor.generate();
        let before = fractor.canvas().clone();
        assert_eq!(
            fractor.place_portal(TileKind::StairsDown, "below"),
            Err(GenError::NoOpenSpace { purpose: "portal" })
        );
        let after = fractor.canvas();
        assert!(after.walkable().is_empty());
        for p in before.rect().iter() {
            assert_eq!(before.architecture(p), after.architecture(p));
            assert!(after.items(p).is_empty());
            assert!(after.creature(p).is_none());
        }
    }

    #[test]
    fn portals_do_not_overwrite_each_other() {
        let mut fractor = Fractor::new(Point::new(2, 1), OpenField, StdRng::seed_from_u64(5));
        fractor.generate();
        fractor.place_portal(TileKind::StairsUp, "a").unwrap();
        fractor.place_portal(TileKind::StairsDown, "b").unwrap();
        assert_eq!(
            fractor.place_portal(TileKind::StairsDown, "c"),
            Err(GenError::NoOpenSpace { purpose: "portal" })
        );
        let map = fractor.finish();
        assert_eq!(map.count_kind(TileKind::StairsUp), 1);
        assert_eq!(map.count_kind(TileKind::StairsDown), 1);
    }

    #[test]
    #[should_panic]
    fn region_outside_canvas() {
        let _ = Fractor::new(Point::new(5, 5), OpenField, StdRng::seed_from_u64(6))
            .with_region(Range::new(0, 0, 6, 5));
    }
}
