//! The mutable workspace a map is drawn onto.

use std::collections::BTreeSet;

use fractor_core::{Point, Range};
use fractor_paths::{PathRange, Pather};

use crate::tile::{Tile, TileKind};
use crate::tilemap::{TileMap, TileStack};

/// Layered tile grid under construction.
///
/// Every cell holds one architecture tile, an ordered list of items and at
/// most one creature. The set of walkable points (cells whose architecture
/// is not solid) is kept up to date on every architecture write.
///
/// All accessors panic when given a point outside [`rect`](Self::rect).
#[derive(Clone, Debug)]
pub struct MapCanvas {
    rect: Range,
    arch: Vec<Tile>,
    items: Vec<Vec<Tile>>,
    creatures: Vec<Option<Tile>>,
    walkable: BTreeSet<Point>,
}

impl MapCanvas {
    /// A canvas of the given size, filled with cave wall.
    pub fn new(size: Point) -> Self {
        assert!(size.x > 0 && size.y > 0, "MapCanvas: invalid size {size}");
        let rect = Range::sized(Point::ZERO, size);
        let len = rect.len();
        Self {
            rect,
            arch: vec![Tile::Kind(TileKind::CaveWall); len],
            items: vec![Vec::new(); len],
            creatures: vec![None; len],
            walkable: BTreeSet::new(),
        }
    }

    /// The canvas bounds, anchored at the origin.
    #[inline]
    pub fn rect(&self) -> Range {
        self.rect
    }

    #[inline]
    fn idx(&self, p: Point) -> usize {
        if !self.rect.contains(p) {
            panic!("MapCanvas: {p} outside {}", self.rect);
        }
        (p.y * self.rect.width() + p.x) as usize
    }

    /// Set every architecture tile to `tile`. Items and creatures stay.
    pub fn clear(&mut self, tile: impl Into<Tile>) {
        let tile = tile.into();
        let solid = tile.kind().is_solid();
        self.arch.fill(tile);
        self.walkable = if solid {
            BTreeSet::new()
        } else {
            self.rect.iter().collect()
        };
    }

    pub fn set_architecture(&mut self, p: Point, tile: impl Into<Tile>) {
        let i = self.idx(p);
        let tile = tile.into();
        if tile.kind().is_solid() {
            self.walkable.remove(&p);
        } else {
            self.walkable.insert(p);
        }
        self.arch[i] = tile;
    }

    pub fn add_item(&mut self, p: Point, tile: impl Into<Tile>) {
        let i = self.idx(p);
        self.items[i].push(tile.into());
    }

    /// Put a creature at `p`, replacing whichever was there.
    pub fn set_creature(&mut self, p: Point, tile: impl Into<Tile>) {
        let i = self.idx(p);
        self.creatures[i] = Some(tile.into());
    }

    pub fn architecture(&self, p: Point) -> &Tile {
        &self.arch[self.idx(p)]
    }

    pub fn items(&self, p: Point) -> &[Tile] {
        &self.items[self.idx(p)]
    }

    pub fn creature(&self, p: Point) -> Option<&Tile> {
        self.creatures[self.idx(p)].as_ref()
    }

    /// Points whose architecture is not solid, in row-major order.
    pub fn walkable(&self) -> &BTreeSet<Point> {
        &self.walkable
    }

    #[inline]
    pub fn is_walkable(&self, p: Point) -> bool {
        self.walkable.contains(&p)
    }

    /// Number of separate 4-connected walkable areas.
    pub fn walkable_components(&self) -> usize {
        let mut pr = PathRange::new(self.rect);
        pr.cc_map_all(&WalkablePather(self), |p| self.is_walkable(p))
    }

    /// Finalize the canvas: every tile becomes a configured instance.
    pub fn into_tile_map(self) -> TileMap {
        let size = self.rect.size();
        let cells = self
            .arch
            .into_iter()
            .zip(self.items)
            .zip(self.creatures)
            .map(|((arch, items), creature)| TileStack {
                architecture: arch.instantiate(),
                items: items.into_iter().map(Tile::instantiate).collect(),
                creature: creature.map(Tile::instantiate),
            })
            .collect();
        TileMap::from_cells(size, cells)
    }
}

/// 4-directional moves between walkable cells of a canvas.
pub struct WalkablePather<'a>(pub &'a MapCanvas);

impl Pather for WalkablePather<'_> {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(
            p.neighbors_4()
                .into_iter()
                .filter(|&q| self.0.rect.contains(q) && self.0.is_walkable(q)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileInstance;
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    fn walkable_matches_architecture(c: &MapCanvas) -> bool {
        let expected: BTreeSet<Point> = c
            .rect()
            .iter()
            .filter(|&p| !c.architecture(p).kind().is_solid())
            .collect();
        &expected == c.walkable()
    }

    #[test]
    fn starts_solid() {
        let c = MapCanvas::new(Point::new(4, 3));
        assert!(c.walkable().is_empty());
        assert!(c.architecture(Point::new(3, 2)).is(TileKind::CaveWall));
    }

    #[test]
    fn walkable_follows_random_writes() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut c = MapCanvas::new(Point::new(12, 9));
        let kinds = [
            TileKind::Floor,
            TileKind::Wall,
            TileKind::Water,
            TileKind::Bridge,
            TileKind::Tree,
            TileKind::Door,
        ];
        for step in 0..500 {
            if step % 97 == 0 {
                let k = kinds[rng.random_range(0..kinds.len())];
                c.clear(k);
            }
            let p = Point::new(rng.random_range(0..12), rng.random_range(0..9));
            let k = kinds[rng.random_range(0..kinds.len())];
            c.set_architecture(p, k);
            assert!(walkable_matches_architecture(&c));
        }
    }

    #[test]
    fn items_stack_creatures_replace() {
        let mut c = MapCanvas::new(Point::new(2, 2));
        let p = Point::new(1, 1);
        c.add_item(p, TileKind::Potion);
        c.add_item(p, TileKind::Gem);
        c.set_creature(p, TileKind::Salamango);
        c.set_creature(p, TileKind::Salamango);
        let kinds: Vec<_> = c.items(p).iter().map(Tile::kind).collect();
        assert_eq!(kinds, vec![TileKind::Potion, TileKind::Gem]);
        assert!(c.creature(p).is_some());
        assert!(c.creature(Point::ZERO).is_none());
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_panics() {
        let mut c = MapCanvas::new(Point::new(2, 2));
        c.set_architecture(Point::new(2, 0), TileKind::Floor);
    }

    #[test]
    fn components() {
        let mut c = MapCanvas::new(Point::new(7, 3));
        for x in [1, 2, 4, 5] {
            c.set_architecture(Point::new(x, 1), TileKind::Floor);
        }
        assert_eq!(c.walkable_components(), 2);
        c.set_architecture(Point::new(3, 1), TileKind::Bridge);
        assert_eq!(c.walkable_components(), 1);
    }

    #[test]
    fn finalize_instantiates_and_orders_layers() {
        let mut c = MapCanvas::new(Point::new(3, 1));
        let p = Point::new(1, 0);
        c.set_architecture(p, TileKind::Door);
        c.add_item(p, TileKind::Key);
        c.add_item(p, TileKind::Crown);
        c.set_creature(p, TileKind::Salamango);
        c.set_architecture(Point::new(2, 0), TileInstance::door(true));
        let map = c.into_tile_map();

        let layers: Vec<_> = map.layers(p).map(|t| t.kind).collect();
        assert_eq!(
            layers,
            vec![TileKind::Door, TileKind::Key, TileKind::Crown, TileKind::Salamango]
        );
        assert_eq!(map.stack(p).architecture, TileInstance::door(false));
        assert!(map.stack(Point::new(2, 0)).architecture.is_locked());
    }
}
