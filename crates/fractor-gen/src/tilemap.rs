//! The finished, immutable map handed to whatever turns tiles into game
//! entities.

use fractor_core::{Point, Range};

use crate::tile::{TileInstance, TileKind};

/// Everything standing on one map cell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileStack {
    pub architecture: TileInstance,
    pub items: Vec<TileInstance>,
    pub creature: Option<TileInstance>,
}

impl TileStack {
    /// Architecture first, then items in placement order, then the creature.
    pub fn layers(&self) -> impl Iterator<Item = &TileInstance> {
        std::iter::once(&self.architecture)
            .chain(self.items.iter())
            .chain(self.creature.iter())
    }

    /// The tile drawn on top.
    pub fn top(&self) -> &TileInstance {
        self.creature
            .as_ref()
            .or(self.items.last())
            .unwrap_or(&self.architecture)
    }
}

/// A finalized map: one [`TileStack`] per cell, stored row-major.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileMap {
    size: Point,
    cells: Vec<TileStack>,
}

impl TileMap {
    pub(crate) fn from_cells(size: Point, cells: Vec<TileStack>) -> Self {
        debug_assert_eq!(cells.len(), (size.x * size.y) as usize);
        Self { size, cells }
    }

    pub fn size(&self) -> Point {
        self.size
    }

    pub fn bounds(&self) -> Range {
        Range::sized(Point::ZERO, self.size)
    }

    /// The stack at `p`, or `None` outside the map.
    pub fn get(&self, p: Point) -> Option<&TileStack> {
        if !self.bounds().contains(p) {
            return None;
        }
        self.cells.get((p.y * self.size.x + p.x) as usize)
    }

    /// The stack at `p`. Panics outside the map.
    pub fn stack(&self, p: Point) -> &TileStack {
        match self.get(p) {
            Some(s) => s,
            None => panic!("TileMap: {p} outside {}", self.bounds()),
        }
    }

    /// Row-major iterator over every cell.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &TileStack)> {
        self.bounds().iter().zip(self.cells.iter())
    }

    /// The layers at `p`, bottom to top.
    pub fn layers(&self, p: Point) -> impl Iterator<Item = &TileInstance> {
        self.stack(p).layers()
    }

    /// How many tiles of `kind` there are, across all layers.
    pub fn count_kind(&self, kind: TileKind) -> usize {
        self.cells
            .iter()
            .flat_map(TileStack::layers)
            .filter(|t| t.kind == kind)
            .count()
    }

    /// Every point holding a tile of `kind`, in row-major order.
    pub fn find_kind(&self, kind: TileKind) -> Vec<Point> {
        self.iter()
            .filter(|(_, s)| s.layers().any(|t| t.kind == kind))
            .map(|(p, _)| p)
            .collect()
    }

    /// One line of glyphs per row, showing the top layer of each cell.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() * 2);
        for row in self.cells.chunks(self.size.x as usize) {
            out.extend(row.iter().map(|s| s.top().kind.glyph()));
            out.push('\n');
        }
        out
    }
}
