//! A decaying stone room sunk into a cave.
//!
//! The room has a gate on its left or right wall. The cave is carved around
//! it with the gate side kept open, the wall near the gate is broken into
//! rubble, and one more stretch of the room's border has collapsed into
//! cave wall.

use fractor_core::{Blob, Direction, Point, Range};
use rand::{Rng, RngExt};

use crate::caves::{CaveRule, generate_caves};
use crate::error::GenError;
use crate::fractor::{Strategy, Workspace};
use crate::random::{choose, random_normal_f64, random_normal_int, random_normal_range, sample};
use crate::room::Room;
use crate::tile::{TileInstance, TileKind};

/// Smallest room side, walls included.
const MIN_ROOM: i32 = 9;
/// Cells of cave kept between the room and the region's edge.
const CAVE_MARGIN: i32 = 3;
/// Attempts at finding a border cell backed by cave wall.
const PUNCH_THROUGH_TRIES: usize = 64;

/// Room-in-a-cave layout.
#[derive(Debug, Clone)]
pub struct Ruin {
    pub cave_rule: CaveRule,
    side: Direction,
    room: Range,
    cave: Blob,
}

impl Default for Ruin {
    fn default() -> Self {
        Self {
            cave_rule: CaveRule::default(),
            side: Direction::Left,
            room: Range::default(),
            cave: Blob::new(),
        }
    }
}

impl Ruin {
    pub fn new(cave_rule: CaveRule) -> Self {
        Self {
            cave_rule,
            ..Self::default()
        }
    }

    /// The room's wall holding the gate.
    pub fn side(&self) -> Direction {
        self.side
    }

    /// The room, walls included.
    pub fn room(&self) -> Range {
        self.room
    }

    /// Everything in the region outside the room.
    pub fn cave(&self) -> &Blob {
        &self.cave
    }

    /// Rows of the gate, on the room's `side` column.
    pub fn gate(&self) -> impl Iterator<Item = Point> + '_ {
        let x = self.gate_column();
        let mid = self.room.top() + self.room.height() / 2;
        (mid - 1..=mid + 1).map(move |y| Point::new(x, y))
    }

    fn gate_column(&self) -> i32 {
        if self.side == Direction::Left {
            self.room.left()
        } else {
            self.room.right()
        }
    }

    fn place_room(&mut self, rng: &mut impl Rng, region: Range) {
        let max_w = MIN_ROOM.max((region.width() as f64 * 0.4) as i32);
        let max_h = MIN_ROOM.max((region.height() as f64 * 0.4) as i32);
        let size = Point::new(
            random_normal_range(rng, MIN_ROOM, max_w),
            random_normal_range(rng, MIN_ROOM, max_h),
        );
        let jitter = Point::new(
            random_normal_int(rng, 0.0, region.width() as f64 * 0.1),
            random_normal_int(rng, 0.0, region.height() as f64 * 0.1),
        );
        let pos = region.center() - Point::new(size.x / 2, size.y / 2) + jitter;
        let pos = Point::new(
            pos.x.clamp(
                region.left() + CAVE_MARGIN,
                region.right() - CAVE_MARGIN - size.x + 1,
            ),
            pos.y.clamp(
                region.top() + CAVE_MARGIN,
                region.bottom() - CAVE_MARGIN - size.y + 1,
            ),
        );
        self.room = Range::sized(pos, size);
        self.cave = Blob::from_range(region) - Blob::from_range(self.room);
    }

    /// Break up the wall near the gate. Rubble gets weaker further from a
    /// random point on the gate's wall.
    fn ruin_gate_wall<R: Rng>(&self, ws: &mut Workspace<R>) {
        let x = self.gate_column();
        let mid = self.room.top() + self.room.height() / 2;
        let rows: Vec<i32> = (self.room.top()..mid - 1)
            .chain(mid + 2..self.room.bottom())
            .collect();
        let Some(&y) = choose(&mut ws.rng, &rows) else {
            return;
        };
        for dy in -2..=2 {
            for dx in -2..=2 {
                let p = Point::new(x + dx, y + dy);
                if !ws.region.contains(p) {
                    continue;
                }
                let kind = ws.canvas.architecture(p).kind();
                if kind == TileKind::CaveWall || kind == TileKind::Gate {
                    continue;
                }
                let distance = (dx.abs() + dy.abs()) as f64;
                let decay = random_normal_f64(&mut ws.rng, 0.0, 0.2) + distance * 0.2;
                ws.canvas
                    .set_architecture(p, TileInstance::breakable((1.0 - decay) as f32));
            }
        }
    }

    /// Collapse one bit of the room's border where the cave wall behind it
    /// reaches it.
    fn punch_through<R: Rng>(&self, ws: &mut Workspace<R>) {
        let border: Vec<(Point, Direction)> = self
            .room
            .iter_border()
            .filter(|&(p, _)| !ws.canvas.architecture(p).is(TileKind::Gate))
            .collect();
        for _ in 0..PUNCH_THROUGH_TRIES {
            let Some(&(p, edge)) = choose(&mut ws.rng, &border) else {
                break;
            };
            let behind = p + edge;
            if !ws.region.contains(behind) || !ws.canvas.architecture(behind).is(TileKind::CaveWall) {
                continue;
            }
            let inside = p - edge;
            ws.canvas.set_architecture(p, TileKind::CaveWall);
            ws.canvas.set_architecture(inside, TileKind::CaveWall);
            for d in Direction::ORTHOGONAL {
                ws.canvas.set_architecture(inside + d, TileKind::CaveWall);
            }
            log::debug!("room wall collapsed at {p}");
            return;
        }
        log::warn!(
            "no cave wall behind the border of {} after {PUNCH_THROUGH_TRIES} tries",
            self.room
        );
    }
}

impl Strategy for Ruin {
    fn generate<R: Rng>(&mut self, ws: &mut Workspace<R>) {
        let region = ws.region;
        let min_side = MIN_ROOM + 2 * CAVE_MARGIN + 1;
        assert!(
            region.width() >= min_side && region.height() >= min_side,
            "Ruin: region {region} too small"
        );
        for p in region.iter() {
            ws.canvas.set_architecture(p, TileKind::Floor);
        }

        self.side = if ws.rng.random() {
            Direction::Left
        } else {
            Direction::Right
        };
        self.place_room(&mut ws.rng, region);
        log::debug!("ruin: room {} with its gate {:?}", self.room, self.side);

        let walls: Vec<Point> = region.iter_border().map(|(p, _)| p).collect();
        let mut floors = Vec::new();
        for (p, edge) in self.room.iter_border() {
            if edge == self.side || edge.adjacent_to(self.side) {
                floors.push(p);
                floors.push(p + self.side);
            }
        }
        generate_caves(
            &mut ws.rng,
            &mut ws.canvas,
            &self.cave,
            &self.cave_rule,
            TileKind::CaveWall,
            walls,
            floors,
        );

        Room::new(self.room).draw_to_canvas(&mut ws.canvas);
        for p in self.gate() {
            ws.canvas.set_architecture(p, TileKind::Gate);
        }

        self.ruin_gate_wall(ws);
        self.punch_through(ws);
    }

    /// An exit ladder, a gem and a crate, all out in the cave.
    fn place_stuff<R: Rng>(&mut self, ws: &mut Workspace<R>) -> Result<(), GenError> {
        ws.walkable_points("player")?;
        let cave_floor: Vec<Point> = self.cave.intersection(ws.canvas.walkable()).iter().collect();
        let points = sample(&mut ws.rng, &cave_floor, 3)?;
        ws.canvas
            .set_architecture(points[0], TileInstance::portal(TileKind::Ladder, "__exit__"));
        ws.canvas.add_item(points[1], TileKind::Gem);
        ws.canvas.add_item(points[2], TileKind::Crate);
        Ok(())
    }

    /// Stairs down sit in the middle of the room between four pillars.
    fn place_portal<R: Rng>(
        &mut self,
        ws: &mut Workspace<R>,
        kind: TileKind,
        destination: &str,
    ) -> Result<(), GenError> {
        let center = self.room.center();
        if kind == TileKind::StairsDown {
            ws.canvas
                .set_architecture(center, TileInstance::portal(kind, destination));
            for d in Direction::DIAGONAL {
                ws.canvas.set_architecture(center + d, TileKind::Pillar);
            }
            return Ok(());
        }

        let shrine: Vec<Point> = std::iter::once(center)
            .chain(Direction::DIAGONAL.into_iter().map(|d| center + d))
            .collect();
        let candidates: Vec<Point> = ws
            .canvas
            .walkable()
            .iter()
            .copied()
            .filter(|p| !shrine.contains(p) && !ws.canvas.architecture(*p).kind().is_portal())
            .collect();
        ws.place_portal_among(&candidates, kind, destination)
    }
}
