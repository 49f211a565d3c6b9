//! A hallway lined with rooms, one of them locked.

use fractor_core::{Blob, Direction, Point, Range};
use rand::{Rng, RngExt};

use crate::error::GenError;
use crate::fractor::{Strategy, Workspace};
use crate::random::{random_normal_int, random_normal_range, sample};
use crate::room::Room;
use crate::tile::{TileInstance, TileKind};

/// Sizes used by [`RuinedHall`]. Both include walls.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuinedHallConfig {
    pub minimum_room_width: i32,
    pub hallway_height: i32,
}

impl Default for RuinedHallConfig {
    fn default() -> Self {
        Self {
            minimum_room_width: 7,
            hallway_height: 5,
        }
    }
}

/// One large area cut in half by a hallway, with a row of rooms on either
/// side. Every room has a door onto the hallway; one door is locked and
/// there is a crown behind it.
#[derive(Debug, Clone, Default)]
pub struct RuinedHall {
    pub config: RuinedHallConfig,
    hallway: Range,
    rooms: Vec<Range>,
    locked: usize,
    hallway_area: Blob,
    locked_area: Blob,
    rooms_area: Blob,
}

impl RuinedHall {
    pub fn new(config: RuinedHallConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn hallway(&self) -> Range {
        self.hallway
    }

    /// Every room, walls included. Neighbouring rooms share a wall.
    pub fn rooms(&self) -> &[Range] {
        &self.rooms
    }

    pub fn locked_room(&self) -> Range {
        self.rooms.get(self.locked).copied().unwrap_or_default()
    }

    /// Floor inside the hallway.
    pub fn hallway_area(&self) -> &Blob {
        &self.hallway_area
    }

    /// Floor inside the locked room.
    pub fn locked_area(&self) -> &Blob {
        &self.locked_area
    }

    /// Floor inside the unlocked rooms.
    pub fn rooms_area(&self) -> &Blob {
        &self.rooms_area
    }

    /// Divide `space` into side-by-side rooms sharing their walls.
    ///
    /// Widths are drawn one room at a time, each around the average of what
    /// is left, while leaving enough for the remaining rooms to reach the
    /// minimum width.
    fn split_into_rooms(&self, rng: &mut impl Rng, mut space: Range) -> Vec<Range> {
        let min_width = self.config.minimum_room_width;
        // Rooms overlap by one column, hence the `- 1`s.
        let max_rooms = ((space.width() - 1) / (min_width - 1)).max(1);
        let min_rooms = max_rooms / 6 + 1;
        let mut num_rooms = random_normal_range(rng, min_rooms, max_rooms);

        let mut rooms = Vec::new();
        while num_rooms > 1 {
            let avg_width = (space.width() - 1) / num_rooms + 1;
            let max_width = space.width() - (min_width - 1) * (num_rooms - 1);
            let sigma = ((max_width - avg_width).min(avg_width - min_width) / 3).max(0);
            let room_width =
                random_normal_int(rng, avg_width as f64, sigma as f64).clamp(min_width, max_width);

            let room = space.with_right(space.left() + room_width - 1);
            rooms.push(room);
            space = space.with_left(room.right());
            num_rooms -= 1;
        }
        rooms.push(space);
        rooms
    }

    fn floor_in<R: Rng>(ws: &Workspace<R>, area: &Blob) -> Vec<Point> {
        area.intersection(ws.canvas.walkable())
            .iter()
            .filter(|&p| !ws.canvas.architecture(p).kind().is_portal())
            .collect()
    }
}

impl Strategy for RuinedHall {
    fn generate<R: Rng>(&mut self, ws: &mut Workspace<R>) {
        let region = ws.region;
        let cfg = &self.config;
        assert!(cfg.minimum_room_width >= 5, "RuinedHall: rooms need a door and floor");
        // The area is at least half the region, and each half of it needs
        // room for a row of rooms beside the hallway.
        let min_height = 2 * (cfg.hallway_height + 6);
        let min_width = 2 * cfg.minimum_room_width;
        assert!(
            region.width() >= min_width && region.height() >= min_height,
            "RuinedHall: region {region} too small"
        );

        ws.canvas.clear(TileKind::CaveWall);

        let area = Room::randomize(&mut ws.rng, region, Point::new(region.size().x / 2, region.size().y / 2));
        area.draw_to_canvas(&mut ws.canvas);
        let area = area.rect;

        let center = area.center();
        self.hallway = Range::sized(
            Point::new(area.left(), center.y - cfg.hallway_height / 2),
            Point::new(area.width(), cfg.hallway_height),
        );
        Room::new(self.hallway).draw_to_canvas(&mut ws.canvas);

        let top_space = area.with_bottom(self.hallway.top());
        let bottom_space = area.with_top(self.hallway.bottom());
        let mut rooms = self.split_into_rooms(&mut ws.rng, top_space);
        rooms.extend(self.split_into_rooms(&mut ws.rng, bottom_space));
        for &rect in &rooms {
            Room::new(rect).draw_to_canvas(&mut ws.canvas);
        }

        self.locked = ws.rng.random_range(0..rooms.len());
        for (i, rect) in rooms.iter().enumerate() {
            let x = ws.rng.random_range(rect.left() + 1..=rect.right() - 2);
            // The wall shared with the hallway.
            let wall = if rect.top() > self.hallway.top() {
                Direction::Up
            } else {
                Direction::Down
            };
            let door = rect.edge_point(wall, x, 0);
            ws.canvas
                .set_architecture(door, TileInstance::door(i == self.locked));
        }

        self.hallway_area = Blob::from_range(self.hallway.interior());
        self.locked_area = Blob::from_range(rooms[self.locked].interior());
        self.rooms_area = rooms
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != self.locked)
            .map(|(_, r)| Blob::from_range(r.interior()))
            .fold(Blob::new(), |acc, b| acc + b);
        log::debug!(
            "hall: {} rooms around hallway {}, room {} locked",
            rooms.len(),
            self.hallway,
            rooms[self.locked]
        );
        self.rooms = rooms;
    }

    /// Creatures and loot in the open rooms, a crown in the locked one.
    fn place_stuff<R: Rng>(&mut self, ws: &mut Workspace<R>) -> Result<(), GenError> {
        ws.walkable_points("player")?;
        let room_floors = Self::floor_in(ws, &self.rooms_area);
        let lock_floors = Self::floor_in(ws, &self.locked_area);

        let points = sample(&mut ws.rng, &room_floors, 8)?;
        for &p in &points[..3] {
            ws.canvas.set_creature(p, TileKind::Salamango);
        }
        ws.canvas.add_item(points[3], TileKind::Armor);
        ws.canvas.add_item(points[4], TileKind::Potion);
        ws.canvas.add_item(points[5], TileKind::Potion);
        ws.canvas.add_item(points[6], TileKind::Gem);
        ws.canvas.add_item(points[7], TileKind::Crate);

        let crown = sample(&mut ws.rng, &lock_floors, 1)?;
        ws.canvas.add_item(crown[0], TileKind::Crown);
        Ok(())
    }

    /// Stairs down lead out of an open room, anything else out of the
    /// hallway.
    fn place_portal<R: Rng>(
        &mut self,
        ws: &mut Workspace<R>,
        kind: TileKind,
        destination: &str,
    ) -> Result<(), GenError> {
        let area = if kind == TileKind::StairsDown {
            &self.rooms_area
        } else {
            &self.hallway_area
        };
        let candidates = Self::floor_in(ws, area);
        ws.place_portal_among(&candidates, kind, destination)
    }
}
