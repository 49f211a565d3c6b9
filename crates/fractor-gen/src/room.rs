use fractor_core::{Point, Range};
use rand::{Rng, RngExt};

use crate::canvas::MapCanvas;
use crate::random::random_normal_range;
use crate::tile::TileKind;

/// A rectangle drawn as a wall border around a floor interior.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub rect: Range,
}

impl Room {
    pub fn new(rect: Range) -> Self {
        Self { rect }
    }

    /// A random room inside `region`, at least `minimum_size` on each axis
    /// where the region allows it.
    ///
    /// Each dimension is a bounded-normal draw between the minimum and the
    /// region's extent; the position is uniform over every placement that
    /// keeps the room inside the region.
    pub fn randomize(rng: &mut impl Rng, region: Range, minimum_size: Point) -> Self {
        assert!(!region.is_empty(), "Room::randomize: empty region");
        let size = region.size();
        let w = random_normal_range(rng, minimum_size.x.clamp(1, size.x), size.x);
        let h = random_normal_range(rng, minimum_size.y.clamp(1, size.y), size.y);
        let x = region.left() + rng.random_range(0..=size.x - w);
        let y = region.top() + rng.random_range(0..=size.y - h);
        Self::new(Range::sized(Point::new(x, y), Point::new(w, h)))
    }

    /// Floor inside, wall on the border. Panics if the room does not fit
    /// the canvas.
    pub fn draw_to_canvas(&self, canvas: &mut MapCanvas) {
        assert!(
            self.rect.in_range(canvas.rect()),
            "Room {} does not fit canvas {}",
            self.rect,
            canvas.rect()
        );
        let interior = self.rect.interior();
        for p in self.rect.iter() {
            let kind = if interior.contains(p) {
                TileKind::Floor
            } else {
                TileKind::Wall
            };
            canvas.set_architecture(p, kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn border_is_solid_interior_walkable() {
        let mut rng = StdRng::seed_from_u64(4);
        let canvas_rect = Range::new(0, 0, 30, 20);
        for _ in 0..50 {
            let mut c = MapCanvas::new(canvas_rect.size());
            let room = Room::randomize(&mut rng, Range::new(2, 3, 27, 18), Point::new(4, 4));
            assert!(room.rect.in_range(Range::new(2, 3, 27, 18)));
            assert!(room.rect.width() >= 4 && room.rect.height() >= 4);
            room.draw_to_canvas(&mut c);

            let border: Vec<Point> = room.rect.iter_border().map(|(p, _)| p).collect();
            for &p in &border {
                assert!(c.architecture(p).kind().is_solid());
            }
            for p in room.rect.interior().iter() {
                assert!(!c.architecture(p).kind().is_solid());
                assert!(c.is_walkable(p));
            }
            assert_eq!(border.len() + room.rect.interior().len(), room.rect.len());
            assert_eq!(c.walkable().len(), room.rect.interior().len());
        }
    }

    #[test]
    fn minimum_larger_than_region() {
        let mut rng = StdRng::seed_from_u64(8);
        let region = Range::new(0, 0, 3, 3);
        let room = Room::randomize(&mut rng, region, Point::new(10, 10));
        assert_eq!(room.rect, region);
    }

    #[test]
    #[should_panic]
    fn drawing_outside_panics() {
        let mut c = MapCanvas::new(Point::new(5, 5));
        Room::new(Range::new(2, 2, 6, 5)).draw_to_canvas(&mut c);
    }

    #[test]
    fn drawing_is_idempotent() {
        let mut a = MapCanvas::new(Point::new(9, 9));
        let room = Room::new(Range::new(1, 1, 8, 6));
        room.draw_to_canvas(&mut a);
        let once = a.walkable().clone();
        room.draw_to_canvas(&mut a);
        assert_eq!(&once, a.walkable());
    }
}
