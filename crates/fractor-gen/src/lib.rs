//! Procedural map generation.
//!
//! A map is built on a [`MapCanvas`] by a layout [`Strategy`] driven by a
//! [`Fractor`], then finalized into a [`TileMap`]:
//!
//! - [`BinaryPartition`]: rooms in recursively split rectangles.
//! - [`PerlinTerrain`]: grass and forest from noise, a river with bridges,
//!   dirt paths joining the low ground.
//! - [`Ruin`]: a decaying room with a gate, sunk into a cellular automaton
//!   cave.
//! - [`RuinedHall`]: a hallway lined with rooms, one of them locked.
//!
//! Every random draw comes from the generator the fractor owns, so a seeded
//! generator reproduces the same map.
//!
//! ```
//! use fractor_core::Point;
//! use fractor_gen::{BinaryPartition, Fractor, TileKind};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let fractor = Fractor::new(
//!     Point::new(40, 30),
//!     BinaryPartition::new(Point::new(5, 5)),
//!     StdRng::seed_from_u64(1),
//! );
//! let map = fractor.generate_map(Some("upstairs"), Some("downstairs")).unwrap();
//! assert_eq!(map.count_kind(TileKind::StairsDown), 1);
//! ```

pub mod canvas;
pub mod caves;
mod error;
pub mod fractor;
pub mod hall;
pub mod noisefield;
pub mod partition;
pub mod perlin;
pub mod random;
pub mod room;
pub mod ruin;
pub mod tile;
pub mod tilemap;

pub use canvas::{MapCanvas, WalkablePather};
pub use caves::{CaveRule, generate_caves};
pub use error::GenError;
pub use fractor::{Fractor, Strategy, Workspace};
pub use hall::{RuinedHall, RuinedHallConfig};
pub use noisefield::NoiseField;
pub use partition::BinaryPartition;
pub use perlin::{PerlinConfig, PerlinTerrain};
pub use room::Room;
pub use ruin::Ruin;
pub use tile::{Layer, Physics, Tile, TileInstance, TileKind, TileParams};
pub use tilemap::{TileMap, TileStack};
