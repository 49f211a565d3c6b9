//! Generate a map and print it as text.
//!
//! Run: cargo run --bin dump -- perlin 42 60 40

use clap::{Parser, ValueEnum};
use fractor_core::Point;
use fractor_gen::{
    BinaryPartition, Fractor, GenError, PerlinTerrain, Ruin, RuinedHall, Strategy, TileMap,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Layout {
    /// Rooms in a binary space partition.
    Bsp,
    /// Grass, forest and a river.
    Perlin,
    /// A ruined room in a cave.
    Ruin,
    /// A hallway lined with rooms.
    Hall,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(value_enum, default_value_t = Layout::Bsp)]
    layout: Layout,
    #[arg(default_value_t = 0)]
    seed: u64,
    #[arg(default_value_t = 60)]
    width: i32,
    #[arg(default_value_t = 40)]
    height: i32,
}

fn generate(strategy: impl Strategy, size: Point, seed: u64) -> Result<TileMap, GenError> {
    Fractor::new(size, strategy, StdRng::seed_from_u64(seed)).generate_map(Some("up"), Some("down"))
}

fn main() {
    let args = Args::parse();
    let size = Point::new(args.width, args.height);
    let result = match args.layout {
        Layout::Bsp => generate(BinaryPartition::new(Point::new(5, 5)), size, args.seed),
        Layout::Perlin => generate(PerlinTerrain::default(), size, args.seed),
        Layout::Ruin => generate(Ruin::default(), size, args.seed),
        Layout::Hall => generate(RuinedHall::default(), size, args.seed),
    };

    match result {
        Ok(map) => print!("{}", map.render()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
