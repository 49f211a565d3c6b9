//! Grid search algorithms for map generation.
//!
//! - **A\*** towards the nearest of several goals ([`PathRange::astar_nearest`])
//! - **Connected components** labelling ([`PathRange::cc_map_all`], [`PathRange::cc_at`])
//! - **Valley flooding** ([`flood_valleys`]): joins a set of seed points with
//!   a network of low-cost paths over a height map.
//!
//! The searches run through [`PathRange`], which owns and reuses its node
//! caches between queries.
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | connected components |
//! | [`WeightedPather`] : [`Pather`] | step costs, used by A* |
//! | [`AstarPather`] : [`WeightedPather`] | A* |

mod astar;
mod cc;
mod costs;
mod flood;
mod pathrange;
mod traits;

pub use costs::{CostGrid, chebyshev, manhattan};
pub use flood::flood_valleys;
pub use pathrange::PathRange;
pub use traits::{AstarPather, Pather, WeightedPather};
