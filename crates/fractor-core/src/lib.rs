//! **fractor-core**: geometry primitives shared by the fractor crates.
//!
//! Points, half-open ranges, compass directions, spans and freeform
//! regions ("blobs"). Everything here is plain data with value semantics.

pub mod geom;
pub mod region;

pub use geom::{Direction, Point, Range, Span};
pub use region::Blob;
