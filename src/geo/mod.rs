pub mod coord;
pub mod line;

pub use coord::{EmbeddedPoint, GeoCoordinate};
pub use line::Line;
