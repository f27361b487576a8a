mod coloring;
mod cycle;
mod edge;
pub(crate) mod point;
mod point_set;
mod segment;

pub use coloring::*;
pub use cycle::*;
pub use edge::*;
pub use point::{Point, PointId};
pub use point_set::*;
pub use segment::*;
