pub mod intersect;
pub mod modification;
pub mod offset;

pub use intersect::{intersect, intersect_extended, Intersection, IntersectionPoint, IntersectionPoints};
pub use modification::{Extend, Fillet, FilletResult, Trim};
pub use offset::{CurveOffset2D, PolylineOffset2D, Side};
