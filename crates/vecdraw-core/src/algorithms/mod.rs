//! Geometric algorithms applied when tools commit shapes.

pub mod intersection;
pub mod simplify;

pub use intersection::{Intersection, IntersectionFinder, LineIntersectionFinder, LineSplit, split_line_at, split_lines};
pub use simplify::{dedup_points, douglas_peucker, simplify};
