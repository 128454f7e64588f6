pub mod color;
pub mod geometry;

pub use color::Color;
pub use geometry::{BoxConstraints, Point, Rect, Size};
