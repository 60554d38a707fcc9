//! The contract between the pipeline and a pixel (or cell) backend.

use nalgebra::Point2;

use crate::color::Color;

/// Screen-space drawing primitives the camera emits.
///
/// Coordinates arrive already mapped from normalized device coordinates to
/// the viewport (x grows right, y grows down). Implementations own every
/// pixel-level write; the core never touches a buffer itself.
pub trait Rasterizer {
    /// Fill a polygon given as an ordered vertex loop.
    fn fill_polygon(&mut self, points: &[Point2<f32>], color: Color);

    /// Draw a line segment.
    fn draw_line(&mut self, from: Point2<f32>, to: Point2<f32>, color: Color);

    /// Draw a point marker of the given radius.
    fn draw_point(&mut self, point: Point2<f32>, color: Color, radius: f32);
}
