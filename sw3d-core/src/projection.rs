//! Perspective projection: matrix construction and point projection.

use nalgebra::{Matrix4, Point3, RowVector4};

/// Build a perspective projection matrix for row-vector multiplication.
///
/// `aspect` corrects x for non-square viewports (height / width); pass 1.0
/// for none. Points at camera-space z = -near project to depth 0 and points
/// at z = -far to depth 1.
pub fn perspective_matrix(fov_deg: f32, near: f32, far: f32, aspect: f32) -> Matrix4<f32> {
    let s = 1.0 / (fov_deg * 0.5).to_radians().tan();
    let q = -far / (far - near);
    Matrix4::new(
        aspect * s, 0.0, 0.0, 0.0, //
        0.0, s, 0.0, 0.0, //
        0.0, 0.0, q, -1.0, //
        0.0, 0.0, near * q, 0.0,
    )
}

/// Project a camera-space point into normalized device coordinates.
///
/// The point multiplies the matrix as a row vector, taking `w` from column 3
/// of every row, and is perspective-divided unless `w` is exactly 0 or 1
/// (a divide by zero, or a no-op).
pub fn project(matrix: &Matrix4<f32>, point: &Point3<f32>) -> Point3<f32> {
    let h = RowVector4::new(point.x, point.y, point.z, 1.0) * matrix;
    let w = h[3];
    if w != 0.0 && w != 1.0 {
        Point3::new(h[0] / w, h[1] / w, h[2] / w)
    } else {
        Point3::new(h[0], h[1], h[2])
    }
}
