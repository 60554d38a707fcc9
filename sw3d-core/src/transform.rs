//! Axis rotations and the small scalar helpers shared across the pipeline.

use nalgebra::{Rotation3, Vector3};

/// World up direction.
pub const UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);
/// World down direction.
pub const DOWN: Vector3<f32> = Vector3::new(0.0, -1.0, 0.0);
/// World left direction.
pub const LEFT: Vector3<f32> = Vector3::new(-1.0, 0.0, 0.0);
/// World right direction.
pub const RIGHT: Vector3<f32> = Vector3::new(1.0, 0.0, 0.0);
/// Cameras look down negative z.
pub const FORWARD: Vector3<f32> = Vector3::new(0.0, 0.0, -1.0);
/// World back direction.
pub const BACK: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);

/// Rotate a vector around the x axis by `degrees` (right-handed).
pub fn rotate_x(v: Vector3<f32>, degrees: f32) -> Vector3<f32> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), degrees.to_radians()) * v
}

/// Rotate a vector around the y axis by `degrees` (right-handed).
pub fn rotate_y(v: Vector3<f32>, degrees: f32) -> Vector3<f32> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), degrees.to_radians()) * v
}

/// Rotate a vector around the z axis by `degrees` (right-handed).
pub fn rotate_z(v: Vector3<f32>, degrees: f32) -> Vector3<f32> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), degrees.to_radians()) * v
}

/// Rotate by Euler angles in degrees: yaw (y), then pitch (x), then roll (z).
///
/// Meshes and the camera share this order so poses compose consistently.
pub fn rotate_euler(v: Vector3<f32>, angles: Vector3<f32>) -> Vector3<f32> {
    let v = rotate_y(v, angles.y);
    let v = rotate_x(v, angles.x);
    rotate_z(v, angles.z)
}

/// Linearly remap `x` from the range `[a, b]` to `[c, d]`.
///
/// Values outside `[a, b]` extrapolate; callers clamp where it matters.
pub fn map_range(x: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    (x - a) / (b - a) * (d - c) + c
}

/// Normalize a vector, returning the zero vector unchanged.
///
/// The squared-length check precedes the division, so no NaN can escape.
pub fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    if v.norm_squared() == 0.0 {
        v
    } else {
        v.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).norm() < EPS
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let v = Vector3::new(1.5, -2.0, 3.25);
        assert!(close(rotate_euler(v, Vector3::zeros()), v));
    }

    #[test]
    fn test_quarter_turns() {
        assert!(close(rotate_y(FORWARD, 90.0), LEFT));
        assert!(close(rotate_x(UP, 90.0), BACK));
        assert!(close(rotate_z(RIGHT, 90.0), UP));
    }

    #[test]
    fn test_euler_order_is_yaw_pitch_roll() {
        let v = Vector3::new(0.0, 0.0, -1.0);
        let angles = Vector3::new(30.0, 45.0, 0.0);
        let expected = rotate_x(rotate_y(v, angles.y), angles.x);
        assert!(close(rotate_euler(v, angles), expected));
    }

    #[test]
    fn test_map_range() {
        assert!((map_range(0.0, -1.0, 1.0, 0.0, 10.0) - 5.0).abs() < EPS);
        assert!((map_range(-1.0, -1.0, 0.0, 1.0, 0.0) - 1.0).abs() < EPS);
        assert!((map_range(0.0, -1.0, 0.0, 1.0, 0.0)).abs() < EPS);
        // Out-of-range inputs extrapolate.
        assert!((map_range(1.0, -1.0, 0.0, 1.0, 0.0) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_normalize_or_zero() {
        let v = Vector3::new(3.0, 4.0, 0.0);
        let n = normalize_or_zero(v);
        assert!((n.norm() - 1.0).abs() < EPS);
        assert!(close(n * v.norm(), v));
        assert_eq!(normalize_or_zero(Vector3::zeros()), Vector3::zeros());
    }
}
