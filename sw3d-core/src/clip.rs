//! Sutherland-Hodgman polygon clipping against axis-aligned planes.
//!
//! A polygon is clipped one plane at a time: each pass walks consecutive
//! vertex pairs (wrapping last to first), keeps inside vertices, and inserts
//! the edge/plane intersection wherever an edge crosses the plane. Clipping a
//! convex polygon against any number of axis-aligned planes stays convex.

use nalgebra::Point3;

/// Edges steeper than this along the clip axis count as crossings; anything
/// flatter is treated as parallel to the plane.
const PARALLEL_EPS: f32 = 1e-10;

/// A coordinate axis selecting which component a plane constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn component(self, point: &Point3<f32>) -> f32 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
            Axis::Z => point.z,
        }
    }
}

/// Optional half-space bounds, at most one min and one max per axis.
///
/// Unset bounds are skipped entirely, so a z-only clip (the near/far pass)
/// costs two plane walks and nothing more.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipBounds {
    pub x_min: Option<f32>,
    pub x_max: Option<f32>,
    pub y_min: Option<f32>,
    pub y_max: Option<f32>,
    pub z_min: Option<f32>,
    pub z_max: Option<f32>,
}

impl ClipBounds {
    /// Bounds keeping `min < z < max`, the camera's far/near clip volume.
    pub fn z_range(min: f32, max: f32) -> Self {
        Self {
            z_min: Some(min),
            z_max: Some(max),
            ..Self::default()
        }
    }
}

/// Intersection of the segment `from`-`to` with the plane `axis = edge`,
/// or `None` when the segment is parallel to the plane or the crossing
/// parameter falls outside the segment.
fn intersect(
    from: &Point3<f32>,
    to: &Point3<f32>,
    edge: f32,
    axis: Axis,
) -> Option<Point3<f32>> {
    let delta = to - from;
    let step = match axis {
        Axis::X => delta.x,
        Axis::Y => delta.y,
        Axis::Z => delta.z,
    };
    if step.abs() <= PARALLEL_EPS {
        return None;
    }
    let t = (edge - axis.component(from)) / step;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    let mut point = from + delta * t;
    // Pin the clipped coordinate exactly onto the plane.
    match axis {
        Axis::X => point.x = edge,
        Axis::Y => point.y = edge,
        Axis::Z => point.z = edge,
    }
    Some(point)
}

/// Clip a polygon against a single axis-aligned plane.
///
/// `keep_below` selects the half-space: vertices with `component < edge` are
/// inside when true, `component > edge` when false.
pub fn clip_plane(
    polygon: &[Point3<f32>],
    edge: f32,
    axis: Axis,
    keep_below: bool,
) -> Vec<Point3<f32>> {
    let Some(&last) = polygon.last() else {
        return Vec::new();
    };
    let inside = |point: &Point3<f32>| {
        let c = axis.component(point);
        if keep_below {
            c < edge
        } else {
            c > edge
        }
    };

    let mut clipped = Vec::with_capacity(polygon.len() + 1);
    let mut prev = last;
    let mut prev_inside = inside(&prev);
    for &point in polygon {
        let point_inside = inside(&point);
        match (prev_inside, point_inside) {
            (true, true) => clipped.push(point),
            (true, false) => {
                if let Some(hit) = intersect(&prev, &point, edge, axis) {
                    clipped.push(hit);
                }
            }
            (false, true) => {
                if let Some(hit) = intersect(&prev, &point, edge, axis) {
                    clipped.push(hit);
                }
                clipped.push(point);
            }
            (false, false) => {}
        }
        prev = point;
        prev_inside = point_inside;
    }
    clipped
}

/// Clip a polygon against every active bound, z planes first, then y, then x,
/// minimums before maximums. Short-circuits to empty as soon as a pass
/// consumes the whole polygon.
pub fn clip_polygon(polygon: Vec<Point3<f32>>, bounds: &ClipBounds) -> Vec<Point3<f32>> {
    let stages = [
        (bounds.z_min, Axis::Z, false),
        (bounds.z_max, Axis::Z, true),
        (bounds.y_min, Axis::Y, false),
        (bounds.y_max, Axis::Y, true),
        (bounds.x_min, Axis::X, false),
        (bounds.x_max, Axis::X, true),
    ];

    let mut clipped = polygon;
    for (edge, axis, keep_below) in stages {
        let Some(edge) = edge else { continue };
        if clipped.is_empty() {
            break;
        }
        clipped = clip_plane(&clipped, edge, axis, keep_below);
    }
    clipped
}
