//! Mesh data: local-space vertices, triangular faces, colors, and a pose.

use nalgebra::{Point3, Vector3};
use rand::Rng;

use crate::color::Color;
use crate::transform::{normalize_or_zero, rotate_euler};

/// A triangle mesh with a mutable pose.
///
/// Vertex and face data are fixed at construction; only the pose (position,
/// rotation, scale) and base color change between frames. Every face index is
/// guaranteed to be in bounds of the vertex list.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Point3<f32>>,
    faces: Vec<[usize; 3]>,
    face_colors: Vec<Color>,
    /// World-space translation.
    pub position: Vector3<f32>,
    /// Euler angles in degrees, applied yaw (y), pitch (x), roll (z).
    pub rotation: Vector3<f32>,
    /// Component-wise scale, applied before rotation.
    pub scale: Vector3<f32>,
    /// Base color used by the flat and shaded light modes.
    pub color: Color,
}

impl Mesh {
    /// Build a mesh from raw vertex and face data with an identity pose.
    ///
    /// Each face also receives a random color of its own, used by the
    /// face-unique light mode; the table belongs to this instance.
    pub fn new(vertices: Vec<Point3<f32>>, faces: Vec<[usize; 3]>) -> Self {
        debug_assert!(
            faces.iter().flatten().all(|&i| i < vertices.len()),
            "face index out of bounds"
        );
        let mut rng = rand::thread_rng();
        let face_colors = (0..faces.len())
            .map(|_| Color::rgb(rng.gen(), rng.gen(), rng.gen()))
            .collect();
        Self {
            vertices,
            faces,
            face_colors,
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            color: Color::WHITE,
        }
    }

    /// An axis-aligned box centered on the origin.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let w = width / 2.0;
        let h = height / 2.0;
        let d = depth / 2.0;
        let vertices = vec![
            Point3::new(w, h, d),
            Point3::new(-w, h, d),
            Point3::new(-w, -h, d),
            Point3::new(w, -h, d),
            Point3::new(w, h, -d),
            Point3::new(-w, h, -d),
            Point3::new(-w, -h, -d),
            Point3::new(w, -h, -d),
        ];
        let faces = vec![
            [0, 1, 2],
            [0, 2, 3],
            [5, 7, 6],
            [5, 4, 7],
            [3, 7, 4],
            [4, 0, 3],
            [6, 2, 1],
            [1, 5, 6],
            [1, 0, 4],
            [4, 5, 1],
            [6, 7, 3],
            [3, 2, 6],
        ];
        Self::new(vertices, faces)
    }

    /// A single triangle in the xy plane.
    pub fn triangle(width: f32, height: f32) -> Self {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(width, 0.0, 0.0),
            Point3::new(width / 2.0, height, 0.0),
        ];
        Self::new(vertices, vec![[0, 1, 2]])
    }

    /// A quad in the xy plane, centered on the origin, as two triangles.
    pub fn quad(width: f32, height: f32) -> Self {
        let w = width / 2.0;
        let h = height / 2.0;
        let vertices = vec![
            Point3::new(-w, h, 0.0),
            Point3::new(w, h, 0.0),
            Point3::new(w, -h, 0.0),
            Point3::new(-w, -h, 0.0),
        ];
        Self::new(vertices, vec![[0, 1, 2], [2, 3, 0]])
    }

    /// Local-space vertex positions.
    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    /// Triangular faces as vertex index triples.
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// The face-unique color assigned to `index` at construction.
    pub fn face_color(&self, index: usize) -> Option<Color> {
        self.face_colors.get(index).copied()
    }

    /// Vertex positions with the pose applied: scale, then rotation, then
    /// translation.
    pub fn world_vertices(&self) -> Vec<Point3<f32>> {
        self.vertices
            .iter()
            .map(|v| {
                let scaled = v.coords.component_mul(&self.scale);
                Point3::from(rotate_euler(scaled, self.rotation) + self.position)
            })
            .collect()
    }

    /// Unit normal of a face under the mesh's current rotation.
    ///
    /// Returns `None` for an out-of-bounds index. A degenerate (zero-area)
    /// face yields the zero vector; downstream culling treats that as
    /// front-facing.
    pub fn face_normal(&self, index: usize) -> Option<Vector3<f32>> {
        let face = self.faces.get(index)?;
        let [a, b, c] = face.map(|i| rotate_euler(self.vertices[i].coords, self.rotation));
        let ab = b - a;
        let bc = c - b;
        Some(normalize_or_zero(ab.cross(&bc)))
    }
}
