//! Camera: the per-frame world-to-screen pipeline.
//!
//! `render` turns one mesh into drawable faces (camera space, near/far clip,
//! backface cull, shade, project); `draw` depth-sorts the collected faces and
//! emits painter's-algorithm ordered commands to a [`Rasterizer`]. No pixels
//! are written here.

use nalgebra::{Matrix4, Point2, Point3, Vector3};

use crate::clip::{clip_polygon, ClipBounds};
use crate::color::Color;
use crate::geometry::Mesh;
use crate::projection::{perspective_matrix, project};
use crate::raster::Rasterizer;
use crate::transform::{map_range, rotate_euler, rotate_x, rotate_y, FORWARD};

/// Pitch is kept inside +-80 degrees to stay clear of the poles.
const PITCH_LIMIT: f32 = 80.0;

const EDGE_COLOR: Color = Color::WHITE;
const MARKER_COLOR: Color = Color::BLUE;
const MARKER_RADIUS: f32 = 2.0;

/// Independently combinable render layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawMode(u8);

impl DrawMode {
    pub const NONE: DrawMode = DrawMode(0);
    pub const VERTICES: DrawMode = DrawMode(1);
    pub const EDGES: DrawMode = DrawMode(2);
    pub const FACES: DrawMode = DrawMode(4);
    pub const ALL: DrawMode = DrawMode(7);

    /// Reconstruct a mode from its raw bits; unknown bits are discarded.
    pub fn from_bits(bits: u8) -> Self {
        DrawMode(bits & Self::ALL.0)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, layer: DrawMode) -> bool {
        self.0 & layer.0 == layer.0
    }
}

impl std::ops::BitOr for DrawMode {
    type Output = DrawMode;

    fn bitor(self, rhs: DrawMode) -> DrawMode {
        DrawMode(self.0 | rhs.0)
    }
}

/// How face colors are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightMode {
    /// The mesh's base color, unlit.
    Flat,
    /// Directional Lambertian shade mixed with the mesh's base color.
    Shaded,
    /// The per-face random color assigned at mesh construction.
    FaceUnique,
}

/// A directional light, fixed for the lifetime of the camera.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    pub direction: Vector3<f32>,
    pub color: Color,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            direction: Vector3::new(-1.0, -1.0, -0.5).normalize(),
            color: Color::rgb(255, 200, 200),
        }
    }
}

/// A clipped, projected face ready to draw.
#[derive(Debug, Clone)]
pub struct DrawFace {
    /// Polygon in normalized device coordinates.
    pub polygon: Vec<Point3<f32>>,
    /// Shade color resolved at render time.
    pub color: Color,
    /// Mean camera-space z of the clipped polygon; sorting ascending yields
    /// back-to-front order.
    pub depth: f32,
}

/// Viewpoint plus the per-frame buffers of collected drawables.
pub struct Camera {
    fov: f32,
    near: f32,
    far: f32,
    p_mat: Matrix4<f32>,
    /// World-space position, freely mutable between frames.
    pub position: Point3<f32>,
    rotation: Vector3<f32>,
    drawmode: DrawMode,
    lightmode: LightMode,
    light: Light,
    viewport: Option<(u32, u32)>,
    points: Vec<Point3<f32>>,
    faces: Vec<DrawFace>,
}

impl Camera {
    /// A camera with the given intrinsics and pose. The projection matrix is
    /// built immediately; set a viewport before drawing.
    pub fn new(
        fov: f32,
        near: f32,
        far: f32,
        position: Point3<f32>,
        rotation: Vector3<f32>,
    ) -> Self {
        Self {
            fov,
            near,
            far,
            p_mat: perspective_matrix(fov, near, far, 1.0),
            position,
            rotation: clamp_pitch(rotation),
            drawmode: DrawMode::ALL,
            lightmode: LightMode::Shaded,
            light: Light::default(),
            viewport: None,
            points: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Replace the default light.
    pub fn with_light(mut self, light: Light) -> Self {
        self.light = light;
        self
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
        self.rebuild_projection();
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn set_near(&mut self, near: f32) {
        self.near = near;
        self.rebuild_projection();
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_far(&mut self, far: f32) {
        self.far = far;
        self.rebuild_projection();
    }

    /// Set the output dimensions; a non-square viewport folds its aspect
    /// ratio into the projection matrix.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Some((width, height));
        self.rebuild_projection();
    }

    fn rebuild_projection(&mut self) {
        let aspect = match self.viewport {
            Some((w, h)) if w != h => h as f32 / w as f32,
            _ => 1.0,
        };
        self.p_mat = perspective_matrix(self.fov, self.near, self.far, aspect);
    }

    pub fn drawmode(&self) -> DrawMode {
        self.drawmode
    }

    pub fn set_drawmode(&mut self, drawmode: DrawMode) {
        self.drawmode = drawmode;
    }

    pub fn lightmode(&self) -> LightMode {
        self.lightmode
    }

    pub fn set_lightmode(&mut self, lightmode: LightMode) {
        self.lightmode = lightmode;
    }

    /// Euler rotation in degrees.
    pub fn rotation(&self) -> Vector3<f32> {
        self.rotation
    }

    /// Set the rotation, clamping pitch to +-80 degrees.
    pub fn set_rotation(&mut self, rotation: Vector3<f32>) {
        self.rotation = clamp_pitch(rotation);
    }

    /// Add a rotation delta, clamping pitch.
    pub fn rotate_by(&mut self, delta: Vector3<f32>) {
        self.set_rotation(self.rotation + delta);
    }

    /// The view direction in world space.
    pub fn forward(&self) -> Vector3<f32> {
        rotate_y(rotate_x(FORWARD, -self.rotation.x), -self.rotation.y)
    }

    /// Drop everything collected for the current frame. Call at frame start.
    pub fn clear(&mut self) {
        self.points.clear();
        self.faces.clear();
    }

    /// Faces collected so far this frame, in render (not draw) order.
    pub fn faces(&self) -> &[DrawFace] {
        &self.faces
    }

    /// Projected vertex markers collected so far this frame.
    pub fn points(&self) -> &[Point3<f32>] {
        &self.points
    }

    fn to_camera_space(&self, point: Point3<f32>) -> Point3<f32> {
        Point3::from(rotate_euler(point - self.position, self.rotation))
    }

    fn face_color(&self, mesh: &Mesh, index: usize) -> Color {
        match self.lightmode {
            LightMode::Flat => mesh.color,
            LightMode::Shaded => {
                let normal = mesh.face_normal(index).unwrap_or_else(Vector3::zeros);
                let facing = self.light.direction.dot(&normal);
                let intensity = map_range(facing, -1.0, 0.0, 1.0, 0.0).clamp(0.0, 1.0);
                self.light.color.scaled(intensity).mixed(mesh.color)
            }
            LightMode::FaceUnique => mesh.face_color(index).unwrap_or(mesh.color),
        }
    }

    /// Collect one mesh's visible faces and vertex markers into the frame
    /// buffers.
    pub fn render(&mut self, mesh: &Mesh) {
        let camera_space: Vec<Point3<f32>> = mesh
            .world_vertices()
            .into_iter()
            .map(|v| self.to_camera_space(v))
            .collect();

        for vertex in &camera_space {
            let projected = project(&self.p_mat, vertex);
            if (0.0..=1.0).contains(&projected.z)
                && (-1.0..=1.0).contains(&projected.x)
                && (-1.0..=1.0).contains(&projected.y)
            {
                self.points.push(projected);
            }
        }

        let bounds = ClipBounds::z_range(-self.far, -self.near);
        for (index, face) in mesh.faces().iter().enumerate() {
            let triangle = vec![
                camera_space[face[0]],
                camera_space[face[1]],
                camera_space[face[2]],
            ];
            let clipped = clip_polygon(triangle, &bounds);
            if clipped.is_empty() {
                continue;
            }
            let depth = clipped.iter().map(|p| p.z).sum::<f32>() / clipped.len() as f32;
            // Cull on the camera-space polygon, before perspective
            // distortion skews the winding.
            if backfacing(&clipped) {
                continue;
            }
            let polygon = clipped.iter().map(|p| project(&self.p_mat, p)).collect();
            let color = self.face_color(mesh, index);
            self.faces.push(DrawFace {
                polygon,
                color,
                depth,
            });
        }
    }

    /// Render every mesh in the slice.
    pub fn render_multi(&mut self, meshes: &[Mesh]) {
        for mesh in meshes {
            self.render(mesh);
        }
    }

    /// Depth-sort the collected faces and emit them, farthest first, to the
    /// rasterizer. Does nothing until a viewport is set.
    pub fn draw<R: Rasterizer>(&mut self, raster: &mut R) {
        let Some((width, height)) = self.viewport else {
            return;
        };
        let (width, height) = (width as f32, height as f32);
        let to_screen = |p: &Point3<f32>| {
            Point2::new(
                map_range(p.x, -1.0, 1.0, 0.0, width),
                map_range(p.y, 1.0, -1.0, 0.0, height),
            )
        };

        self.faces.sort_by(|a, b| a.depth.total_cmp(&b.depth));

        for face in &self.faces {
            let points: Vec<Point2<f32>> = face.polygon.iter().map(to_screen).collect();
            if self.drawmode.contains(DrawMode::FACES) {
                raster.fill_polygon(&points, face.color);
            }
            if self.drawmode.contains(DrawMode::EDGES) {
                for i in 0..points.len() {
                    let from = points[(i + points.len() - 1) % points.len()];
                    raster.draw_line(from, points[i], EDGE_COLOR);
                }
            }
        }

        if self.drawmode.contains(DrawMode::VERTICES) {
            for point in &self.points {
                raster.draw_point(to_screen(point), MARKER_COLOR, MARKER_RADIUS);
            }
        }
    }
}

fn clamp_pitch(mut rotation: Vector3<f32>) -> Vector3<f32> {
    rotation.x = rotation.x.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    rotation
}

/// Winding normal test against the view axis: a positive dot product with
/// forward means the face points away. A zero-area polygon gives a zero
/// normal, a dot of zero, and stays front-facing by default.
fn backfacing(polygon: &[Point3<f32>]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let normal = (polygon[1] - polygon[0]).cross(&(polygon[2] - polygon[1]));
    normal.dot(&FORWARD) > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    /// Records every rasterizer call for inspection.
    #[derive(Default)]
    struct Recorder {
        polygons: Vec<(Vec<Point2<f32>>, Color)>,
        lines: Vec<(Point2<f32>, Point2<f32>, Color)>,
        points: Vec<(Point2<f32>, Color, f32)>,
    }

    impl Rasterizer for Recorder {
        fn fill_polygon(&mut self, points: &[Point2<f32>], color: Color) {
            self.polygons.push((points.to_vec(), color));
        }

        fn draw_line(&mut self, from: Point2<f32>, to: Point2<f32>, color: Color) {
            self.lines.push((from, to, color));
        }

        fn draw_point(&mut self, point: Point2<f32>, color: Color, radius: f32) {
            self.points.push((point, color, radius));
        }
    }

    fn test_camera() -> Camera {
        Camera::new(
            90.0,
            0.1,
            1000.0,
            Point3::new(0.0, 0.0, 10.0),
            Vector3::zeros(),
        )
    }

    #[test]
    fn test_backface_culling_flips_with_winding() {
        let mut camera = test_camera();
        // Wound so the normal points toward the camera.
        let front = Mesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        camera.render(&front);
        assert_eq!(camera.faces().len(), 1);

        // Reversing the winding faces it away; it must be culled.
        let back = Mesh::new(front.vertices().to_vec(), vec![[0, 2, 1]]);
        camera.clear();
        camera.render(&back);
        assert!(camera.faces().is_empty());
    }

    #[test]
    fn test_cube_scene_end_to_end() {
        let mut camera = test_camera();
        let cube = Mesh::cuboid(2.0, 2.0, 2.0);
        camera.render(&cube);

        // The two -z faces point away from the camera and are culled;
        // edge-on side faces (dot exactly zero) survive.
        assert_eq!(camera.faces().len(), 10);

        let mut recorder = Recorder::default();
        camera.set_viewport(100, 100);
        camera.set_drawmode(DrawMode::FACES);
        camera.draw(&mut recorder);
        assert_eq!(recorder.polygons.len(), 10);

        // Painter's algorithm: the nearest faces (the +z pair, camera-space
        // z = -9) are drawn last, on top of everything else. The farthest
        // survivors are side triangles with two corners on the far edge,
        // mean z = (-9 - 11 - 11) / 3.
        let depths: Vec<f32> = camera.faces().iter().map(|f| f.depth).collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
        assert!((depths[depths.len() - 1] + 9.0).abs() < EPS);
        assert!((depths[0] + 31.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_faces_behind_camera_clipped_out() {
        let mut camera = test_camera();
        let mut cube = Mesh::cuboid(2.0, 2.0, 2.0);
        // Move the cube behind the camera: everything clips away.
        cube.position = Vector3::new(0.0, 0.0, 20.0);
        camera.render(&cube);
        assert!(camera.faces().is_empty());
    }

    #[test]
    fn test_straddling_face_is_clipped_not_dropped() {
        let mut camera = test_camera();
        camera.set_far(15.0);
        // A triangle reaching past the far plane keeps its near part.
        let mesh = Mesh::new(
            vec![
                Point3::new(0.0, 0.0, 5.0),
                Point3::new(1.0, 0.0, 5.0),
                Point3::new(0.5, 0.0, -20.0),
            ],
            vec![[0, 1, 2]],
        );
        camera.render(&mesh);
        assert_eq!(camera.faces().len(), 1);
        let face = &camera.faces()[0];
        // Clipping a triangle against one plane yields four vertices here.
        assert_eq!(face.polygon.len(), 4);
    }

    #[test]
    fn test_flat_lighting_uses_mesh_color() {
        let mut camera = test_camera();
        camera.set_lightmode(LightMode::Flat);
        let mut mesh = Mesh::cuboid(2.0, 2.0, 2.0);
        mesh.color = Color::rgb(10, 20, 30);
        camera.render(&mesh);
        assert!(camera
            .faces()
            .iter()
            .all(|f| f.color == Color::rgb(10, 20, 30)));
    }

    #[test]
    fn test_face_unique_lighting_is_stable_per_mesh() {
        let mut camera = test_camera();
        camera.set_lightmode(LightMode::FaceUnique);
        let mesh = Mesh::cuboid(2.0, 2.0, 2.0);
        camera.render(&mesh);
        camera.clear();
        camera.render(&mesh);
        // Same mesh, same frame-to-frame colors.
        let first: Vec<Color> = camera.faces().iter().map(|f| f.color).collect();
        camera.clear();
        camera.render(&mesh);
        let second: Vec<Color> = camera.faces().iter().map(|f| f.color).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_shaded_lighting_mixes_light_and_base() {
        let mut camera = test_camera().with_light(Light {
            direction: Vector3::new(0.0, 0.0, -1.0),
            color: Color::rgb(200, 200, 200),
        });
        camera.set_lightmode(LightMode::Shaded);
        // Wound so the +z normal faces the camera and is exactly
        // anti-parallel to the light: full intensity.
        let mut mesh = Mesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        mesh.color = Color::rgb(0, 0, 0);
        camera.render(&mesh);
        // The shade is the light color averaged with the black base.
        assert_eq!(camera.faces().len(), 1);
        assert_eq!(camera.faces()[0].color, Color::rgb(100, 100, 100));
    }

    #[test]
    fn test_draw_modes_toggle_layers() {
        let mut camera = test_camera();
        camera.set_viewport(100, 100);
        let cube = Mesh::cuboid(2.0, 2.0, 2.0);
        camera.render(&cube);

        let mut faces_only = Recorder::default();
        camera.set_drawmode(DrawMode::FACES);
        camera.draw(&mut faces_only);
        assert!(!faces_only.polygons.is_empty());
        assert!(faces_only.lines.is_empty());
        assert!(faces_only.points.is_empty());

        let mut edges_and_vertices = Recorder::default();
        camera.set_drawmode(DrawMode::EDGES | DrawMode::VERTICES);
        camera.draw(&mut edges_and_vertices);
        assert!(edges_and_vertices.polygons.is_empty());
        assert!(!edges_and_vertices.lines.is_empty());
        assert!(!edges_and_vertices.points.is_empty());
    }

    #[test]
    fn test_draw_without_viewport_is_noop() {
        let mut camera = test_camera();
        camera.render(&Mesh::cuboid(2.0, 2.0, 2.0));
        let mut recorder = Recorder::default();
        camera.draw(&mut recorder);
        assert!(recorder.polygons.is_empty());
        assert!(recorder.lines.is_empty());
        assert!(recorder.points.is_empty());
    }

    #[test]
    fn test_ndc_to_screen_mapping() {
        let mut camera = test_camera();
        camera.set_viewport(200, 100);
        camera.set_drawmode(DrawMode::FACES);
        camera.set_lightmode(LightMode::Flat);
        // A unit cube dead ahead projects to a small cluster around the
        // viewport center, with y flipped and x squeezed by the 1:2 aspect.
        let cube = Mesh::cuboid(2.0, 2.0, 2.0);
        camera.render(&cube);
        let mut recorder = Recorder::default();
        camera.draw(&mut recorder);
        assert!(!recorder.polygons.is_empty());
        for (points, _) in &recorder.polygons {
            for p in points {
                assert!(p.x > 90.0 && p.x < 110.0);
                assert!(p.y > 40.0 && p.y < 60.0);
            }
        }
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = test_camera();
        camera.set_rotation(Vector3::new(120.0, 10.0, 0.0));
        assert!((camera.rotation().x - 80.0).abs() < EPS);
        camera.rotate_by(Vector3::new(-300.0, 0.0, 0.0));
        assert!((camera.rotation().x + 80.0).abs() < EPS);
        assert!((camera.rotation().y - 10.0).abs() < EPS);
    }

    #[test]
    fn test_forward_follows_yaw() {
        let mut camera = test_camera();
        camera.set_rotation(Vector3::new(0.0, -90.0, 0.0));
        let forward = camera.forward();
        assert!((forward - Vector3::new(-1.0, 0.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn test_clear_empties_frame_buffers() {
        let mut camera = test_camera();
        camera.render(&Mesh::cuboid(2.0, 2.0, 2.0));
        assert!(!camera.faces().is_empty());
        camera.clear();
        assert!(camera.faces().is_empty());
        assert!(camera.points().is_empty());
    }

    #[test]
    fn test_vertex_markers_collected_in_bounds() {
        let mut camera = test_camera();
        let cube = Mesh::cuboid(2.0, 2.0, 2.0);
        camera.render(&cube);
        // All eight corners are comfortably inside the frustum.
        assert_eq!(camera.points().len(), 8);
        for point in camera.points() {
            assert!((-1.0..=1.0).contains(&point.x));
            assert!((-1.0..=1.0).contains(&point.y));
            assert!((0.0..=1.0).contains(&point.z));
        }
    }
}
