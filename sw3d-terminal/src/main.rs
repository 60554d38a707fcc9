//! SW3D terminal demo scene.
//!
//! A spinning cube, a tall box, and a ground plane, rendered with the
//! painter's-algorithm pipeline. Pass an OBJ file path to drop an imported
//! mesh into the scene.
//!
//! Controls:
//!   - WASD: Move, E/Q: Up/Down
//!   - Arrow Keys: Look
//!   - M: Cycle draw layers, L: Cycle light modes
//!   - Esc: Quit

use nalgebra::{Point3, Vector3};
use std::env;
use std::fs;
use std::io;
use sw3d_core::{obj, Camera, Color, Mesh};
use sw3d_terminal::TerminalApp;

fn main() -> io::Result<()> {
    env_logger::init();

    let mut cube = Mesh::cuboid(2.0, 2.0, 2.0);
    cube.position = Vector3::new(-10.0, 1.0, 0.0);
    cube.color = Color::rgb(0, 0, 128);

    let mut tower = Mesh::cuboid(2.0, 5.0, 2.0);
    tower.position = Vector3::new(10.0, 2.5, 0.0);
    tower.color = Color::rgb(198, 0, 64);

    let mut ground = Mesh::quad(100.0, 100.0);
    ground.rotation = Vector3::new(90.0, 0.0, 0.0);
    ground.color = Color::rgb(0, 128, 0);

    let mut meshes = vec![cube, tower, ground];

    if let Some(path) = env::args().nth(1) {
        let text = fs::read_to_string(&path)?;
        let mut imported = obj::parse_obj(&text)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        imported.position = Vector3::new(0.0, 1.0, 0.0);
        log::info!(
            "loaded {}: {} vertices, {} faces",
            path,
            imported.vertices().len(),
            imported.faces().len()
        );
        meshes.push(imported);
    }

    let camera = Camera::new(
        90.0,
        0.1,
        1000.0,
        Point3::new(0.0, 1.0, 10.0),
        Vector3::zeros(),
    );

    let mut app = TerminalApp::new(meshes, camera)?;
    app.run()
}
