//! Example: load and render an OBJ file in the terminal.
//!
//! Usage: cargo run --example load_obj -- path/to/model.obj

use nalgebra::{Point3, Vector3};
use std::env;
use std::fs;
use std::io;
use sw3d_core::{obj, Camera, Mesh};
use sw3d_terminal::TerminalApp;

fn main() -> io::Result<()> {
    env_logger::init();

    let mesh = match env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path)?;
            obj::parse_obj(&text)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
        }
        None => {
            eprintln!("No OBJ file provided, using default cube...");
            Mesh::cuboid(2.0, 2.0, 2.0)
        }
    };

    let camera = Camera::new(
        90.0,
        0.1,
        1000.0,
        Point3::new(0.0, 0.0, 10.0),
        Vector3::zeros(),
    );

    let mut app = TerminalApp::new(vec![mesh], camera)?;
    app.run()
}
