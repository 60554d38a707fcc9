//! Terminal frontend: frame orchestration and input for the SW3D pipeline.

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal,
};
use nalgebra::Vector3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use sw3d_core::{transform, Camera, DrawMode, LightMode, Mesh};

pub mod renderer;

pub use renderer::CellRasterizer;

const MOVE_SPEED: f32 = 3.0;
const LOOK_SPEED: f32 = 30.0;

/// Per-frame mesh rotation in degrees, applied to the first mesh for the
/// classic spinning-demo effect.
const SPIN: Vector3<f32> = Vector3::new(40.0, 25.0, 0.0);

/// Owns the mesh list and the camera, and steps frames: input, update,
/// render, draw.
pub struct TerminalApp {
    meshes: Vec<Mesh>,
    camera: Camera,
    rasterizer: CellRasterizer,
    running: bool,
    spin: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(meshes: Vec<Mesh>, camera: Camera) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let mut camera = camera;
        camera.set_viewport(width as u32, height as u32);

        Ok(Self {
            meshes,
            camera,
            rasterizer: CellRasterizer::new(width as usize, height as usize),
            running: true,
            spin: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    /// Leave the first mesh alone instead of spinning it.
    pub fn without_spin(mut self) -> Self {
        self.spin = false;
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        let mut previous = Instant::now();

        while self.running {
            let frame_start = Instant::now();
            let delta = (frame_start - previous).as_secs_f32();
            previous = frame_start;

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?, delta.max(1.0 / 30.0))?;
            }

            // Update
            self.update(delta);

            // Render
            self.render_frame()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event, delta: f32) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code, modifiers, ..
            }) => self.handle_key(code, modifiers, delta),
            Event::Resize(width, height) => {
                self.camera.set_viewport(width as u32, height as u32);
                self.rasterizer.resize(width as usize, height as usize);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, delta: f32) {
        let step = MOVE_SPEED * delta;
        let yaw = self.camera.rotation().y;
        match code {
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            // Movement is yaw-relative so "forward" follows the view.
            KeyCode::Char('w') => {
                self.camera.position += transform::rotate_y(transform::FORWARD, -yaw) * step;
            }
            KeyCode::Char('s') => {
                self.camera.position += transform::rotate_y(transform::BACK, -yaw) * step;
            }
            KeyCode::Char('a') => {
                self.camera.position += transform::rotate_y(transform::LEFT, -yaw) * step;
            }
            KeyCode::Char('d') => {
                self.camera.position += transform::rotate_y(transform::RIGHT, -yaw) * step;
            }
            KeyCode::Char('e') => self.camera.position += transform::UP * step,
            KeyCode::Char('q') => self.camera.position += transform::DOWN * step,
            KeyCode::Left => self.camera.rotate_by(Vector3::new(0.0, -LOOK_SPEED * delta, 0.0)),
            KeyCode::Right => self.camera.rotate_by(Vector3::new(0.0, LOOK_SPEED * delta, 0.0)),
            KeyCode::Up => self.camera.rotate_by(Vector3::new(LOOK_SPEED * delta, 0.0, 0.0)),
            KeyCode::Down => self.camera.rotate_by(Vector3::new(-LOOK_SPEED * delta, 0.0, 0.0)),
            KeyCode::Char('m') => {
                let next = DrawMode::from_bits(self.camera.drawmode().bits().wrapping_add(1));
                self.camera.set_drawmode(next);
            }
            KeyCode::Char('l') => {
                let next = match self.camera.lightmode() {
                    LightMode::Flat => LightMode::Shaded,
                    LightMode::Shaded => LightMode::FaceUnique,
                    LightMode::FaceUnique => LightMode::Flat,
                };
                self.camera.set_lightmode(next);
            }
            _ => {}
        }
    }

    fn update(&mut self, delta: f32) {
        if self.spin {
            if let Some(mesh) = self.meshes.first_mut() {
                mesh.rotation += SPIN * delta;
            }
        }
    }

    fn render_frame(&mut self) -> io::Result<()> {
        self.camera.clear();
        self.camera.render_multi(&self.meshes);

        self.rasterizer.clear();
        self.camera.draw(&mut self.rasterizer);

        let mut stdout = stdout();
        self.rasterizer.present(&mut stdout)?;

        // Status overlay
        let position = self.camera.position;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(TermColor::Yellow),
            Print(format!(
                "SW3D | FPS: {:.1} | pos ({:.1}, {:.1}, {:.1}) | mode {} | {:?} | \
                 WASD=Move Arrows=Look E/Q=Up/Down M=Layers L=Light Esc=Quit",
                self.fps,
                position.x,
                position.y,
                position.z,
                self.camera.drawmode().bits(),
                self.camera.lightmode(),
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
