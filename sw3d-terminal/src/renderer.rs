//! Cell-buffer rasterizer: renders the camera's draw commands into a grid of
//! colored glyphs.

use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use std::io::Write;
use sw3d_core::{Color, Rasterizer};

/// Glyphs by fill luminance (darkest to lightest).
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

const LINE_GLYPH: char = '#';
const POINT_GLYPH: char = 'o';

#[derive(Clone, Copy)]
struct Cell {
    glyph: char,
    color: TermColor,
}

const EMPTY: Cell = Cell {
    glyph: ' ',
    color: TermColor::Reset,
};

/// A character-cell render target implementing the core's rasterizer
/// contract. Later writes overwrite earlier ones, which is exactly what the
/// camera's back-to-front draw order relies on.
pub struct CellRasterizer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CellRasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![EMPTY; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    fn glyph_at(&self, x: usize, y: usize) -> char {
        self.cells[y * self.width + x].glyph
    }

    fn plot(&mut self, x: i32, y: i32, glyph: char, color: TermColor) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.cells[y as usize * self.width + x as usize] = Cell { glyph, color };
    }

    /// Barycentric coverage fill of a single triangle.
    fn fill_triangle(
        &mut self,
        v0: Point2<f32>,
        v1: Point2<f32>,
        v2: Point2<f32>,
        glyph: char,
        color: TermColor,
    ) {
        let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i32).max(0);
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i32).max(0);
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.plot(x, y, glyph, color);
                    }
                }
            }
        }
    }

    /// Queue the whole grid to the writer. The caller positions the cursor
    /// and flushes.
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                writer.queue(SetForegroundColor(cell.color))?;
                writer.queue(Print(cell.glyph))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Rasterizer for CellRasterizer {
    fn fill_polygon(&mut self, points: &[Point2<f32>], color: Color) {
        let glyph = fill_glyph(color);
        let term_color = term_color(color);
        // Clipped faces stay convex, so a fan from the first vertex covers
        // the polygon exactly.
        for i in 1..points.len().saturating_sub(1) {
            self.fill_triangle(points[0], points[i], points[i + 1], glyph, term_color);
        }
    }

    fn draw_line(&mut self, from: Point2<f32>, to: Point2<f32>, color: Color) {
        // Bresenham over cells.
        let term_color = term_color(color);
        let (mut x0, mut y0) = (from.x.round() as i32, from.y.round() as i32);
        let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, LINE_GLYPH, term_color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn draw_point(&mut self, point: Point2<f32>, color: Color, radius: f32) {
        let term_color = term_color(color);
        let r = radius.max(0.0);
        let reach = r.ceil() as i32;
        let (cx, cy) = (point.x.round() as i32, point.y.round() as i32);
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if ((dx * dx + dy * dy) as f32) <= r * r {
                    self.plot(cx + dx, cy + dy, POINT_GLYPH, term_color);
                }
            }
        }
    }
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Pick a ramp glyph by the color's luminance so filled faces keep their
/// shading even on monochrome terminals.
fn fill_glyph(color: Color) -> char {
    let luminance =
        (0.2126 * color.r as f32 + 0.7152 * color.g as f32 + 0.0722 * color.b as f32) / 255.0;
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (luminance * last as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(last)]
}

/// Barycentric coordinates of `p` in the triangle, or `None` when the
/// triangle is degenerate. The signed denominator makes the result
/// winding-independent.
fn barycentric(
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    p: Point2<f32>,
) -> Option<(f32, f32, f32)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);
    if denom.abs() < 1e-6 {
        return None;
    }
    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;
    Some((w0, w1, w2))
}
