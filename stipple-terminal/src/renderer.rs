//! Point splatting rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use std::io::Write;

use crate::projection::Camera;

/// Character luminosity ramp, far to near
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Splat {
    glyph: char,
    color: Color,
}

/// Renders colored points into a character grid with a depth buffer
pub struct PointRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    splats: Vec<Option<Splat>>,
}

impl PointRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            splats: vec![None; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.splats.fill(None);
    }

    /// Number of cells holding a point after the last render
    pub fn covered_cells(&self) -> usize {
        self.splats.iter().filter(|s| s.is_some()).count()
    }

    /// Splat every point; the nearest point wins each cell.
    ///
    /// `depth_range` is the `(near, far)` span used to pick glyphs.
    pub fn render_points(
        &mut self,
        positions: &[[f32; 3]],
        colors: &[[f32; 3]],
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        depth_range: (f32, f32),
    ) {
        for (position, color) in positions.iter().zip(colors) {
            let point = Point3::from(*position);
            let Some((x, y, depth)) =
                camera.project_to_screen(&point, model_matrix, self.width as u32, self.height as u32)
            else {
                continue;
            };

            let (col, row) = (x.floor() as usize, y.floor() as usize);
            if col >= self.width || row >= self.height {
                continue;
            }

            let idx = row * self.width + col;
            if depth < self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.splats[idx] = Some(Splat {
                    glyph: glyph_for_depth(depth, depth_range),
                    color: terminal_color(color),
                });
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                match self.splats[y * self.width + x] {
                    Some(splat) => {
                        writer.queue(SetForegroundColor(splat.color))?;
                        writer.queue(Print(splat.glyph))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Denser glyphs for nearer points
fn glyph_for_depth(depth: f32, (near, far): (f32, f32)) -> char {
    let span = (far - near).max(f32::EPSILON);
    let closeness = (1.0 - (depth - near) / span).clamp(0.0, 1.0);
    let index = (closeness * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Point color to 24-bit terminal color; channels above 1 saturate
fn terminal_color(color: &[f32; 3]) -> Color {
    let [r, g, b] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    Color::Rgb { r, g, b }
}
