/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use meshview_core::projection::project;
use meshview_core::{Camera, Mesh, ProjectionMode, RenderParameters, Rgb, ViewBounds};
use nalgebra::Point3;
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_ASPECT: f64 = 2.0;

const VERTEX_MARK: char = '+';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    color: Rgb,
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    mode: ProjectionMode,
    background: Rgb,
    depth_buffer: Vec<f64>,
    cells: Vec<Option<Cell>>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            mode: ProjectionMode::Orthographic,
            background: Rgb::default(),
            depth_buffer: vec![f64::INFINITY; size],
            cells: vec![None; size],
        }
    }

    pub fn with_mode(mut self, mode: ProjectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height).with_mode(self.mode);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.cells.fill(None);
    }

    /// Width over height of the viewport in square units.
    pub fn aspect(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f64 / (self.height as f64 * CELL_ASPECT)
    }

    /// Rasterize `mesh` framed by `bounds` with the given display parameters.
    ///
    /// Faces are depth-tested against each other; the wireframe and vertex
    /// markers are drawn over them.
    pub fn render_mesh(&mut self, mesh: &Mesh, bounds: &ViewBounds, params: &RenderParameters) {
        self.clear();
        self.background = params.background_color;
        if self.width == 0 || self.height == 0 {
            return;
        }

        let camera = Camera::framing(bounds, params.camera, self.aspect()).with_mode(self.mode);
        let view_projection = camera.view_projection();
        let screen: Vec<Option<(f64, f64, f64)>> = mesh
            .vertices()
            .iter()
            .map(|v| project(&view_projection, v, self.width as u32, self.height as u32))
            .collect();

        if params.faces_visible {
            let view = camera.view();
            for triangle in mesh.triangles() {
                let [a, b, c] = triangle.map(|i| screen[i]);
                let (Some(a), Some(b), Some(c)) = (a, b, c) else {
                    continue; // Triangle is clipped
                };
                let corners = mesh.triangle_positions(triangle).map(|p| view * p);
                let Some(brightness) = facing(&corners) else {
                    continue;
                };

                let ramp = (brightness * (LUMINOSITY_RAMP.len() - 1) as f64).round() as usize;
                let cell = Cell {
                    ch: LUMINOSITY_RAMP[ramp.min(LUMINOSITY_RAMP.len() - 1)],
                    color: params.face_color.scaled(0.35 + 0.65 * brightness),
                };
                self.rasterize_triangle([a, b, c], cell);
            }
        }

        if params.wireframe_visible {
            for (a, b) in mesh.edges() {
                if let (Some(a), Some(b)) = (screen[a], screen[b]) {
                    self.draw_line((a.0, a.1), (b.0, b.1), params.wireframe_color);
                }
            }
            for (x, y, _) in screen.iter().flatten() {
                self.plot(*x, *y, Cell {
                    ch: VERTEX_MARK,
                    color: params.vertex_color,
                });
            }
        }
    }

    fn rasterize_triangle(&mut self, coords: [(f64, f64, f64); 3], cell: Cell) {
        let [v0, v1, v2] = coords;

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i64;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i64;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i64;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.cells[idx] = Some(cell);
                        }
                    }
                }
            }
        }
    }

    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let ch = if dx.abs() > 2.0 * dy.abs() {
            '-'
        } else if dy.abs() > 2.0 * dx.abs() {
            '|'
        } else if dx * dy > 0.0 {
            '\\'
        } else {
            '/'
        };

        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.plot(from.0 + dx * t, from.1 + dy * t, Cell { ch, color });
        }
    }

    fn plot(&mut self, x: f64, y: f64, cell: Cell) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = Some(cell);
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(to_color(self.background)))?;
        for y in 0..self.height {
            for x in 0..self.width {
                match self.cells[y * self.width + x] {
                    Some(cell) => {
                        writer.queue(SetForegroundColor(to_color(cell.color)))?;
                        writer.queue(Print(cell.ch))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    /// The current frame as plain text, one line per row.
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)).take(self.height) {
            let line: String = row.iter().map(|c| c.map_or(' ', |c| c.ch)).collect();
            text.push_str(line.trim_end());
            text.push('\n');
        }
        text
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// How squarely a view-space triangle faces the eye, in `0..=1`; `None` when degenerate.
///
/// Winding is not trusted, so back faces light up like front faces.
fn facing(corners: &[Point3<f64>; 3]) -> Option<f64> {
    let normal = (corners[1] - corners[0]).cross(&(corners[2] - corners[0]));
    let len = normal.norm();
    if len < 1e-12 {
        return None;
    }
    Some((normal.z / len).abs())
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
