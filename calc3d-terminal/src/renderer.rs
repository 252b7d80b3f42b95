/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use std::io::Write;
use calc3d_core::{Camera, Model, PartKind, Triangle};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// ASCII renderer that converts 3D models to terminal characters.
///
/// Alongside the depth and character buffers it records which model part
/// covers each cell, so a mouse position can be turned back into a part.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    part_buffer: Vec<Option<usize>>,
    text_buffer: Vec<Option<char>>,
    kinds: Vec<PartKind>,
    highlight: Option<usize>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            part_buffer: vec![None; size],
            text_buffer: vec![None; size],
            kinds: Vec::new(),
            highlight: None,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self {
            kinds: std::mem::take(&mut self.kinds),
            highlight: self.highlight,
            ..Self::new(width, height)
        };
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.part_buffer.fill(None);
        self.text_buffer.fill(None);
    }

    /// Part to draw in the highlight color, e.g. a key just pressed
    pub fn set_highlight(&mut self, part: Option<usize>) {
        self.highlight = part;
    }

    pub fn render_model(&mut self, model: &Model, model_matrix: &Matrix4<f32>, camera: &Camera) {
        self.kinds = model.parts.iter().map(|p| p.kind).collect();

        for (index, part) in model.parts.iter().enumerate() {
            for triangle in &part.mesh.triangles {
                self.render_triangle(index, triangle, model_matrix, camera);
            }
        }

        for (index, part) in model.parts.iter().enumerate() {
            if let Some(button) = part.button() {
                if let Some((col, row)) = self.anchor(model, index, model_matrix, camera) {
                    self.put_text(col, row, button.label(), Some(index));
                }
            }
        }
    }

    fn render_triangle(
        &mut self,
        part: usize,
        triangle: &Triangle,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) {
        // Project vertices to screen space
        let mut screen_coords = Vec::with_capacity(3);
        for vertex in &triangle.vertices {
            match camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => screen_coords.push(coords),
                None => return, // Triangle is clipped
            }
        }

        // Light comes from the camera
        let normal = triangle.calculate_normal();
        let Some(light_dir) = (camera.position - camera.target).try_normalize(1e-6) else {
            return;
        };
        let brightness = normal.dot(&light_dir).max(0.0);

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        self.rasterize_triangle(&screen_coords, character, part);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32)], character: char, part: usize) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                            self.part_buffer[idx] = Some(part);
                        }
                    }
                }
            }
        }
    }

    /// Part visible at a terminal cell
    pub fn part_at(&self, col: usize, row: usize) -> Option<usize> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.part_buffer[row * self.width + col]
    }

    /// Cell where the center of a part's front face lands
    pub fn anchor(
        &self,
        model: &Model,
        part: usize,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) -> Option<(usize, usize)> {
        let bounds = model.parts.get(part)?.mesh.bounds()?;
        let center = bounds.center();
        let front = Point3::new(center.x, center.y, bounds.max.z);
        let (x, y, _) =
            camera.project_to_screen(&front, model_matrix, self.width as u32, self.height as u32)?;
        if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    /// Write `text` centred on a cell. With `only_on` set, characters land
    /// only where that part is visible.
    pub fn put_text(&mut self, col: usize, row: usize, text: &str, only_on: Option<usize>) {
        if row >= self.height {
            return;
        }
        let len = text.chars().count();
        let start = col as i64 - (len / 2) as i64;
        for (i, c) in text.chars().enumerate() {
            let x = start + i as i64;
            if x < 0 || x >= self.width as i64 {
                continue;
            }
            let idx = row * self.width + x as usize;
            if only_on.is_some() && self.part_buffer[idx] != only_on {
                continue;
            }
            self.text_buffer[idx] = Some(c);
        }
    }

    fn cell_color(&self, idx: usize) -> Color {
        let part = self.part_buffer[idx];
        if part.is_some() && part == self.highlight {
            return Color::Magenta;
        }
        let kind = part.and_then(|p| self.kinds.get(p).copied());
        match (kind, self.text_buffer[idx].is_some()) {
            (Some(PartKind::Display), _) => Color::Green,
            (Some(PartKind::Button(_)), true) => Color::Black,
            (Some(PartKind::Button(b)), false) if b.is_operator() => Color::Yellow,
            (Some(PartKind::Button(_)), false) => Color::White,
            (_, true) => Color::White,
            _ => match self.char_buffer[idx] {
                ' ' | '.' | ':' => Color::DarkGrey,
                '-' | '=' => Color::Grey,
                '+' | '*' => Color::White,
                '#' | '%' | '@' => Color::Cyan,
                _ => Color::White,
            },
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.text_buffer[idx].unwrap_or(self.char_buffer[idx]);

                writer.queue(SetForegroundColor(self.cell_color(idx)))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
