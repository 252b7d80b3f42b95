/// Geometry primitives and the named-part calculator model
use nalgebra::{Point3, Vector3};

use crate::button::{parse_part_name, Button};
use crate::engine::{Digit, Operator};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn from_point(p: Point3<f32>) -> Self {
        Self { min: p, max: p }
    }

    pub fn include(&mut self, p: &Point3<f32>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

// Corner signs of each box face, wound counter-clockwise seen from outside
const CUBOID_FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    // Front
    ([0.0, 0.0, 1.0], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
    // Back
    ([0.0, 0.0, -1.0], [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]]),
    // Top
    ([0.0, 1.0, 0.0], [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]]),
    // Bottom
    ([0.0, -1.0, 0.0], [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
    // Right
    ([1.0, 0.0, 0.0], [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]]),
    // Left
    ([-1.0, 0.0, 0.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]]),
];

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Create an axis-aligned box of `size` centred on `center`
    pub fn cuboid(center: Point3<f32>, size: Vector3<f32>) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        for (n, corners) in &CUBOID_FACES {
            let v = |i: usize| {
                let [sx, sy, sz] = corners[i];
                Vertex::new(
                    center.x + sx * half.x,
                    center.y + sy * half.y,
                    center.z + sz * half.z,
                    n[0],
                    n[1],
                    n[2],
                )
            };
            mesh.add_triangle(Triangle::new(v(0), v(1), v(2)));
            mesh.add_triangle(Triangle::new(v(0), v(2), v(3)));
        }

        mesh
    }

    pub fn bounds(&self) -> Option<Aabb> {
        let mut points = self
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter().map(|v| v.position));
        let mut aabb = Aabb::from_point(points.next()?);
        for p in points {
            aabb.include(&p);
        }
        Some(aabb)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// What a model part does in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Body,
    Display,
    Button(Button),
}

impl PartKind {
    /// Classify a part by its name: button names, then `display`/`screen`
    pub fn from_name(name: &str) -> Self {
        if let Some(button) = parse_part_name(name) {
            return PartKind::Button(button);
        }
        let lower = name.to_ascii_lowercase();
        if lower.starts_with("display") || lower.starts_with("screen") {
            PartKind::Display
        } else {
            PartKind::Body
        }
    }
}

/// A named mesh inside a model
#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub kind: PartKind,
    pub mesh: Mesh,
}

impl Part {
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        let name = name.into();
        Self {
            kind: PartKind::from_name(&name),
            name,
            mesh,
        }
    }

    pub fn button(&self) -> Option<Button> {
        match self.kind {
            PartKind::Button(button) => Some(button),
            _ => None,
        }
    }
}

const BODY_SIZE: [f32; 3] = [2.0, 3.2, 0.3];
const DISPLAY_CENTER: [f32; 3] = [0.0, 1.1, 0.17];
const DISPLAY_SIZE: [f32; 3] = [1.7, 0.6, 0.04];
const KEY_SIZE: [f32; 3] = [0.36, 0.32, 0.1];
const KEY_PITCH: f32 = 0.45;
const KEY_ORIGIN: [f32; 2] = [-0.675, 0.45];

/// A calculator model: a set of named parts
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub parts: Vec<Part>,
}

impl Model {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    /// Procedural calculator: body, display panel and a 4x5 keypad
    pub fn calculator() -> Self {
        let mut parts = vec![
            Part::new(
                "body",
                Mesh::cuboid(Point3::origin(), Vector3::from(BODY_SIZE)),
            ),
            Part::new(
                "display",
                Mesh::cuboid(Point3::from(DISPLAY_CENTER), Vector3::from(DISPLAY_SIZE)),
            ),
        ];

        let key_z = BODY_SIZE[2] / 2.0 + KEY_SIZE[2] / 2.0;
        for (button, col, row, span) in keypad() {
            let width = KEY_SIZE[0] + KEY_PITCH * (span - 1) as f32;
            let x = KEY_ORIGIN[0] + KEY_PITCH * col as f32 + KEY_PITCH * (span - 1) as f32 / 2.0;
            let y = KEY_ORIGIN[1] - KEY_PITCH * row as f32;
            parts.push(Part::new(
                button.part_name(),
                Mesh::cuboid(
                    Point3::new(x, y, key_z),
                    Vector3::new(width, KEY_SIZE[1], KEY_SIZE[2]),
                ),
            ));
        }

        Self::new(parts)
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.parts
            .iter()
            .filter_map(|p| p.mesh.bounds())
            .reduce(|a, b| a.union(&b))
    }

    /// Translation that moves the bounding-box center to the origin
    pub fn centering_offset(&self) -> Vector3<f32> {
        self.bounds()
            .map(|b| -b.center().coords)
            .unwrap_or_else(Vector3::zeros)
    }

    pub fn find(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    pub fn buttons(&self) -> impl Iterator<Item = (&Part, Button)> {
        self.parts.iter().filter_map(|p| p.button().map(|b| (p, b)))
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.mesh.triangles.len()).sum()
    }
}

/// Key placement as (button, column, row, column span)
fn keypad() -> Vec<(Button, usize, usize, usize)> {
    let mut keys = vec![
        (Button::MemoryClear, 0, 0, 1),
        (Button::MemoryAdd, 1, 0, 1),
        (Button::Clear, 2, 0, 1),
        (Button::Operator(Operator::Divide), 3, 0, 1),
        (Button::Operator(Operator::Multiply), 3, 1, 1),
        (Button::Operator(Operator::Subtract), 3, 2, 1),
        (Button::Operator(Operator::Add), 3, 3, 1),
        (Button::Decimal, 1, 4, 1),
        (Button::Equals, 2, 4, 2),
    ];
    // 7 8 9 on row 1 down to 1 2 3 on row 3, zero bottom left
    keys.extend((0..10u8).filter_map(|v| {
        let digit = Button::Digit(Digit::new(v)?);
        if v == 0 {
            return Some((digit, 0, 4, 1));
        }
        let i = (v - 1) as usize;
        Some((digit, i % 3, 3 - i / 3, 1))
    }));
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_bounds() {
        let mesh = Mesh::cuboid(Point3::new(1.0, 2.0, 3.0), Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(mesh.triangles.len(), 12);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Point3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let mesh = Mesh::cuboid(Point3::origin(), Vector3::new(1.0, 1.0, 1.0));
        for triangle in &mesh.triangles {
            let stored = triangle.vertices[0].normal;
            assert!((triangle.calculate_normal() - stored).norm() < 1e-5);
        }
    }

    #[test]
    fn test_part_kinds() {
        assert_eq!(PartKind::from_name("Display_Panel"), PartKind::Display);
        assert_eq!(PartKind::from_name("screen"), PartKind::Display);
        assert_eq!(PartKind::from_name("shell"), PartKind::Body);
        assert_eq!(
            PartKind::from_name("btn_add"),
            PartKind::Button(Button::Operator(Operator::Add))
        );
    }

    #[test]
    fn test_calculator_has_every_key_once() {
        let model = Model::calculator();
        let buttons: Vec<Button> = model.buttons().map(|(_, b)| b).collect();
        assert_eq!(buttons.len(), 19);
        for (i, b) in buttons.iter().enumerate() {
            assert!(!buttons[i + 1..].contains(b), "duplicate key {b}");
        }
        assert!(model.find("body").is_some());
        assert_eq!(model.find("display").map(|p| p.kind), Some(PartKind::Display));
        assert_eq!(model.triangle_count(), 21 * 12);
    }

    #[test]
    fn test_keys_sit_on_the_body_face() {
        let model = Model::calculator();
        let body = model.find("body").and_then(|p| p.mesh.bounds()).unwrap();
        for (part, _) in model.buttons() {
            let key = part.mesh.bounds().unwrap();
            assert!(key.min.x >= body.min.x && key.max.x <= body.max.x, "{}", part.name);
            assert!(key.min.y >= body.min.y && key.max.y <= body.max.y, "{}", part.name);
            assert!((key.min.z - body.max.z).abs() < 1e-6, "{}", part.name);
        }
    }

    #[test]
    fn test_centering_offset() {
        let model = Model::new(vec![Part::new(
            "body",
            Mesh::cuboid(Point3::new(2.0, -1.0, 0.5), Vector3::new(1.0, 1.0, 1.0)),
        )]);
        let offset = model.centering_offset();
        assert!((offset - Vector3::new(-2.0, 1.0, -0.5)).norm() < 1e-6);
        assert_eq!(Model::default().centering_offset(), Vector3::zeros());
    }
}
