/// Ray casting against model parts
use nalgebra::{Matrix4, Point3, Vector3};

use crate::geometry::{Model, Part};

const EPSILON: f32 = 1e-7;

/// A half-line with a normalized direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Returns `None` for a zero-length direction
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Option<Self> {
        let direction = direction.try_normalize(EPSILON)?;
        Some(Self { origin, direction })
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Möller–Trumbore; returns the distance along the ray. Both faces hit.
    pub fn intersect_triangle(
        &self,
        a: &Point3<f32>,
        b: &Point3<f32>,
        c: &Point3<f32>,
    ) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let h = self.direction.cross(&edge2);
        let det = edge1.dot(&h);
        if det.abs() < EPSILON {
            return None;
        }

        let inv = 1.0 / det;
        let s = self.origin - a;
        let u = inv * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = inv * self.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv * edge2.dot(&q);
        (t > EPSILON).then_some(t)
    }
}

/// Nearest part hit by `ray`, with the hit distance
pub fn pick<'a>(model: &'a Model, model_matrix: &Matrix4<f32>, ray: &Ray) -> Option<(&'a Part, f32)> {
    let mut nearest: Option<(&Part, f32)> = None;

    for part in &model.parts {
        for triangle in &part.mesh.triangles {
            let [a, b, c] = triangle
                .vertices
                .map(|v| model_matrix.transform_point(&v.position));
            if let Some(t) = ray.intersect_triangle(&a, &b, &c) {
                if nearest.map_or(true, |(_, best)| t < best) {
                    nearest = Some((part, t));
                }
            }
        }
    }

    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::Button;
    use crate::engine::Operator;

    fn towards_model(x: f32, y: f32) -> Ray {
        Ray::new(Point3::new(x, y, 10.0), Vector3::new(0.0, 0.0, -1.0)).unwrap()
    }

    #[test]
    fn test_triangle_hit_and_miss() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);

        let t = towards_model(0.25, 0.25).intersect_triangle(&a, &b, &c);
        assert!((t.unwrap() - 10.0).abs() < 1e-5);
        assert!(towards_model(0.75, 0.75).intersect_triangle(&a, &b, &c).is_none());

        let away = Ray::new(Point3::new(0.25, 0.25, 1.0), Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(away.intersect_triangle(&a, &b, &c).is_none());
    }

    #[test]
    fn test_zero_direction_is_rejected() {
        assert!(Ray::new(Point3::origin(), Vector3::zeros()).is_none());
    }

    #[test]
    fn test_pick_nearest_key_over_body() {
        let model = Model::calculator();
        let identity = Matrix4::identity();

        // Divide key: column 3, row 0
        let (part, t) = pick(&model, &identity, &towards_model(0.7, 0.42)).unwrap();
        assert_eq!(part.button(), Some(Button::Operator(Operator::Divide)));
        assert!((towards_model(0.7, 0.42).at(t).z - 0.25).abs() < 1e-4);

        // Gap between keys falls through to the body
        let (part, _) = pick(&model, &identity, &towards_model(0.45, 0.225)).unwrap();
        assert_eq!(part.name, "body");

        assert!(pick(&model, &identity, &towards_model(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_pick_respects_model_matrix() {
        let model = Model::calculator();
        let shifted = Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0));
        let (part, _) = pick(&model, &shifted, &towards_model(10.3, 1.0)).unwrap();
        assert_eq!(part.name, "display");
    }
}
