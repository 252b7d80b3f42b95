/// Model transforms and orbit camera controls
use nalgebra::{Matrix4, Point3, Vector3};

const MIN_PITCH: f32 = -1.5;
const MAX_PITCH: f32 = 1.5;
/// Deltas below this are considered settled
const SETTLE_EPSILON: f32 = 1e-4;

/// Orbit controls: the camera circles `target` on a sphere.
///
/// Rotation input accumulates into a delta that is bled into the angles a
/// fraction (`damping`) per `update`, so motion eases out over a few frames.
/// Zoom is applied on the next update without easing.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_delta: f32,
    pitch_delta: f32,
    zoom_scale: f32,
}

impl OrbitControls {
    /// Start orbiting `target` from `position`
    pub fn from_position(position: Point3<f32>, target: Point3<f32>, damping: f32) -> Self {
        let offset = position - target;
        let distance = offset.norm().max(f32::EPSILON);
        Self {
            target,
            damping,
            min_distance: 1.0,
            max_distance: 20.0,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            zoom_scale: 1.0,
        }
    }

    /// Queue a rotation (radians) around the vertical and horizontal axes
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        self.yaw_delta += yaw;
        self.pitch_delta += pitch;
    }

    /// Queue a zoom; factors above 1 move the camera away
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom_scale *= factor;
        }
    }

    /// Advance one frame. Returns true while motion is still settling.
    pub fn update(&mut self) -> bool {
        let f = if self.damping > 0.0 && self.damping < 1.0 {
            self.damping
        } else {
            1.0
        };

        self.yaw += self.yaw_delta * f;
        self.pitch = (self.pitch + self.pitch_delta * f).clamp(MIN_PITCH, MAX_PITCH);
        self.yaw_delta *= 1.0 - f;
        self.pitch_delta *= 1.0 - f;

        self.distance = (self.distance * self.zoom_scale).clamp(self.min_distance, self.max_distance);
        self.zoom_scale = 1.0;

        self.yaw_delta.abs() > SETTLE_EPSILON || self.pitch_delta.abs() > SETTLE_EPSILON
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Camera position for the current angles
    pub fn position(&self) -> Point3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + Vector3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::from_position(Point3::new(0.0, 1.5, 4.0), Point3::origin(), 0.05)
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation_matrix(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}
