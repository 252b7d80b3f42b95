/// Scene configuration loaded from TOML.
///
/// Every field has a default, so an empty file (or no file) is valid:
///
/// ```toml
/// [camera]
/// position = [0.0, 1.5, 4.0]
/// fov_degrees = 50.0
/// damping = 0.05
/// projection = "perspective"
///
/// [render]
/// fps = 30
/// cell_aspect = 0.5
/// display_width = 12
///
/// [logging]
/// default = "warn"
///
/// [logging.modules]
/// calc3d_core = "debug"
/// ```
use nalgebra::Point3;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::projection::{Camera, ProjectionMode};
use crate::transform::OrbitControls;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial camera position; the camera orbits the origin
    pub position: [f32; 3],
    pub fov_degrees: f32,
    /// Fraction of queued rotation applied per frame
    pub damping: f32,
    pub projection: ProjectionMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 1.5, 4.0],
            fov_degrees: 50.0,
            damping: 0.05,
            projection: ProjectionMode::Perspective,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub fps: u32,
    /// Width over height of one terminal cell
    pub cell_aspect: f32,
    /// Characters shown on the calculator display
    pub display_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            cell_aspect: 0.5,
            display_width: 12,
        }
    }
}

/// Log levels: a default plus per-target overrides
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub default: String,
    pub modules: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: "warn".to_string(),
            modules: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive string, e.g. `warn,calc3d_core=debug`
    pub fn directives(&self) -> String {
        let mut filter = self.default.clone();
        for (module, level) in &self.modules {
            filter.push_str(&format!(",{module}={level}"));
        }
        filter
    }
}

impl SceneConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn orbit_controls(&self) -> OrbitControls {
        OrbitControls::from_position(
            Point3::from(self.camera.position),
            Point3::origin(),
            self.camera.damping,
        )
    }

    /// Camera for a viewport, already placed by `orbit_controls`
    pub fn camera(&self, width: u32, height: u32) -> Camera {
        let mut camera = Camera::new(width, height);
        camera.fov = self.camera.fov_degrees.to_radians();
        camera.mode = self.camera.projection;
        camera.follow(&self.orbit_controls());
        camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SceneConfig::from_toml_str("").unwrap();
        assert_eq!(config.render.fps, 30);
        assert_eq!(config.render.display_width, 12);
        assert_eq!(config.camera.projection, ProjectionMode::Perspective);
        assert_eq!(config.logging.directives(), "warn");
    }

    #[test]
    fn test_partial_config() {
        let config = SceneConfig::from_toml_str(
            r#"
            [camera]
            projection = "orthographic"
            damping = 0.2

            [logging]
            default = "info"

            [logging.modules]
            calc3d_core = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.projection, ProjectionMode::Orthographic);
        assert_eq!(config.camera.damping, 0.2);
        assert_eq!(config.camera.fov_degrees, 50.0);
        assert_eq!(config.render.fps, 30);
        assert_eq!(config.logging.directives(), "info,calc3d_core=debug");
    }

    #[test]
    fn test_invalid_config() {
        let err = SceneConfig::from_toml_str("[render]\nfps = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_camera_from_config() {
        let camera = SceneConfig::default().camera(800, 600);
        assert!((camera.position - Point3::new(0.0, 1.5, 4.0)).norm() < 1e-5);
        assert!((camera.fov - 50f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_camera_position_from_toml() {
        let config = SceneConfig::from_toml_str("[camera]\nposition = [0.0, 0.0, 6.0]").unwrap();
        let controls = config.orbit_controls();
        assert!((controls.distance() - 6.0).abs() < 1e-5);
        assert!((config.camera(800, 600).position - Point3::new(0.0, 0.0, 6.0)).norm() < 1e-5);
    }

    #[test]
    fn test_missing_file() {
        let err = SceneConfig::load(Path::new("/nonexistent/calc3d.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
