/// Calc3D Core Library - calculator engine and scene logic
///
/// This library provides the arithmetic state machine behind the 3D
/// calculator, the dispatcher that turns picked model parts into button
/// presses, and the shared geometry, camera and picking code used by the
/// terminal and web front-ends.

pub mod button;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod picking;
pub mod projection;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use button::{parse_part_name, Button};
pub use config::SceneConfig;
pub use dispatcher::{DisplaySurface, InputDispatcher};
pub use engine::{CalculatorEngine, Digit, Operator, ERROR_MARKER};
pub use error::{ConfigError, ModelError, UnknownButton};
pub use geometry::{Mesh, Model, Part, PartKind, Triangle, Vertex};
pub use picking::{pick, Ray};
pub use projection::{Camera, ProjectionMode};
pub use transform::{OrbitControls, Transform};
