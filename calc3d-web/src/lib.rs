/// Calc3D Web - WASM bindings for the browser calculator
///
/// The page renders the 3D model with its own scene library and calls into
/// this module for everything stateful: key presses, pointer picking
/// against the calculator model, orbit camera state and the display text,
/// which is painted onto a 2D canvas used as the display texture.

use nalgebra::Matrix4;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use calc3d_core::{
    pick, Button, Camera, DisplaySurface, InputDispatcher, Model, OrbitControls, SceneConfig,
    Transform,
};

const DISPLAY_BACKGROUND: &str = "#9ab08c";
const DISPLAY_INK: &str = "#1c2418";

/// Display surface backed by an optional 2D canvas
#[derive(Default)]
pub struct CanvasDisplay {
    text: String,
    context: Option<CanvasRenderingContext2d>,
}

impl CanvasDisplay {
    fn paint(&self) {
        let Some(ctx) = &self.context else {
            return;
        };
        let canvas = ctx.canvas();
        let (width, height) = canvas
            .map(|c| (f64::from(c.width()), f64::from(c.height())))
            .unwrap_or((256.0, 64.0));

        ctx.set_fill_style_str(DISPLAY_BACKGROUND);
        ctx.fill_rect(0.0, 0.0, width, height);
        ctx.set_fill_style_str(DISPLAY_INK);
        ctx.set_font(&format!("{}px monospace", (height * 0.6).round()));
        ctx.set_text_align("right");
        ctx.set_text_baseline("middle");
        // Text wider than the canvas is squeezed rather than cut
        if let Err(e) = ctx.fill_text_with_max_width(&self.text, width * 0.95, height / 2.0, width * 0.9) {
            debug!(error = ?e, "failed to paint display");
        }
    }
}

impl DisplaySurface for CanvasDisplay {
    fn show(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.paint();
    }
}

#[wasm_bindgen]
pub struct WebCalculator {
    model: Model,
    model_matrix: Matrix4<f32>,
    camera: Camera,
    controls: OrbitControls,
    dispatcher: InputDispatcher<CanvasDisplay>,
}

#[wasm_bindgen]
impl WebCalculator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebCalculator {
        let config = SceneConfig::default();
        let model = Model::calculator();
        WebCalculator {
            model_matrix: Transform::translation_matrix(&model.centering_offset()),
            model,
            camera: config.camera(800, 600),
            controls: config.orbit_controls(),
            dispatcher: InputDispatcher::new(CanvasDisplay::default()),
        }
    }

    /// Paint the display onto the canvas with this element id
    pub fn attach_display(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{canvas_id}'")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("'{canvas_id}' is not a canvas")))?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let surface = self.dispatcher.surface_mut();
        surface.context = Some(context);
        surface.paint();
        Ok(())
    }

    /// Press a key by token (`7`, `.`, `+`, `=`, `C`, `M+`, `MC`).
    /// Returns the new display text, or undefined for operators.
    pub fn press(&mut self, token: &str) -> Result<Option<String>, JsValue> {
        let button: Button = token
            .parse()
            .map_err(|e: calc3d_core::UnknownButton| JsValue::from_str(&e.to_string()))?;
        Ok(self.dispatcher.press(button))
    }

    /// Refit the camera to the page canvas, in CSS pixels
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height, 1.0);
    }

    /// Pick the part under a pointer position and press it. Returns the
    /// picked part name, if any.
    ///
    /// The canvas size given here is authoritative: the camera is refit to
    /// it before the ray is cast, replacing any earlier `resize`.
    pub fn click(&mut self, x: f32, y: f32, width: u32, height: u32) -> Option<String> {
        self.resize(width, height);
        let ray = self.camera.ray_from_screen(x, y, width, height)?;
        let (part, _) = pick(&self.model, &self.model_matrix, &ray)?;
        let name = part.name.clone();
        self.dispatcher.hit(&name);
        Some(name)
    }

    /// Queue an orbit rotation in radians
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.controls.rotate(yaw, pitch);
    }

    pub fn zoom(&mut self, factor: f32) {
        self.controls.zoom(factor);
    }

    /// Advance the orbit damping by one frame and return the camera
    /// position as `[x, y, z]`
    pub fn tick(&mut self) -> Vec<f32> {
        self.controls.update();
        self.camera.follow(&self.controls);
        let p = self.camera.position;
        vec![p.x, p.y, p.z]
    }

    pub fn display(&self) -> String {
        self.dispatcher.surface().text.clone()
    }

    pub fn memory(&self) -> f64 {
        self.dispatcher.engine().memory()
    }
}

impl Default for WebCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_tokens() {
        let mut calc = WebCalculator::new();
        assert_eq!(calc.press("6").unwrap(), Some("6".to_string()));
        assert_eq!(calc.press("+").unwrap(), None);
        calc.press("4").unwrap();
        assert_eq!(calc.press("=").unwrap(), Some("10".to_string()));
        assert_eq!(calc.display(), "10");
    }

    #[test]
    fn test_click_background_misses() {
        let mut calc = WebCalculator::new();
        assert_eq!(calc.click(1.0, 1.0, 800, 600), None);
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_click_refits_camera_to_canvas() {
        let mut calc = WebCalculator::new();
        calc.resize(1200, 400);
        assert!((calc.camera.aspect - 3.0).abs() < 1e-6);

        calc.click(1.0, 1.0, 500, 500);
        assert!((calc.camera.aspect - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_tick_starts_at_configured_camera() {
        let mut calc = WebCalculator::new();
        let p = calc.tick();
        assert!((p[1] - 1.5).abs() < 1e-4 && (p[2] - 4.0).abs() < 1e-4);
    }
}
