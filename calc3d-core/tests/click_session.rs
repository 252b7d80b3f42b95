//! Drives the calculator the way a front-end does: project a key onto the
//! screen, cast a ray back through that pixel, pick the part, dispatch it.

use calc3d_core::{
    pick, Button, Camera, InputDispatcher, Model, SceneConfig, Transform, ERROR_MARKER,
};
use nalgebra::{Matrix4, Point3};

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 768;

struct Scene {
    model: Model,
    model_matrix: Matrix4<f32>,
    camera: Camera,
    dispatcher: InputDispatcher<String>,
}

impl Scene {
    fn new() -> Self {
        let model = Model::calculator();
        let model_matrix = Transform::translation_matrix(&model.centering_offset());
        Self {
            model,
            model_matrix,
            camera: SceneConfig::default().camera(WIDTH, HEIGHT),
            dispatcher: InputDispatcher::new(String::new()),
        }
    }

    /// Screen position of a point on the front face of a part, kept off
    /// the face's triangle diagonal
    fn screen_point(&self, part_name: &str) -> (f32, f32) {
        let bounds = self.model.find(part_name).unwrap().mesh.bounds().unwrap();
        let center = bounds.center();
        let size = bounds.size();
        let target = Point3::new(
            center.x + 0.25 * size.x,
            center.y - 0.2 * size.y,
            bounds.max.z,
        );
        let (x, y, _) = self
            .camera
            .project_to_screen(&target, &self.model_matrix, WIDTH, HEIGHT)
            .unwrap();
        (x, y)
    }

    fn click_at(&mut self, x: f32, y: f32) -> Option<Button> {
        let ray = self.camera.ray_from_screen(x, y, WIDTH, HEIGHT)?;
        let (part, _) = pick(&self.model, &self.model_matrix, &ray)?;
        let name = part.name.clone();
        self.dispatcher.hit(&name)
    }

    fn click(&mut self, token: &str) -> Button {
        let button: Button = token.parse().unwrap();
        let (x, y) = self.screen_point(&button.part_name());
        let hit = self.click_at(x, y);
        assert_eq!(hit, Some(button), "clicking {token}");
        button
    }

    fn display(&self) -> &str {
        self.dispatcher.surface()
    }
}

#[test]
fn clicking_keys_chains_operations() {
    let mut scene = Scene::new();
    for token in ["2", "+", "3", "*", "4"] {
        scene.click(token);
    }
    assert_eq!(scene.display(), "4");
    scene.click("=");
    assert_eq!(scene.display(), "20");
}

#[test]
fn division_by_zero_shows_error_then_recovers() {
    let mut scene = Scene::new();
    for token in ["5", "/", "0", "="] {
        scene.click(token);
    }
    assert_eq!(scene.display(), ERROR_MARKER);
    scene.click("2");
    assert_eq!(scene.display(), "2");
}

#[test]
fn memory_keys_survive_clear() {
    let mut scene = Scene::new();
    for token in ["7", "M+", "3", "M+", "C"] {
        scene.click(token);
    }
    assert_eq!(scene.dispatcher.engine().memory(), 10.0);
    scene.click("MC");
    assert_eq!(scene.dispatcher.engine().memory(), 0.0);
    assert_eq!(scene.display(), "0");
}

#[test]
fn clicking_display_or_background_does_nothing() {
    let mut scene = Scene::new();
    scene.click("9");

    let (x, y) = scene.screen_point("display");
    assert_eq!(scene.click_at(x, y), None);
    assert_eq!(scene.click_at(1.0, 1.0), None);
    assert_eq!(scene.display(), "9");
}

#[test]
fn decimal_key_is_ignored_when_entry_has_point() {
    let mut scene = Scene::new();
    for token in [".", ".", "5"] {
        scene.click(token);
    }
    assert_eq!(scene.display(), "0.5");
}
