/// Routes button presses and picked scene parts into the calculator engine
use tracing::debug;

use crate::button::{parse_part_name, Button};
use crate::engine::CalculatorEngine;

/// Somewhere the calculator display text is shown
pub trait DisplaySurface {
    fn show(&mut self, text: &str);
}

/// Surface that only remembers the last text it was given
impl DisplaySurface for String {
    fn show(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

/// Owns one engine and one display surface.
///
/// Operators update engine state silently; every other button forwards the
/// engine's returned text to the surface.
pub struct InputDispatcher<S> {
    engine: CalculatorEngine,
    surface: S,
}

impl<S: DisplaySurface> InputDispatcher<S> {
    pub fn new(mut surface: S) -> Self {
        let engine = CalculatorEngine::new();
        surface.show(engine.display());
        Self { engine, surface }
    }

    /// Press a button, returning the text sent to the surface if any
    pub fn press(&mut self, button: Button) -> Option<String> {
        let text = match button {
            Button::Digit(d) => self.engine.input_digit(d),
            Button::Decimal => self.engine.input_decimal_point(),
            Button::Operator(op) => {
                self.engine.set_operator(op);
                debug!(button = %button, "operator pending");
                return None;
            }
            Button::Equals => self.engine.calculate(),
            Button::Clear => self.engine.clear(),
            Button::MemoryAdd => self.engine.memory_add(),
            Button::MemoryClear => self.engine.memory_clear(),
        }
        .to_string();

        debug!(button = %button, display = %text, "button pressed");
        self.surface.show(&text);
        Some(text)
    }

    /// Press the button a picked scene part stands for.
    ///
    /// Parts that are not buttons (body, display) are ignored.
    pub fn hit(&mut self, part_name: &str) -> Option<Button> {
        let Some(button) = parse_part_name(part_name) else {
            debug!(part = part_name, "ignoring hit on non-button part");
            return None;
        };
        self.press(button);
        Some(button)
    }

    pub fn engine(&self) -> &CalculatorEngine {
        &self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
