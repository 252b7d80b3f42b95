/// Terminal front-end: renders the calculator model and routes clicks and
/// key presses to the calculator engine
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use nalgebra::Matrix4;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use calc3d_core::{
    Button, Camera, Digit, InputDispatcher, Model, OrbitControls, Operator, PartKind,
    SceneConfig, Transform,
};

pub mod display;
pub mod logging;
pub mod renderer;

pub use display::DisplayPanel;
pub use renderer::AsciiRenderer;

/// Frames a pressed key stays highlighted
const HIGHLIGHT_FRAMES: u32 = 6;
const KEY_ORBIT_STEP: f32 = 0.2;
const DRAG_ORBIT_STEP: f32 = 0.05;

/// Main application struct for the terminal calculator
pub struct TerminalApp {
    model: Model,
    model_matrix: Matrix4<f32>,
    camera: Camera,
    controls: OrbitControls,
    renderer: AsciiRenderer,
    dispatcher: InputDispatcher<DisplayPanel>,
    display_part: Option<usize>,
    cell_aspect: f32,
    frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    drag: Option<Drag>,
    highlight: Option<(usize, u32)>,
}

/// Mouse button held down; a release without movement is a click
#[derive(Debug, Clone, Copy)]
struct Drag {
    column: u16,
    row: u16,
    moved: bool,
}

impl TerminalApp {
    pub fn new(model: Model, config: &SceneConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        let model_matrix = Transform::translation_matrix(&model.centering_offset());
        let mut camera = config.camera(width as u32, height as u32);
        camera.set_viewport(width as u32, height as u32, config.render.cell_aspect);
        let display_part = model.parts.iter().position(|p| p.kind == PartKind::Display);

        Ok(Self {
            model,
            model_matrix,
            camera,
            controls: config.orbit_controls(),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            dispatcher: InputDispatcher::new(DisplayPanel::new(config.render.display_width)),
            display_part,
            cell_aspect: config.render.cell_aspect,
            frame_time: Duration::from_millis(1000 / u64::from(config.render.fps.max(1))),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            drag: None,
            highlight: None,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    /// Text currently on the calculator display
    pub fn display_text(&self) -> &str {
        self.dispatcher.surface().text()
    }

    fn main_loop(&mut self) -> io::Result<()> {
        info!(
            frame_ms = self.frame_time.as_millis() as u64,
            parts = self.model.parts.len(),
            "starting main loop"
        );

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            self.update();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                self.renderer.resize(width as usize, height as usize);
                self.camera
                    .set_viewport(width as u32, height as u32, self.cell_aspect);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if let Some(button) = key_to_button(key.code) {
            self.press(button);
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => self.controls.rotate(0.0, KEY_ORBIT_STEP),
            KeyCode::Char('s') | KeyCode::Down => self.controls.rotate(0.0, -KEY_ORBIT_STEP),
            KeyCode::Char('a') | KeyCode::Left => self.controls.rotate(-KEY_ORBIT_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.controls.rotate(KEY_ORBIT_STEP, 0.0),
            KeyCode::PageUp => self.controls.zoom(0.9),
            KeyCode::PageDown => self.controls.zoom(1.1),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag = Some(Drag {
                    column: mouse.column,
                    row: mouse.row,
                    moved: false,
                });
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(drag) = &mut self.drag {
                    let dx = f32::from(mouse.column) - f32::from(drag.column);
                    let dy = f32::from(mouse.row) - f32::from(drag.row);
                    self.controls
                        .rotate(-dx * DRAG_ORBIT_STEP, dy * DRAG_ORBIT_STEP * 2.0);
                    *drag = Drag {
                        column: mouse.column,
                        row: mouse.row,
                        moved: true,
                    };
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(Drag { moved: false, .. }) = self.drag.take() {
                    self.click(mouse.column as usize, mouse.row as usize);
                }
            }
            MouseEventKind::ScrollUp => self.controls.zoom(0.9),
            MouseEventKind::ScrollDown => self.controls.zoom(1.1),
            _ => {}
        }
    }

    /// Dispatch whatever part is drawn under a terminal cell
    fn click(&mut self, column: usize, row: usize) {
        let Some(index) = self.renderer.part_at(column, row) else {
            return;
        };
        let name = &self.model.parts[index].name;
        debug!(part = %name, column, row, "clicked part");
        if self.dispatcher.hit(name).is_some() {
            self.highlight = Some((index, HIGHLIGHT_FRAMES));
        }
    }

    fn press(&mut self, button: Button) {
        self.dispatcher.press(button);
        self.highlight = self
            .model
            .parts
            .iter()
            .position(|p| p.button() == Some(button))
            .map(|index| (index, HIGHLIGHT_FRAMES));
    }

    fn update(&mut self) {
        self.controls.update();
        self.camera.follow(&self.controls);

        self.highlight = match self.highlight {
            Some((index, frames)) if frames > 1 => Some((index, frames - 1)),
            _ => None,
        };
    }

    fn render(&mut self) -> io::Result<()> {
        // Clear renderer
        self.renderer.clear();
        self.renderer.set_highlight(self.highlight.map(|(index, _)| index));

        // Render model
        self.renderer
            .render_model(&self.model, &self.model_matrix, &self.camera);

        // Paint the display text onto the display part
        let fitted = self.dispatcher.surface().fitted();
        let anchor = self.display_part.and_then(|index| {
            self.renderer
                .anchor(&self.model, index, &self.model_matrix, &self.camera)
        });
        if let Some((col, row)) = anchor {
            self.renderer.put_text(col, row, &fitted, None);
        }

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let memory = if self.dispatcher.engine().memory() != 0.0 {
            "M"
        } else {
            " "
        };
        let pending = self
            .dispatcher
            .engine()
            .pending_operator()
            .map_or(' ', Operator::symbol);
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Calc3D | FPS: {:.1} | [{memory}{pending}] {} | Click keys or type 0-9 . + - * / = c m M | WASD/drag=Orbit Q=Quit",
                self.fps,
                fitted.trim_start()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Keyboard shortcut for a calculator button
pub fn key_to_button(code: KeyCode) -> Option<Button> {
    match code {
        KeyCode::Enter => Some(Button::Equals),
        KeyCode::Char('=') => Some(Button::Equals),
        KeyCode::Char('.') | KeyCode::Char(',') => Some(Button::Decimal),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Button::Clear),
        KeyCode::Char('m') => Some(Button::MemoryAdd),
        KeyCode::Char('M') => Some(Button::MemoryClear),
        KeyCode::Char(c) => match Digit::try_from(c) {
            Ok(digit) => Some(Button::Digit(digit)),
            Err(_) => c.to_string().parse::<Operator>().ok().map(Button::Operator),
        },
        _ => None,
    }
}
