/// Calc3D Terminal - interactive 3D calculator
///
/// Renders a calculator model as ASCII art and forwards clicks on its keys
/// to the calculator engine.
/// Controls:
///   - Mouse click: Press the key under the cursor
///   - Mouse drag / WASD / Arrow Keys: Orbit the camera
///   - Scroll / PageUp / PageDown: Zoom
///   - 0-9 . + - * / = Enter c m M: Type directly
///   - Q/ESC: Quit

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;
use calc3d_core::{stl, Model, ProjectionMode, SceneConfig};
use calc3d_terminal::{logging, TerminalApp};

#[derive(Parser, Debug)]
#[command(name = "calc3d", version, about = "Interactive 3D calculator in the terminal")]
struct Cli {
    /// STL model whose solids are named after calculator keys
    /// (defaults to the built-in calculator)
    #[arg(short, long, env = "CALC3D_MODEL")]
    model: Option<PathBuf>,

    /// TOML scene configuration
    #[arg(short, long, env = "CALC3D_CONFIG")]
    config: Option<PathBuf>,

    /// Target frames per second (overrides config)
    #[arg(long)]
    fps: Option<u32>,

    /// Write logs to this file
    #[arg(long, env = "CALC3D_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Use an orthographic camera
    #[arg(long)]
    orthographic: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(fps) = cli.fps {
        config.render.fps = fps;
    }
    if cli.orthographic {
        config.camera.projection = ProjectionMode::Orthographic;
    }

    logging::init(&config.logging, cli.log_file.as_deref()).context("initializing logging")?;

    println!("Calc3D Terminal - Loading...");

    let model = match &cli.model {
        Some(path) => stl::load_model(path)
            .with_context(|| format!("loading model {}", path.display()))?,
        None => Model::calculator(),
    };
    if model.buttons().next().is_none() {
        warn!("model has no button parts");
        eprintln!("Warning: the model has no parts named like calculator keys (e.g. btn_7)");
    }

    println!(
        "Loaded {} parts ({} triangles). Starting (press Q to quit)...",
        model.parts.len(),
        model.triangle_count()
    );
    std::thread::sleep(std::time::Duration::from_secs(1));

    // Run the terminal app
    let mut app = TerminalApp::new(model, &config).context("opening terminal")?;
    app.run().context("running terminal app")?;

    println!("Final display: {}", app.display_text());
    Ok(())
}
