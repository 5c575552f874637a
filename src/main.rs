use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use sketchy::config::SketchyConfig;
use sketchy::controller::{JoystickPoller, JoystickSource, NoJoysticks};
use sketchy::ui::SketchyUI;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// A drawing toy in the style of the etch-a-sketch
#[derive(Parser, Debug)]
#[command(name = "sketchy", version, about)]
struct Cli {
    /// Config file (defaults to <config dir>/sketchy/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run in a window instead of fullscreen
    #[arg(long)]
    windowed: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup(cli.verbose)?;

    let mut config = SketchyConfig::load(cli.config.as_deref())?;
    if cli.windowed {
        config.display.fullscreen = false;
    }

    // Joysticks are optional, the pointer alone is enough to draw
    let joysticks: Box<dyn JoystickSource> = match JoystickPoller::create(config.joystick.clone()) {
        Ok(poller) => Box::new(poller),
        Err(e) => {
            warn!("Continuing without joysticks: {}", e);
            Box::new(NoJoysticks)
        }
    };

    info!("Starting Sketchy");
    let [width, height] = config.display.window_size;
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_title("Sketchy!")
        .with_inner_size([width as f32, height as f32])
        .with_fullscreen(config.display.fullscreen);

    eframe::run_native(
        "Sketchy!",
        native_options,
        Box::new(move |cc| Ok(Box::new(SketchyUI::new(cc, config, joysticks)))),
    )
    .map_err(|e| eyre!("Failed to run window: {}", e))?;

    info!("Sketchy closed");
    Ok(())
}

fn setup(verbose: bool) -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    setup_logging_env(if verbose { Level::DEBUG } else { Level::INFO });
    Ok(())
}

fn setup_logging_env(level: Level) {
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
