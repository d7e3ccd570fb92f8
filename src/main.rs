use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::event::{self, Event};
use spiral_disks::{
    app::{AppFlow, SpiralApp},
    color::Color,
    config::{Configuration, SpiralConfig},
    controls::ControlAction,
    render::{
        RenderError, Renderer,
        retained::RetainedRenderer,
        terminal::{TerminalRenderer, TerminalSession},
    },
    spiral,
};
use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

/// The color behind the disks unless told otherwise.
const DEFAULT_BACKGROUND: Color = Color::new(0x20, 0x20, 0x20);

/// How long to wait for input when nothing is scheduled.
const IDLE_POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// Disks unwinding along spiral trajectories, in your terminal.
#[derive(Parser)]
#[command(author, version, about, after_help = key_help())]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// The path to the configuration file to use.
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write logs into this file.
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[derive(Subcommand)]
enum Command {
    /// Play the animation in the terminal. This is the default.
    Run {
        /// The color behind the disks.
        #[clap(long, default_value_t = DEFAULT_BACKGROUND)]
        background: Color,
    },

    /// Render a single frame without a terminal.
    Frame {
        /// The time to render the frame at, in seconds.
        #[clap(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
        time: f64,

        /// The output format.
        #[clap(short, long, value_enum, default_value_t = FrameFormat::Svg)]
        format: FrameFormat,

        /// Write the frame into this file rather than stdout.
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FrameFormat {
    Svg,
    Json,
}

/// Overrides on top of the config file.
#[derive(Args)]
struct ConfigOverrides {
    /// The viewport width disks are laid out in.
    #[clap(long, global = true)]
    width: Option<f64>,

    /// The number of disks in one sweep of a spiral arm.
    #[clap(long, global = true)]
    disks_per_cycle: Option<u32>,

    /// How tight the spiral is.
    #[clap(long, global = true)]
    speed: Option<f64>,

    /// The frame rate. Negative values play the animation backwards.
    #[clap(long, global = true, allow_negative_numbers = true)]
    fps: Option<f64>,

    /// The length of a full loop, in seconds.
    #[clap(long, global = true)]
    duration: Option<f64>,

    /// Make disk opacity follow each disk's phase.
    #[clap(long, global = true)]
    opacity: bool,

    /// Cycle disk colors automatically.
    #[clap(long, global = true)]
    cycle_colors: bool,

    /// Start paused.
    #[clap(long, global = true)]
    paused: bool,

    /// The disk fill color.
    #[clap(long, global = true)]
    fill: Option<Color>,

    /// The disk outline color.
    #[clap(long, global = true)]
    stroke: Option<Color>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut SpiralConfig) {
        if let Some(width) = self.width {
            config.viewport_width = width;
        }
        if let Some(disks_per_cycle) = self.disks_per_cycle {
            config.disks_per_cycle = disks_per_cycle;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(fps) = self.fps {
            config.frames_per_second = fps;
        }
        if let Some(duration) = self.duration {
            config.cycle_duration = duration;
        }
        if let Some(fill) = self.fill {
            config.style.fill = fill;
        }
        if let Some(stroke) = self.stroke {
            config.style.stroke = stroke;
        }
        config.opacity_mode |= self.opacity;
        config.palette_cycling |= self.cycle_colors;
        config.running &= !self.paused;
    }
}

fn key_help() -> String {
    let keys: Vec<_> = ControlAction::iter().map(|action| action.help()).collect();
    format!("Keys: {}", keys.join(", "))
}

fn load_config(cli: &Cli) -> anyhow::Result<SpiralConfig> {
    let mut config = match &cli.config {
        Some(path) => SpiralConfig::load(path)?,
        None => SpiralConfig::load_default()?,
    };
    cli.overrides.apply(&mut config);
    Ok(config)
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {path:?}"))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false).with_writer(Mutex::new(file)).init();
    Ok(())
}

fn run(config: Configuration, running: bool, background: Color) -> anyhow::Result<()> {
    let _session = TerminalSession::enter().context("setting up terminal")?;
    let (columns, rows) = crossterm::terminal::size().context("querying terminal size")?;
    let renderer = TerminalRenderer::new(io::stdout(), columns, rows, background);
    let mut app = SpiralApp::new(config, running, renderer);
    app.start(Instant::now());

    loop {
        match app.poll(Instant::now()) {
            // nothing can be drawn until the terminal grows again
            Err(RenderError::ViewportTooSmall(..)) => (),
            other => {
                other?;
            }
        };
        let timeout = app
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL_TIMEOUT);
        if !event::poll(timeout)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                let Some(action) = ControlAction::from_key(&key) else {
                    continue;
                };
                match app.apply(action, Instant::now()) {
                    Ok(AppFlow::Quit) => break,
                    Ok(AppFlow::Continue) => (),
                    Err(e) => tracing::warn!("ignoring {action}: {e}"),
                };
            }
            Event::Resize(columns, rows) => {
                app.renderer_mut().resize(columns, rows);
                if columns > 0 && rows > 0 {
                    app.redraw()?;
                }
            }
            _ => (),
        };
    }
    app.stop();
    Ok(())
}

fn export_frame(config: &Configuration, time: f64, format: FrameFormat, output: Option<&Path>) -> anyhow::Result<()> {
    let disks = spiral::generate(time, config);
    let contents = match format {
        FrameFormat::Svg => {
            let mut renderer = RetainedRenderer::new();
            renderer.render(&disks)?;
            renderer.to_svg()
        }
        FrameFormat::Json => serde_json::to_string_pretty(&disks)?,
    };
    match output {
        Some(path) => fs::write(path, contents).with_context(|| format!("writing frame to {path:?}"))?,
        None => print!("{contents}"),
    };
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }
    let config = load_config(&cli)?;
    let running = config.running;
    let config = config.validate().context("invalid configuration")?;

    match cli.command {
        None => run(config, running, DEFAULT_BACKGROUND),
        Some(Command::Run { background }) => run(config, running, background),
        Some(Command::Frame { time, format, output }) => export_frame(&config, time, format, output.as_deref()),
    }
}
