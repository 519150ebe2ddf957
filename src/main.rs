use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gesture_connect_four::config::AppConfig;
use gesture_connect_four::game::layout::Viewport;
use gesture_connect_four::game::{GameController, GameOutcome};
use gesture_connect_four::input::{demo_game, read_json_lines};
use gesture_connect_four::ui::App;

/// Play Connect Four with hand gestures.
#[derive(Parser)]
#[command(name = "gesture-connect-four", about = "Connect Four played with hand gestures")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Seed for disc spin, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Run without the terminal UI, feeding a scripted game and logging events
    #[arg(long)]
    headless: bool,

    /// JSON-lines gesture recording to play in headless mode instead of the demo
    #[arg(long, requires = "headless")]
    replay: Option<PathBuf>,

    /// Write logs here while the terminal UI is running
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the final game snapshot as JSON after a headless run
    #[arg(long, requires = "headless")]
    dump_snapshot: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        let toml = AppConfig::default_toml().context("serializing default config")?;
        print!("{toml}");
        return Ok(());
    }

    init_logging(&cli)?;

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    if cli.headless {
        run_headless(&cli, &config)
    } else {
        run_tui(&cli, &config)
    }
}

/// Headless runs log to stderr. The terminal UI owns the screen, so its logs
/// only go to `--log-file` when one is given.
fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.headless {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .context("setting tracing subscriber")?;
    } else if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .context("setting tracing subscriber")?;
    }
    Ok(())
}

fn run_headless(cli: &Cli, config: &AppConfig) -> Result<()> {
    let viewport = Viewport::default();
    let mut controller = match cli.seed {
        Some(seed) => GameController::with_seed(config.game.clone(), viewport, seed),
        None => GameController::new(config.game.clone(), viewport),
    };

    let ticks = match &cli.replay {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening recording {}", path.display()))?;
            read_json_lines(BufReader::new(file))
                .with_context(|| format!("parsing recording {}", path.display()))?
        }
        None => demo_game(controller.layout(), &config.game.timing, config.ui.frame_ms),
    };
    info!(ticks = ticks.len(), "running headless game");

    for tick in &ticks {
        for event in controller.tick(tick.now_ms, tick.frame.as_ref()) {
            info!(at_ms = tick.now_ms, ?event, "event");
            if let Some(cue) = event.sound_cue() {
                info!(at_ms = tick.now_ms, cue = cue.name(), "sound");
            }
        }
    }

    let snapshot = controller.snapshot();
    match snapshot.outcome {
        Some(GameOutcome::Winner(player)) => info!(winner = player.name(), "game finished"),
        Some(GameOutcome::Draw) => info!("game drawn"),
        None => warn!(phase = ?snapshot.phase, "script ended without a result"),
    }

    if cli.dump_snapshot {
        let json = serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?;
        println!("{json}");
    }
    Ok(())
}

fn run_tui(cli: &Cli, config: &AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    let res = run_app(&mut terminal, config, cli.seed);

    // Restore terminal, always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &AppConfig,
    seed: Option<u64>,
) -> Result<()> {
    let size = terminal.size().context("reading terminal size")?;
    let mut app = App::new(config, Rect::new(0, 0, size.width, size.height), seed);
    app.run(terminal).context("running terminal UI")
}
