mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::rngs::StdRng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use reaction_machine::{
    config::{Config, ConfigStore, FileConfigStore},
    display::RecordingDisplay,
    random::RngSource,
    runtime::{button_for, Button, CrosstermEventSource, DeviceEvent, FixedTicker, Runner},
    script::Script,
    Controller,
};
use std::{
    error::Error,
    fs::{self, File, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

/// coin-operated reaction time game
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A coin-operated reaction time game. Insert a coin, press go, wait for the counter to start and stop it as fast as you can. Three rounds per coin, then your average."
)]
pub struct Cli {
    /// tick period in milliseconds
    #[clap(long)]
    tick_ms: Option<u64>,

    /// seed for the random wait, for reproducible sessions
    #[clap(long)]
    seed: Option<u64>,

    /// rounds per coin
    #[clap(short = 'g', long)]
    games: Option<u32>,

    /// config file to use instead of the platform default
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,

    /// append logs to this file (RUST_LOG controls the level)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// run a replay script headless and print the display transcript as csv
    #[clap(short = 'r', long)]
    replay: Option<PathBuf>,

    /// write the replay transcript to this file instead of stdout
    #[clap(long, requires = "replay")]
    transcript: Option<PathBuf>,
}

impl Cli {
    /// Layer command line overrides on top of the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(games) = self.games {
            config.timing.games_per_coin = games;
        }
        config
    }
}

pub struct App {
    pub controller: Controller<RecordingDisplay, RngSource<StdRng>>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let random = match config.seed {
            Some(seed) => RngSource::seeded(seed),
            None => RngSource::from_entropy(),
        };
        Self {
            controller: Controller::with_timing(RecordingDisplay::new(), random, config.timing),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let config = cli.apply(store.load());
    if let Err(err) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, err).exit();
    }
    if cli.save_config {
        store.save(&config)?;
        tracing::info!(path = %store.path().display(), "config saved");
    }

    if let Some(script) = &cli.replay {
        if let Err(err) = run_replay(script, cli.transcript.as_deref(), &config) {
            eprintln!("reaction-machine: {err}");
            std::process::exit(1);
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    let result = start_tui(&mut terminal, &mut app, config.tick_ms);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if let Some(path) = &cli.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if cli.replay.is_some() {
        // stdout carries the transcript
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

fn run_replay(
    script_path: &Path,
    transcript_path: Option<&Path>,
    config: &Config,
) -> reaction_machine::Result<()> {
    let source = fs::read_to_string(script_path)?;
    let script = Script::parse(&source)?;
    tracing::info!(
        script = %script_path.display(),
        steps = script.steps().count(),
        "replaying"
    );
    let transcript = script.run(&config.timing)?;
    if let Some(last) = transcript.displays().last() {
        tracing::info!(display = last, "replay finished");
    }

    match transcript_path {
        Some(path) => transcript.write_csv(File::create(path)?)?,
        None => transcript.write_csv(io::stdout().lock())?,
    }
    Ok(())
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_ms: u64,
) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::from_millis(tick_ms));
    let mut last_state = app.controller.state();

    terminal.draw(|f| ui(app, f))?;

    loop {
        let mut redraw = false;

        match runner.step() {
            DeviceEvent::Tick => app.controller.tick(),
            DeviceEvent::Resize => redraw = true,
            DeviceEvent::Key(key) => match button_for(&key) {
                Some(Button::Quit) => break,
                Some(Button::Coin) => app.controller.coin_inserted(),
                Some(Button::GoStop) => app.controller.go_stop_pressed(),
                None => {}
            },
        }

        // only repaint when the cabinet actually changed
        let state = app.controller.state();
        if state != last_state {
            last_state = state;
            redraw = true;
        }
        if !app.controller.display_mut().take_writes().is_empty() {
            redraw = true;
        }

        if redraw {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
