use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use hitcircle::{
    app::{App, AppAction, GameOptions},
    app_dirs::AppDirs,
    beatmap::{self, Beatmap, MapSource},
    config::FileSettingsStore,
    hit_target::TargetTiming,
    judge::ScoringModel,
    logging,
    runtime::{CrosstermEventSource, GameEvent, Runner, SharedTicker},
    session::ClickPolicy,
};
use log::{info, LevelFilter};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
};

/// click the circles before their approach rings close
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal rhythm game: circles appear on a playfield with a shrinking approach ring. Click each one (mouse, or z / x at the pointer) as its ring closes. Timing decides Perfect, Great, Good or Miss; misses drain health."
)]
pub struct Cli {
    /// beatmap to play right away (.osu, .osz or .txt)
    map: Option<PathBuf>,

    /// directory scanned for beatmaps (defaults to the platform data dir)
    #[clap(short = 'd', long)]
    maps_dir: Option<PathBuf>,

    /// scoring model
    #[clap(short, long, value_enum, default_value_t = ScoringModel::Tiered)]
    scoring: ScoringModel,

    /// let a click hit any active circle instead of only the next one
    #[clap(long)]
    free_order: bool,

    /// number of circles in the random practice map
    #[clap(short = 'n', long, default_value_t = 20)]
    random_count: usize,

    /// seed for the random practice map
    #[clap(long)]
    seed: Option<u64>,

    /// how long a circle is on screen before its target time (ms)
    #[clap(long, default_value_t = 1200, value_parser = clap::value_parser!(i64).range(100..=5000))]
    approach_ms: i64,

    /// how far off a click may be and still be judged (ms)
    #[clap(long, default_value_t = 300, value_parser = clap::value_parser!(i64).range(50..=1000))]
    hit_window_ms: i64,

    /// log level, or a RUST_LOG style filter such as `hitcircle::session=debug`
    #[clap(long, default_value = "info")]
    log_level: String,

    /// log file (defaults to the platform state dir)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// print the available maps and exit
    #[clap(long)]
    list_maps: bool,
}

impl Cli {
    fn maps_dir(&self) -> Option<PathBuf> {
        self.maps_dir.clone().or_else(AppDirs::maps_dir)
    }

    fn timing(&self) -> TargetTiming {
        TargetTiming {
            approach_ms: self.approach_ms,
            hit_window_ms: self.hit_window_ms,
        }
    }

    fn game_options(&self) -> GameOptions {
        GameOptions {
            scoring: self.scoring,
            click_policy: if self.free_order {
                ClickPolicy::Free
            } else {
                ClickPolicy::Strict
            },
            timing: self.timing(),
            maps_dir: self.maps_dir(),
            random_count: self.random_count,
            seed: self.seed,
        }
    }
}

fn print_maps(cli: &Cli, out: &mut impl Write) -> io::Result<()> {
    let maps_dir = cli.maps_dir();
    let sources = beatmap::catalog(maps_dir.as_deref(), cli.random_count, cli.seed);

    for source in sources {
        match &source {
            MapSource::Random { .. } => writeln!(out, "{}", source.label())?,
            _ => match source.load(cli.timing()) {
                Ok(map) => writeln!(
                    out,
                    "{:<40} {:>5} circles  {:>6.1}s  {}",
                    source.label(),
                    map.len(),
                    map.duration_ms() as f64 / 1000.0,
                    map.display_title()
                )?,
                Err(e) => writeln!(out, "{:<40} unreadable: {}", source.label(), e)?,
            },
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.list_maps {
        return Ok(print_maps(&cli, &mut io::stdout().lock())?);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = cli.log_file.clone().unwrap_or_else(AppDirs::log_path);
    if let Err(e) = logging::init_logger(&log_path, Some(&cli.log_level), LevelFilter::Info) {
        eprintln!("logging disabled: {e}");
    }

    let mut app = App::with_play_clock(cli.game_options(), Box::new(FileSettingsStore::new()));
    if let Some(path) = &cli.map {
        let map = Beatmap::load(path, cli.timing())?;
        app.play(map);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Exiting");
    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let ticker = SharedTicker::new(app.settings.clamped_tick_rate());
    let runner = Runner::new(CrosstermEventSource::new(), ticker.clone());

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let event = runner.step();
        let redraw = !matches!(event, GameEvent::Tick) || app.is_animating();

        if app.handle_event(event) == AppAction::Quit {
            break;
        }

        if app.take_bell() {
            let mut out = io::stdout();
            out.write_all(b"\x07")?;
            out.flush()?;
        }

        ticker.set_millis(app.settings.clamped_tick_rate());

        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}
