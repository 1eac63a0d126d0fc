mod app;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use archive_raid::config::{GameConfig, Mode};
use archive_raid::engine::{GameSession, GameSetup};
use archive_raid::puzzle::{encode_payload, load_questions};

use app::{draw::draw_ui, App, Flow};

const LOG_FILE: &str = "archive-raid.log";

#[derive(Parser)]
#[command(name = "archive-raid")]
#[command(about = "Find the hidden numbers, open the safe, escape the archive")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Room config (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Question pack: a TOML file or a directory of them
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// Share-link payload (base64 JSON)
    #[arg(short, long)]
    data: Option<String>,

    /// clue_hunt, trail or code_door
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Fixed RNG seed for a replayable game
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Turn a question pack into a share-link payload
    Share {
        /// TOML file or directory of question packs
        questions: PathBuf,

        /// Mode to bundle into the payload
        #[arg(short, long)]
        mode: Option<Mode>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    if let Some(Command::Share { questions, mode }) = &cli.command {
        return share(&cli, questions, *mode);
    }

    let setup = build_setup(&cli)?;
    let session = match cli.seed {
        Some(seed) => GameSession::with_seed(setup, seed)?,
        None => GameSession::new_game(setup)?,
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    result?;

    if app.session.is_escaped() {
        println!(
            "\nYou escaped the archive. The code was {}.\n",
            app.session.config().unlock_code
        );
    }
    Ok(())
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| draw_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            // Windows reports releases too.
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) == Flow::Quit {
                return Ok(());
            }
        }
    }
}

/// Config file first, then content, then `--mode` so the flag always wins
/// over a payload's bundled mode.
fn build_setup(cli: &Cli) -> Result<GameSetup> {
    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let mut setup = GameSetup::new(config);

    if let Some(path) = &cli.questions {
        setup = setup.with_questions(load_questions(path)?);
    }
    if let Some(data) = &cli.data {
        setup = setup.with_share_payload(data);
    }
    if let Some(mode) = cli.mode {
        setup.config.mode = mode;
    }
    Ok(setup)
}

fn share(cli: &Cli, questions: &Path, mode: Option<Mode>) -> Result<()> {
    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let pool = load_questions(questions)?;
    if pool.len() < config.clue_count() {
        bail!(
            "{} has {} questions, a room needs at least {}",
            questions.display(),
            pool.len(),
            config.clue_count()
        );
    }
    let payload = encode_payload(&pool, mode).context("encoding share payload")?;
    info!(questions = pool.len(), "share payload built");
    println!("{payload}");
    Ok(())
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_tracing() -> Result<()> {
    let path = std::env::temp_dir().join(LOG_FILE);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .init();
    Ok(())
}
