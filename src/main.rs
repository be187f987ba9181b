//! blocktris terminal front end

use blocktris::game::{Action, Game, GameEvent, GameState};
use blocktris::input::InputHandler;
use blocktris::settings::Settings;
use blocktris::ui;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, Write, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Get the blocktris temp directory, creating it if needed
fn temp_dir() -> io::Result<PathBuf> {
    let dir = std::env::temp_dir().join("blocktris");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Open the session log file, or discard logs if it cannot be created
fn log_writer(log_file: &str) -> (Box<dyn Write + Send>, Option<PathBuf>) {
    let appender = temp_dir().ok().and_then(|dir| {
        RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(log_file)
            .build(&dir)
            .ok()
            .map(|appender| (appender, dir.join(log_file)))
    });
    match appender {
        Some((appender, path)) => (Box::new(appender), Some(path)),
        None => (Box::new(io::sink()), None),
    }
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();

    // Log to a file so the terminal UI stays clean
    let log_file = format!("{:08x}.log", session_id);
    let (writer, log_path) = log_writer(&log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blocktris=debug"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    match &log_path {
        Some(path) => tracing::info!(
            "blocktris starting up, session={:08x}, log={}",
            session_id,
            path.display()
        ),
        None => eprintln!("blocktris: could not create a log file, logging disabled"),
    }

    let settings = Settings::load();
    let config = settings.game.to_config_or_default();
    let game = match settings.game.seed {
        Some(seed) => Game::with_seed(config, seed),
        None => Game::new(config),
    };

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, game, &settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    match &result {
        Ok(game) => {
            println!("\nThanks for playing blocktris!");
            println!("Final Score: {}", game.score().points);
            println!("Lines: {}", game.score().lines);
        }
        Err(e) => {
            tracing::error!("exiting with error: {}", e);
            eprintln!("blocktris stopped: {}", e);
        }
    }

    result.map(|_| ())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut game: Game,
    settings: &Settings,
) -> io::Result<Game> {
    let input = InputHandler::from_settings(settings);
    let mut last_frame = Instant::now();
    let mut dirty = true;

    loop {
        for event in game.take_events() {
            match event {
                GameEvent::Redraw => dirty = true,
                GameEvent::ScoreChanged(total) => tracing::info!(total, "score changed"),
                GameEvent::LinesCleared(rows) => tracing::debug!(rows, "lines cleared"),
                GameEvent::GameOver => {
                    tracing::info!(score = game.score().points, "game over");
                    dirty = true;
                }
            }
        }

        if dirty {
            terminal.draw(|frame| ui::render_game(frame, &game, settings))?;
            dirty = false;
        }

        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = input.key_down(key) {
                        if action == Action::Quit {
                            tracing::info!("quit requested");
                            return Ok(game);
                        }
                        let before = game.state();
                        game.process_action(action).map_err(io::Error::other)?;
                        if game.state() != before {
                            dirty = true;
                        }
                    }
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_frame);
        last_frame = now;
        if game.state() == GameState::Running {
            game.advance(elapsed).map_err(io::Error::other)?;
        }
    }
}
