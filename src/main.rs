//! BRICKFALL - a falling block puzzle for the terminal
//!
//! Rows fill up, rows disappear, the pieces get faster.

mod field;
mod game;
mod generator;
mod highscore;
mod input;
mod piece;
mod score;
mod settings;
mod tetromino;
mod ui;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::Game;
use generator::PieceGenerator;
use highscore::FileHighScore;
use input::KeyBindings;
use piece::Piece;
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use std::io::{self, stdout};
use tracing_subscriber::filter::{Directive, LevelFilter};

/// Decorative pieces on the title screen
const TITLE_PIECES: usize = 4;

/// Get the brickfall temp directory, creating it if needed
fn brickfall_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("brickfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    let log_dir = brickfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let directive: Directive = "brickfall=debug"
        .parse()
        .unwrap_or_else(|_| LevelFilter::DEBUG.into());
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .with_ansi(false)
        .init();

    tracing::info!(
        "BRICKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();
    let keys = KeyBindings::from_settings(&settings);
    let store = FileHighScore::new(settings.high_score_path());
    tracing::info!("High score file: {}", store.path().display());
    let mut game = Game::new(store);

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app and capture result
    let result = run_app(&mut terminal, &mut game, &keys, &settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Err(e) = settings.save() {
        eprintln!("Warning: Could not save settings: {}", e);
    }

    if result.is_ok() {
        let score = &game.state().score;
        println!("\nThanks for playing BRICKFALL!");
        println!("Final Score: {}", score.points);
        println!("High Score: {} | Level: {}", score.high_score, score.level);
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game<FileHighScore>,
    keys: &KeyBindings,
    settings: &Settings,
) -> io::Result<()> {
    let mut generator = PieceGenerator::new();
    let title_pieces: Vec<Piece> = (0..TITLE_PIECES).map(|_| generator.generate()).collect();
    let frame_duration = settings.display.frame_duration();

    while !game.is_finished() {
        terminal.draw(|frame| ui::render(frame, game.state(), &settings.display, &title_pieces))?;

        // At most one action per step; a quiet frame still steps for gravity
        let mut action = None;
        if event::poll(frame_duration)? {
            if let Event::Key(key) = event::read()? {
                action = keys.action_for(key);
            }
        }
        game.step(action);
    }

    tracing::info!("Exiting with score {}", game.state().score.points);
    Ok(())
}
