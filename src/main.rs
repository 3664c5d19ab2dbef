//! COMBOTRIS - falling blocks with combo scoring
//!
//! Clear lines back to back to keep the combo alive.

mod audio;
mod board;
mod config;
mod effects;
mod game;
mod highscore;
mod input;
mod menu;
mod piece;
mod random;
mod score;
mod settings;
mod tetromino;
mod ui;

use audio::AudioManager;
use config::GameConfig;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use effects::Particles;
use game::Game;
use highscore::HighScoreStore;
use input::{InputHandler, Intent};
use menu::GameOverSummary;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};
use tracing_subscriber::{EnvFilter, filter::Directive};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Totals kept across games for the stats panel and the exit message
#[derive(Debug, Default)]
struct Records {
    games_played: u32,
    best_score: u64,
    last: Option<GameOverSummary>,
}

/// How a session ended
enum Outcome {
    Finished,
    Quit,
}

/// Get the combotris temp directory, creating it if needed
fn combotris_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("combotris");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    let log_dir = combotris_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "combotris=debug".parse::<Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "COMBOTRIS starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();

    let store = HighScoreStore::locate().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to a high score file in the working directory");
        HighScoreStore::at("highscore.txt")
    });
    let mut records = Records {
        best_score: store.load(),
        ..Records::default()
    };
    tracing::info!(best = records.best_score, path = %store.path().display(), "high score loaded");

    // Initialize audio (optional - game works without audio)
    let audio = AudioManager::new(settings.sfx_gain());

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &settings, &store, audio.as_ref(), &mut records);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "terminal error");
        return result;
    }

    println!("\nThanks for playing COMBOTRIS!");
    if let Some(last) = records.last {
        println!("Final Score: {}", last.score);
        println!("Level: {} | Lines: {}", last.level, last.lines);
    }
    println!("Games played: {} | Best: {}", records.games_played, records.best_score);
    tracing::info!(games = records.games_played, best = records.best_score, "shutting down");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &Settings,
    store: &HighScoreStore,
    audio: Option<&AudioManager>,
    records: &mut Records,
) -> io::Result<()> {
    let mut input = InputHandler::from_settings(settings);
    let mut game = Game::new(GameConfig::default(), records.best_score);

    loop {
        // Every session, including a restart, begins at the start screen
        if !menu::show_start_screen(terminal, &input, game.best_score)? {
            return Ok(());
        }
        game.start();
        input.clear();

        let outcome = play(terminal, &mut game, &mut input, settings, audio, records.games_played)?;

        let summary = GameOverSummary {
            score: game.score.points,
            best_score: game.best_score,
            new_best: game.new_best,
            lines: game.score.lines,
            level: game.score.level,
        };
        records.last = Some(summary);

        if let Outcome::Quit = outcome {
            tracing::info!(score = summary.score, "quit mid-game");
            return Ok(());
        }

        records.games_played += 1;
        records.best_score = game.best_score;
        if game.new_best {
            match store.save(game.best_score) {
                Ok(()) => tracing::info!(score = game.best_score, "new high score saved"),
                Err(e) => tracing::warn!(error = %e, "could not save high score"),
            }
        }

        if !menu::show_game_over_screen(terminal, &input, &summary)? {
            return Ok(());
        }
        game.restart();
    }
}

/// Run one session until game over or quit
fn play(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
    input: &mut InputHandler,
    settings: &Settings,
    audio: Option<&AudioManager>,
    games_played: u32,
) -> io::Result<Outcome> {
    let mut particles = Particles::new();
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| ui::render_game(frame, game, &particles, settings, games_played))?;

        let mut intents = Vec::new();
        let deadline = last_frame + FRAME_DURATION;
        let mut timeout = deadline.saturating_duration_since(Instant::now());
        while event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.kind {
                    KeyEventKind::Release => input.key_up(key),
                    _ => intents.extend(input.key_down(key)),
                }
            }
            timeout = Duration::ZERO;
        }
        intents.extend(input.update());

        for intent in intents {
            match intent {
                Intent::Play(action) => game.push_action(action),
                Intent::Quit => return Ok(Outcome::Quit),
                Intent::Confirm => {}
            }
        }

        let now = Instant::now();
        game.tick(now.duration_since(last_frame));
        last_frame = now;

        let cues = game.drain_cues();
        if let Some(audio) = audio {
            audio.play_all(&cues);
        }

        let effects = game.drain_effects();
        if settings.visual.particles {
            particles.spawn(&effects);
        }
        particles.update();

        if game.is_over() {
            return Ok(Outcome::Finished);
        }
    }
}
