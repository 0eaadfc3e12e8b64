//! Threadcache - a terminal user interface for wardrobe management.
//!
//! This application provides a fast, keyboard-driven interface for
//! browsing and managing clothing items and outfits, backed by a
//! remote wardrobe API with a local cache for offline use.

mod api;
mod app;
mod auth;
mod cache;
mod config;
mod models;
mod seed;
mod ui;
mod utils;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name inside the cache directory
const LOG_FILE: &str = "threadcache.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a file in the cache directory since stderr belongs to the
/// TUI. Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
/// The returned guard must stay alive for the duration of the program.
fn init_tracing(log_dir: &PathBuf) -> tracing_appender::non_blocking::WorkerGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--export" {
        return export_wardrobe();
    }

    // Initialize logging into the cache directory
    let config = config::Config::load().unwrap_or_default();
    let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
    std::fs::create_dir_all(&cache_dir)?;
    let _log_guard = init_tracing(&cache_dir);
    info!("Threadcache starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new().await?;

    // Load cached data first (for display behind login)
    let _ = app.load_from_cache().await;

    if app.offline_mode {
        // Offline: the cache is the wardrobe; seed a fresh install
        app.seed_if_empty();
    } else if !app.is_authenticated() {
        app.start_login();
    } else if app.is_cache_stale() {
        // Start background refresh if cache is stale
        app.refresh_all_background().await;
    }

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Threadcache shutting down");
    Ok(())
}

/// Dump the cached wardrobe to stdout as JSON.
/// Useful for backups and for piping into other tools.
fn export_wardrobe() -> Result<()> {
    use serde::Serialize;

    let config = config::Config::load()?;
    let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
    let cache = cache::CacheManager::new(cache_dir)?;

    let items = cache.load_items()?.map(|c| c.data).unwrap_or_default();
    let outfits = cache.load_outfits()?.map(|c| c.data).unwrap_or_default();

    eprintln!("Exporting {} items and {} outfits", items.len(), outfits.len());

    #[derive(Serialize)]
    struct Export {
        items: Vec<models::ClothingItem>,
        outfits: Vec<models::Outfit>,
    }

    let json = serde_json::to_string_pretty(&Export { items, outfits })?;
    println!("{}", json);

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks().await;

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
