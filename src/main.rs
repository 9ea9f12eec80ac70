use std::fs::{self, File};
use std::io::stdout;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ledit::config::{default_config_dir, ConfigManager};
use ledit::App;
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Log to a file so the terminal UI is left alone.
fn init_logging(config_dir: &Path) -> Result<()> {
    fs::create_dir_all(config_dir)
        .with_context(|| format!("Could not create '{}'", config_dir.display()))?;
    let log_path = config_dir.join("ledit.log");
    let file = File::create(&log_path)
        .with_context(|| format!("Could not create log file '{}'", log_path.display()))?;

    let filter = EnvFilter::try_from_env("LEDIT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn build_app(config_dir: &Path, files: &[String]) -> Result<App> {
    let mut config_manager = ConfigManager::new(config_dir);
    if let Err(err) = config_manager.load() {
        warn!(%err, "falling back to default config");
    }

    let mut app = App::new(config_manager.get_config().clone())?;
    for file in files {
        app.open(file).await?;
    }
    if !files.is_empty() {
        app.switch_to(0);
    }
    Ok(app)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Get command line arguments
    let files: Vec<String> = std::env::args().skip(1).collect();

    let config_dir = default_config_dir();
    if let Err(err) = init_logging(&config_dir) {
        eprintln!("Warning: logging disabled: {:#}", err);
    }
    info!(files = files.len(), "ledit starting");

    // Open files before touching the terminal so errors print normally
    let mut app = build_app(&config_dir, &files).await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    // Restore the terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        ratatui::crossterm::cursor::Show
    )?;

    // Handle any final errors
    match result {
        Ok(()) => {
            info!("ledit exiting");
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            Err(e)
        }
    }
}
