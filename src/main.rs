use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::{fs::File, io, sync::Arc, sync::Mutex};

use anyhow::Context;
use clap::Parser;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod background;
mod cli;
mod config;
mod error;
mod screen;
mod weather;
mod weatherapi;

use crate::app::run_app;
use crate::cli::Args;
use crate::config::Config;
use crate::screen::WeatherScreen;
use crate::weatherapi::WeatherClient;

/// stdout belongs to the TUI, so logs go to a file.
fn init_logging(config: &Config) -> Result<(), error::Error> {
    let file = File::create(&config.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_args(Args::parse());
    init_logging(&config)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;

    if !config.has_api_key() {
        warn!("No API key configured; requests will be rejected by the provider");
    }
    let client = WeatherClient::new(config.api_key.clone())?.with_base_url(&config.base_url);
    let screen = WeatherScreen::new(&config.default_city);
    info!("Starting with {}", config.default_city);

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let res = run_app(&mut terminal, screen, Arc::new(client));

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    report(res)
}

/// Called once the terminal is restored, so the error lands on a normal screen.
fn report(res: io::Result<()>) -> anyhow::Result<()> {
    if let Err(ref err) = res {
        error!("Event loop failed: {err}");
    }
    res.context("event loop failed")
}

#[test]
fn test_report_keeps_failure() {
    let err = report(Err(io::Error::other("tty gone"))).unwrap_err();
    assert_eq!(err.to_string(), "event loop failed");
    assert_eq!(err.root_cause().to_string(), "tty gone");
    assert!(report(Ok(())).is_ok());
}
