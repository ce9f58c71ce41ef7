//! Pitch Writer TUI Entry Point
//!
//! Usage:
//!   pitch-tui [OPTIONS]
//!
//! Options:
//!   --config <FILE>   Configuration file (default: ~/.config/pitch-writer/config.toml)
//!   --headless        Generate once and print to stdout (with --company, --problem,
//!                     --solution, --ask, --tone)
//!   --short-delay-ms <MS>, --long-delay-ms <MS>
//!                     Per-word delays for headline/subhead and body words
//!   --instant         Stream without pacing delays

use std::io;
use std::panic;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pitch_conductor::{load_config, load_config_from_path};
use pitch_tui::cli::Args;
use pitch_tui::headless::run_headless;
use pitch_tui::App;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Set up logging on stderr so it never lands in the alternate screen
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut config = match args.config.clone() {
        Some(path) => load_config_from_path(Some(path)),
        None => load_config(),
    }
    .context("Failed to load configuration")?;
    args.overrides().apply(&mut config);
    tracing::debug!(source = %config.source(), "Configuration loaded");

    if args.headless {
        let input = args.input(config.default_tone);
        let ok = run_headless(config, &input, &mut io::stdout(), &mut io::stderr()).await?;
        return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: pitch-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("For non-interactive use, run a single generation instead:");
        eprintln!("  pitch-tui --headless --company .. --problem .. --solution .. --ask ..");
        return Ok(ExitCode::FAILURE);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let mut app = App::new(config);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Propagate any errors
    result.map(|()| ExitCode::SUCCESS)
}
