//! # Termfolio CLI Entry Point
//!
//! This is the main entry point for the Termfolio TUI application.
//!
//! ## Overview
//!
//! Termfolio renders a terminal-styled portfolio page in your terminal and
//! drives it with the same interaction controller the browser build uses:
//! the window controls minimize the terminal panel, the sidebar collapses
//! into a menu on narrow terminals, and the friend-links corner expands on
//! click and rotates with the mouse wheel.
//!
//! ## Usage
//!
//! ```bash
//! # Use the default config (~/.config/termfolio/config.json)
//! termfolio
//!
//! # Use a specific config file
//! termfolio --config ./friends.json
//!
//! # Write tracing output to a file
//! RUST_LOG=termfolio=debug termfolio --log-file /tmp/termfolio.log
//!
//! # Debug mode - print the bound page and resolved config, then exit
//! termfolio --debug
//! ```
//!
//! ## Key Bindings
//!
//! - `q` / `Esc` - Quit the application
//! - `j` / `Down`, `k` / `Up` - Scroll the page
//! - `PageDown` / `PageUp` - Scroll by a screen
//! - `Ctrl+`` ` - Minimize or restore the terminal panel
//!
//! Mouse clicks, wheel and hover are forwarded to the element under the
//! cursor.

use termfolio::page::Dom;
use termfolio::ui::{self, config::Config, App};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Longest wait for input before the page clock is advanced again.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Trait for reading terminal events (allows dependency injection for testing)
trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(event::read().context("Failed to read terminal event")?))
        } else {
            Ok(None)
        }
    }
}

/// Termfolio - a terminal-styled portfolio page, in your terminal
#[derive(Parser, Debug)]
#[command(name = "termfolio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse a terminal-styled portfolio page from the terminal", long_about = None)]
struct Args {
    /// Path to the config file (defaults to the platform config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write log output to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Print the bound page and resolved config, then exit
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up panic hook to ensure terminal is restored on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Try to restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);

        // Call the original panic hook
        original_hook(panic_info);
    }));

    // Run the application and ensure cleanup happens
    let result = run_application(args).await;

    // Restore panic hook
    let _ = panic::take_hook();

    result
}

/// Install a file-backed `tracing` subscriber. The TUI owns stdout, so
/// nothing is logged without a file.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("termfolio=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::load_from(path)
        }
        None => Ok(Config::load()),
    }
}

async fn run_application(args: Args) -> Result<()> {
    if let Some(ref log_file) = args.log_file {
        init_logging(log_file)?;
    }

    let config = load_config(args.config.as_deref())?;

    let (columns, _) = crossterm::terminal::size().unwrap_or((80, 24));

    // Debug mode: print the bound page and exit
    if args.debug {
        let app = App::new(&config, columns).context("Failed to bind the portfolio page")?;
        println!("=== Page ({} px wide) ===", app.doc().viewport_width());
        print!("{}", app.doc().outline());
        println!("\n=== Config ===");
        println!(
            "{}",
            serde_json::to_string_pretty(&config).context("Failed to serialize config")?
        );
        for message in app.doc().console_messages() {
            println!("\nconsole: {}", message);
        }
        return Ok(());
    }

    let mut app = App::new(&config, columns).context("Failed to bind the portfolio page")?;
    info!(theme = app.theme.name, columns, "starting");

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode for terminal")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Run the app and ensure cleanup happens even on error
    let mut event_reader = CrosstermEventReader;
    let run_result = run_app(&mut terminal, &mut app, &mut event_reader).await;

    // Restore terminal (always runs, even if run_app failed)
    let cleanup_result = cleanup_terminal(&mut terminal);

    // Return the first error that occurred, or Ok if both succeeded
    run_result?;
    cleanup_result?;

    Ok(())
}

/// Clean up terminal state
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;

    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}

/// How long to wait for input: until the next deferred page task, capped
/// at [`IDLE_POLL`].
fn poll_timeout(app: &App) -> Duration {
    let mut timeout = IDLE_POLL;
    if let Some(due) = app.controller.next_due() {
        timeout = timeout.min(due);
    }
    if app.has_pending_transition() {
        timeout = timeout.min(Duration::from_millis(16));
    }
    timeout
}

/// Feed events and elapsed time to the app until it asks to quit. The loop
/// is generic over the backend so tests can drive it with `TestBackend`.
async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_reader: &mut dyn EventReader,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut last_tick = Instant::now();

    loop {
        let now = Instant::now();
        app.tick(now.duration_since(last_tick));
        last_tick = now;

        let mut layout = None;
        terminal
            .draw(|f| layout = Some(ui::render(f, app)))
            .context("Failed to draw terminal UI")?;
        if let Some(layout) = layout {
            app.set_layout(layout);
        }

        let event = event_reader.read_event(poll_timeout(app))?;

        // If no event, continue the loop (re-render after advancing the clock)
        let event = match event {
            Some(e) => e,
            None => continue,
        };

        debug!(?event, "terminal event");
        app.handle_event(&event);

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
