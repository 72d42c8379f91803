//! RideReady CLI - binary entry point and terminal session management.
//!
//! The CLI wires [`rideready_engine`] (application state) to
//! [`rideready_tui`] (rendering) and owns the terminal for the lifetime of
//! the process.
//!
//! # Event Loop
//!
//! A fixed 8ms render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`rideready_tui::InputPump`])
//! 3. Advance application state (`app.tick()`), which collects finished
//!    recommendation and chat tasks
//! 4. Render frame

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, OpenOptions},
    io::{Stdout, Write, stdout},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use rideready_config::{RideReadyConfig, Settings, config_dir};
use rideready_engine::{App, SystemOpener};
use rideready_tui::{InputPump, draw, handle_events};

/// Help a new rider pick a first motorcycle.
#[derive(Debug, Parser)]
#[command(name = "rideready", version, about)]
struct Args {
    /// Advisor server base URL (overrides config and RIDEREADY_BASE_URL).
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Directory for session files (overrides config and RIDEREADY_SESSION_DIR).
    #[arg(long, value_name = "DIR")]
    session_dir: Option<PathBuf>,

    /// Use ASCII glyphs only.
    #[arg(long)]
    ascii: bool,

    /// Use the high-contrast palette.
    #[arg(long)]
    high_contrast: bool,
}

impl Args {
    fn apply(self, settings: &mut Settings) {
        if let Some(server) = self.server {
            settings.base_url = server.trim().trim_end_matches('/').to_string();
        }
        if let Some(dir) = self.session_dir {
            settings.session_dir = dir;
        }
        settings.ui.ascii_only |= self.ascii;
        settings.ui.high_contrast |= self.high_contrast;
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Writing to stdout/stderr would corrupt the TUI; drop logs instead.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.rideready/logs/rideready.log
    if let Some(dir) = config_dir() {
        candidates.push(dir.join("logs").join("rideready.log"));
    }

    // Fallback: ./.rideready/logs/rideready.log
    candidates.push(PathBuf::from(".rideready").join("logs").join("rideready.log"));

    candidates
}

fn load_settings(args: Args) -> Settings {
    let config = match RideReadyConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %e.path().display(), error = %e, "Ignoring unreadable config");
            None
        }
    };
    let mut settings = Settings::resolve(config.as_ref());
    args.apply(&mut settings);
    settings
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode, bracketed paste and the alternate screen are restored even
/// after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, EnableBracketedPaste) {
            let _ = disable_raw_mode();
            let _ = execute!(out, LeaveAlternateScreen, DisableBracketedPaste);
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen, DisableBracketedPaste);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        );
        let _ = Write::flush(self.terminal.backend_mut());
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let settings = load_settings(args);
    tracing::info!(
        server = %settings.base_url,
        session_dir = %settings.session_dir.display(),
        "Starting RideReady"
    );

    let mut app = App::from_settings(&settings, Box::new(SystemOpener))
        .with_context(|| format!("invalid server URL: {}", settings.base_url))?;
    app.startup().await;

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app).await
    };

    if let Err(err) = &result {
        tracing::error!(error = ?err, "Event loop failed");
    }
    result
}

const FRAME_DURATION: Duration = Duration::from_millis(8);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        match handle_events(app, &mut input) {
            Ok(true) => break Ok(()),
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        app.tick();

        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
