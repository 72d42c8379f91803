//! Opening outbound links outside the terminal.

use std::io;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use url::Url;

pub trait LinkOpener: Send {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Only absolute http(s) URLs are ever handed to the platform opener.
pub fn validate_link(raw: &str) -> io::Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to open {other}: link"),
        )),
    }
}

/// Hands URLs to the desktop's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, url: &str) -> io::Result<()> {
        let url = validate_link(url)?;
        let url = url.as_str();

        #[cfg(target_os = "macos")]
        let command = {
            let mut command = Command::new("open");
            command.arg(url);
            command
        };

        #[cfg(target_os = "windows")]
        let command = {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", "", url]);
            command
        };

        #[cfg(all(unix, not(target_os = "macos")))]
        let command = {
            let mut command = Command::new("xdg-open");
            command.arg(url);
            command
        };

        spawn_and_reap(command)?;
        tracing::info!(url, "Opened outbound link");
        Ok(())
    }
}

/// Spawn a launcher with null stdio and wait for it off the UI thread, so
/// exited launchers never linger as zombies.
fn spawn_and_reap(mut command: Command) -> io::Result<JoinHandle<()>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    thread::Builder::new()
        .name("link-opener".to_string())
        .spawn(move || match child.wait() {
            Ok(status) if !status.success() => {
                tracing::warn!(%status, "Link launcher exited with failure");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to wait for link launcher: {e}"),
        })
}

/// Records instead of opening. Shared handle so tests can inspect after the
/// opener has been moved into the app.
#[derive(Debug, Default, Clone)]
pub struct RecordingOpener {
    opened: Arc<Mutex<Vec<String>>>,
}

impl RecordingOpener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl LinkOpener for RecordingOpener {
    fn open(&self, url: &str) -> io::Result<()> {
        let url = validate_link(url)?;
        if let Ok(mut guard) = self.opened.lock() {
            guard.push(url.to_string());
        }
        Ok(())
    }
}
