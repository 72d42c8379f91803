//! Configuration for RideReady.
//!
//! `~/.rideready/config.toml` is optional. [`RideReadyConfig`] mirrors the
//! file as written (every section optional); [`Settings`] is the resolved view
//! the rest of the application uses, after defaults and environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use rideready_types::ui::UiOptions;
use rideready_types::{CuratedLists, DEFAULT_HISTORY_CAP};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

pub const ENV_BASE_URL: &str = "RIDEREADY_BASE_URL";
pub const ENV_SESSION_DIR: &str = "RIDEREADY_SESSION_DIR";

#[derive(Debug, Default, Deserialize)]
pub struct RideReadyConfig {
    pub server: Option<ServerConfig>,
    pub session: Option<SessionConfig>,
    pub app: Option<AppConfig>,
    pub curated: Option<CuratedLists>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionConfig {
    pub dir: Option<String>,
    pub history_cap: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for icons and spinners.
    #[serde(default)]
    pub ascii_only: bool,
    #[serde(default)]
    pub high_contrast: bool,
    /// Static skeletons instead of animated ones.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".rideready"))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Replace `${VAR}` with the variable's value (empty if unset).
///
/// An unterminated `${` is kept verbatim.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &rest[start + 2..start + 2 + len];
        if !name.is_empty() {
            out.push_str(&env::var(name).unwrap_or_default());
        }
        rest = &rest[start + 2 + len + 1..];
    }

    out.push_str(rest);
    out
}

/// Expand `~/` against the home directory.
fn expand_home(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map_or_else(|| PathBuf::from(raw), |home| home.join(rest)),
        None => PathBuf::from(raw),
    }
}

impl RideReadyConfig {
    /// Load the user config. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path).map(Some),
            _ => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!(path = %path.display(), "Failed to read config: {source}");
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map_err(|source| {
            tracing::warn!(path = %path.display(), "Failed to parse config: {source}");
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub session_dir: PathBuf,
    pub history_cap: usize,
    pub ui: UiOptions,
    pub curated: CuratedLists,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            session_dir: default_session_dir(),
            history_cap: DEFAULT_HISTORY_CAP,
            ui: UiOptions::default(),
            curated: CuratedLists::default(),
        }
    }
}

#[must_use]
pub fn default_session_dir() -> PathBuf {
    config_dir().map_or_else(|| PathBuf::from(".rideready/session"), |dir| dir.join("session"))
}

impl Settings {
    /// Resolve from the process environment.
    #[must_use]
    pub fn resolve(config: Option<&RideReadyConfig>) -> Self {
        Self::resolve_with(config, |name| env::var(name).ok())
    }

    /// Resolve with an explicit environment lookup. Precedence: env, file, default.
    #[must_use]
    pub fn resolve_with(
        config: Option<&RideReadyConfig>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut settings = Self::default();

        if let Some(config) = config {
            if let Some(server) = &config.server {
                if let Some(url) = server.base_url.as_deref().map(expand_env_vars) {
                    settings.base_url = url;
                }
                if let Some(secs) = server.timeout_secs {
                    settings.timeout = Duration::from_secs(secs.max(1));
                }
                if let Some(secs) = server.connect_timeout_secs {
                    settings.connect_timeout = Duration::from_secs(secs.max(1));
                }
            }
            if let Some(session) = &config.session {
                if let Some(dir) = session.dir.as_deref() {
                    settings.session_dir = expand_home(&expand_env_vars(dir));
                }
                if let Some(cap) = session.history_cap {
                    settings.history_cap = cap.max(1);
                }
            }
            if let Some(app) = &config.app {
                settings.ui = UiOptions {
                    ascii_only: app.ascii_only,
                    high_contrast: app.high_contrast,
                    reduced_motion: app.reduced_motion,
                };
            }
            if let Some(curated) = &config.curated {
                settings.curated = curated.clone();
            }
        }

        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            settings.base_url = url.trim().to_string();
        }
        if let Some(dir) = lookup(ENV_SESSION_DIR).filter(|v| !v.trim().is_empty()) {
            settings.session_dir = expand_home(dir.trim());
        }

        settings.base_url = settings.base_url.trim_end_matches('/').to_string();
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_SESSION_DIR, RideReadyConfig, Settings,
        expand_env_vars,
    };
    use std::path::PathBuf;
    use std::time::Duration;

    fn parse(toml: &str) -> RideReadyConfig {
        toml::from_str(toml).unwrap()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn expand_env_vars_replaces_known_and_blanks_unknown() {
        unsafe {
            std::env::set_var("RIDEREADY_TEST_HOST", "advisor.local");
            std::env::remove_var("RIDEREADY_TEST_MISSING");
        }
        assert_eq!(
            expand_env_vars("http://${RIDEREADY_TEST_HOST}:${RIDEREADY_TEST_MISSING}5000"),
            "http://advisor.local:5000"
        );
        unsafe {
            std::env::remove_var("RIDEREADY_TEST_HOST");
        }
    }

    #[test]
    fn expand_env_vars_keeps_unclosed_brace() {
        assert_eq!(expand_env_vars("a ${OPEN"), "a ${OPEN");
        assert_eq!(expand_env_vars("a ${} b"), "a  b");
        assert_eq!(expand_env_vars("no vars"), "no vars");
    }

    #[test]
    fn empty_config_resolves_to_defaults() {
        let settings = Settings::resolve_with(Some(&parse("")), no_env);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.timeout, Duration::from_secs(20));
        assert_eq!(settings.history_cap, 10);
        assert!(!settings.ui.ascii_only);
        assert_eq!(settings.curated.global.len(), 3);
    }

    #[test]
    fn file_values_apply_and_clamp() {
        let config = parse(
            r#"
            [server]
            base_url = "http://10.0.0.2:8080/"
            timeout_secs = 0

            [session]
            dir = "/tmp/rr-session"
            history_cap = 0

            [app]
            ascii_only = true

            [curated]
            global = ["suzuki_sv650"]

            [curated.by_type]
            touring = ["bmw_r1250rt"]
            "#,
        );
        let settings = Settings::resolve_with(Some(&config), no_env);
        assert_eq!(settings.base_url, "http://10.0.0.2:8080");
        assert_eq!(settings.timeout, Duration::from_secs(1));
        assert_eq!(settings.session_dir, PathBuf::from("/tmp/rr-session"));
        assert_eq!(settings.history_cap, 1);
        assert!(settings.ui.ascii_only);
        assert_eq!(settings.curated.global, ["suzuki_sv650"]);
        assert_eq!(settings.curated.by_type["touring"], ["bmw_r1250rt"]);
    }

    #[test]
    fn env_overrides_file() {
        let config = parse("[server]\nbase_url = \"http://file:1\"\n");
        let settings = Settings::resolve_with(Some(&config), |name| match name {
            ENV_BASE_URL => Some("http://env:2".to_string()),
            ENV_SESSION_DIR => Some("/var/tmp/rr".to_string()),
            _ => None,
        });
        assert_eq!(settings.base_url, "http://env:2");
        assert_eq!(settings.session_dir, PathBuf::from("/var/tmp/rr"));
    }

    #[test]
    fn load_from_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nbase_url = 1").unwrap();

        let err = RideReadyConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), path);
    }

    #[test]
    fn load_from_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RideReadyConfig::load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
