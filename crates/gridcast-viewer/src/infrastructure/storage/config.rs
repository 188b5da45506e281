//! TOML-based configuration for the viewer.
//!
//! Reads and writes [`ViewerConfig`] at the platform-appropriate path:
//! - Windows:  `%APPDATA%\Gridcast\viewer.toml`
//! - Linux:    `$XDG_CONFIG_HOME/gridcast/viewer.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/Gridcast/viewer.toml`
//!
//! Example file:
//!
//! ```toml
//! [playback]
//! refresh = "each-command"
//! allow_unterminated = false
//!
//! [render]
//! format = "json"
//! frame_separator = true
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Every section and field is optional; anything absent takes its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::play_stream::{PlaybackOptions, RefreshPolicy};
use crate::infrastructure::renderer::RenderFormat;

const CONFIG_FILE_NAME: &str = "viewer.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level viewer configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ViewerConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    #[serde(default = "default_refresh")]
    pub refresh: RefreshPolicy,
    /// Render a stream that ends without `0xFF` instead of failing.
    #[serde(default = "default_true")]
    pub allow_unterminated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderConfig {
    #[serde(default = "default_format")]
    pub format: RenderFormat,
    /// Text format only: draw a `===` line between frames.
    #[serde(default = "default_true")]
    pub frame_separator: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_refresh() -> RefreshPolicy {
    RefreshPolicy::EndOfStream
}
fn default_true() -> bool {
    true
}
fn default_format() -> RenderFormat {
    RenderFormat::Text
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            refresh: default_refresh(),
            allow_unterminated: default_true(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            frame_separator: default_true(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ViewerConfig {
    pub fn playback_options(&self) -> PlaybackOptions {
        PlaybackOptions {
            refresh: self.playback.refresh,
            allow_unterminated: self.playback.allow_unterminated,
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the config from the default location, returning
/// `ViewerConfig::default()` if the file does not yet exist.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<ViewerConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads the config at `path`, returning `ViewerConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<ViewerConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ViewerConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads the config at `path`, which must exist.  Used for an explicit
/// `--config` argument.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read (including when it
/// is missing) and [`ConfigError::Parse`] if the TOML is malformed.
pub fn read_config_file(path: &Path) -> Result<ViewerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &ViewerConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory, including the `gridcast` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Gridcast"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Gridcast")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("gridcast"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
