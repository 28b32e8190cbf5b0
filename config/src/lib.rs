//! Configuration loading, parsing, and persistence for Tally.
//!
//! The config file lives at `~/.tally/config.toml`. Every section and key is
//! optional; a missing file means defaults.
//!
//! ```toml
//! [app]
//! ascii_only = false
//! high_contrast = false
//! reduced_motion = false
//! data_dir = "/path/to/roster/dir"
//!
//! [practice]
//! difficulty = "easy"
//! double_click_ms = 400
//! show_hint = false
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tally_types::Difficulty;
use tally_types::ui::{DEFAULT_DOUBLE_CLICK, UiOptions};
use tally_utils::{AtomicWriteOptions, FileSyncPolicy, atomic_write_with_options};
use thiserror::Error;

/// Accepted double-click window, in milliseconds.
const DOUBLE_CLICK_RANGE_MS: (u64, u64) = (100, 2000);

#[derive(Debug, Default, Deserialize)]
pub struct TallyConfig {
    pub app: Option<AppConfig>,
    pub practice: Option<PracticeConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for shapes and arrows.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable modal animations and motion effects.
    #[serde(default)]
    pub reduced_motion: bool,
    /// Directory holding `players.json`. Defaults to `~/.tally`.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PracticeConfig {
    pub difficulty: Option<Difficulty>,
    pub double_click_ms: Option<u64>,
    /// Open the counting aid with every new problem.
    #[serde(default)]
    pub show_hint: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("config at {} is not editable TOML: {source}", path.display())]
    Edit {
        path: PathBuf,
        source: toml_edit::TomlError,
    },
    #[error("failed to write config at {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Edit { path, .. }
            | ConfigError::Write { path, .. } => path,
        }
    }
}

impl TallyConfig {
    /// Load from the default location. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!(path = %path.display(), "Failed to read config: {source}");
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map(Some).map_err(|source| {
            tracing::warn!(path = %path.display(), "Failed to parse config: {source}");
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        let app = self.app.as_ref();
        UiOptions {
            ascii_only: app.is_some_and(|app| app.ascii_only),
            high_contrast: app.is_some_and(|app| app.high_contrast),
            reduced_motion: app.is_some_and(|app| app.reduced_motion),
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.practice
            .as_ref()
            .and_then(|practice| practice.difficulty)
            .unwrap_or_default()
    }

    /// Double-activation window, clamped to a usable range.
    #[must_use]
    pub fn double_click_window(&self) -> Duration {
        let (min, max) = DOUBLE_CLICK_RANGE_MS;
        self.practice
            .as_ref()
            .and_then(|practice| practice.double_click_ms)
            .map_or(DEFAULT_DOUBLE_CLICK, |ms| {
                Duration::from_millis(ms.clamp(min, max))
            })
    }

    #[must_use]
    pub fn show_hint(&self) -> bool {
        self.practice
            .as_ref()
            .is_some_and(|practice| practice.show_hint)
    }

    /// Directory for the player roster: `[app] data_dir`, else `~/.tally`.
    #[must_use]
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.app
            .as_ref()
            .and_then(|app| app.data_dir.clone())
            .or_else(tally_home)
    }
}

/// Set `practice.difficulty` in the file at `path`.
///
/// Uses `toml_edit` to preserve comments and formatting.
/// Creates the file and parent directory if they don't exist.
pub fn persist_difficulty_at(path: &Path, difficulty: Difficulty) -> Result<(), ConfigError> {
    let content = if path.exists() {
        fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        String::new()
    };

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|source| ConfigError::Edit {
            path: path.to_path_buf(),
            source,
        })?;

    if doc.get("practice").is_some_and(|item| !item.is_table_like()) {
        tracing::warn!(path = %path.display(), "Replacing non-table `practice` entry in config");
        doc.remove("practice");
    }
    let practice = doc
        .entry("practice")
        .or_insert(toml_edit::Item::Table(toml_edit::Table::new()));
    if let Some(table) = practice.as_table_like_mut() {
        table.insert("difficulty", toml_edit::value(difficulty.as_str()));
    }

    let serialized = doc.to_string();
    atomic_write_with_options(
        path,
        serialized.as_bytes(),
        AtomicWriteOptions {
            file_sync: FileSyncPolicy::SyncAll,
            create_parent_dirs: true,
        },
    )
    .map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), difficulty = difficulty.as_str(), "Persisted difficulty");
    Ok(())
}

/// `~/.tally`, home of the config file, roster and logs.
#[must_use]
pub fn tally_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tally"))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    tally_home().map(|home| home.join("config.toml"))
}
