//! User settings: `~/.config/tablado/settings.toml`.
//!
//! Every field has a default, so a missing or partial file is fine. CLI
//! flags take precedence over anything read here.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tablado_catalog::DEFAULT_THRESHOLD;

/// Default minimum duration before a winner is held for review (15 minutes).
pub const DEFAULT_MIN_DURATION_SECS: u64 = 15 * 60;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error reading {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("Invalid settings in {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sync: SyncSettings,
    pub paths: PathSettings,
    pub matching: MatchingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Channel or playlist to sync from.
    pub channel_url: Option<String>,
    /// Winners shorter than this are deferred for review.
    pub min_duration_secs: u64,
    /// yt-dlp executable.
    pub ytdlp: PathBuf,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            channel_url: None,
            min_duration_secs: DEFAULT_MIN_DURATION_SECS,
            ytdlp: PathBuf::from("yt-dlp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub state_dir: PathBuf,
    pub output_dir: PathBuf,
    pub catalog: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        let videos = dirs::video_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            state_dir: data.join("tablado"),
            output_dir: videos.join("tablado"),
            catalog: config_dir().join("catalog.yaml"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    pub threshold: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tablado")
}

/// Canonical path to the settings file.
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

impl Settings {
    /// Load from the canonical path.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&settings_path())
    }

    /// Load from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(SettingsError::Io {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };
        toml::from_str(&contents).map_err(|e| SettingsError::Parse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Write these settings to `path` unless a file already exists there.
    /// Returns whether a file was written.
    pub fn write_if_missing(&self, path: &Path) -> io::Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(io::Error::other)?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(true)
    }

    pub fn to_toml_string(&self) -> Option<String> {
        toml::to_string_pretty(self).ok()
    }
}

/// Use the CLI value when given, otherwise the settings value.
pub fn resolve<T>(cli_override: Option<T>, configured: T) -> T {
    cli_override.unwrap_or(configured)
}
