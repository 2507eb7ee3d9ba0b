//! PDF Quote Saver - User settings module
//!
//! Loads the optional settings file, falling back to built-in defaults

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Directory name under the platform config dir
const APP_DIR_NAME: &str = "pdf-quote-saver";

/// Settings file name
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Settings error type
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Word document that receives saved quotes
    pub output_path: PathBuf,
    /// Heading written when the document is first created
    pub heading: String,
    /// Directories searched (in order) for the focused PDF
    pub search_dirs: Vec<PathBuf>,
    /// Maximum recursion depth below each search directory
    pub max_search_depth: usize,
    /// Clipboard polling interval (milliseconds)
    pub poll_interval_ms: u64,
    /// Sleep after an unexpected error (milliseconds)
    pub error_backoff_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_path: documents_dir().join("Saved Quotes.docx"),
            heading: "Saved Quotes".to_string(),
            search_dirs: default_search_dirs(),
            max_search_depth: 32,
            poll_interval_ms: 500,
            error_backoff_ms: 1000,
        }
    }
}

impl Settings {
    /// Load settings from the default location
    ///
    /// A missing or unreadable file yields the defaults.
    pub fn load() -> Self {
        match settings_path() {
            Some(path) => Self::load_or_default(&path),
            None => {
                log::debug!("No config directory available, using default settings");
                Settings::default()
            }
        }
    }

    /// Load settings from `path`, logging and falling back to defaults on failure
    pub fn load_or_default(path: &Path) -> Self {
        if !path.is_file() {
            return Settings::default();
        }

        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Settings loaded from {:?}", path);
                settings
            }
            Err(e) => {
                log::warn!("Failed to load settings from {:?}: {}, using defaults", path, e);
                Settings::default()
            }
        }
    }

    /// Load settings from `path`
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }
}

/// Location of the settings file, if the platform has a config dir
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn documents_dir() -> PathBuf {
    dirs::document_dir().unwrap_or_else(|| home_dir().join("Documents"))
}

/// Documents, Downloads and Desktop, in that order
fn default_search_dirs() -> Vec<PathBuf> {
    vec![
        documents_dir(),
        dirs::download_dir().unwrap_or_else(|| home_dir().join("Downloads")),
        dirs::desktop_dir().unwrap_or_else(|| home_dir().join("Desktop")),
    ]
}
