//! Settings for the `locate` binary.
//!
//! Loaded from an optional JSON file; every field has a default so an empty
//! object (or no file at all) is a valid configuration. Command-line flags
//! override whatever the file says.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LocateError, Result};
use crate::geo::Coordinate;
use crate::location::{BuiltinDataset, DatasetSource, JsonDataset, Origin};

pub const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
pub const MAX_TOP_K: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Length of the "most common" lists on listing pages.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Start point for "from me" routes when no position is given.
    #[serde(default = "default_origin")]
    pub default_origin: Coordinate,
    /// JSON dataset used by `stats` when no `--dataset` flag is given.
    #[serde(default)]
    pub dataset: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// error, warn, info, debug or trace
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_top_k() -> usize {
    4
}

fn default_origin() -> Coordinate {
    Coordinate::DEFAULT_ORIGIN
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            default_origin: default_origin(),
            dataset: None,
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    /// Read `path` if given, otherwise start from defaults; then validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut settings: Settings = serde_json::from_str(&content)
            .map_err(|e| LocateError::Config(format!("{}: {}", path.display(), e)))?;
        settings.apply_defaults();
        Ok(settings)
    }

    /// Replace blank strings with their defaults.
    pub fn apply_defaults(&mut self) {
        if self.logging.level.trim().is_empty() {
            self.logging.level = default_log_level();
        }
        self.logging.level = self.logging.level.trim().to_lowercase();
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_TOP_K).contains(&self.top_k) {
            return Err(LocateError::Config(format!(
                "top_k must be between 1 and {MAX_TOP_K}, got {}",
                self.top_k
            )));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(LocateError::Config(format!(
                "Invalid log level '{}'. Valid levels: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Start point for "from me" routes.
    ///
    /// An explicit position wins. A configured origin other than the
    /// built-in one counts as detected; otherwise the default origin is used.
    pub fn origin(&self, latitude: Option<f64>, longitude: Option<f64>) -> Result<Origin> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Ok(Origin::Detected(Coordinate::new(lat, lon)?)),
            _ if self.default_origin != Coordinate::DEFAULT_ORIGIN => Ok(Origin::Detected(self.default_origin)),
            _ => Ok(Origin::Default),
        }
    }

    /// Dataset for listing commands: `rock`/`spring` name an embedded sample,
    /// anything else is a file path. Without a flag the configured file is
    /// used, then the Rock sample.
    pub fn dataset_source(&self, flag: Option<&str>) -> DatasetSource {
        match (flag, &self.dataset) {
            (Some(name), _) => match name.parse::<BuiltinDataset>() {
                Ok(builtin) => DatasetSource::Builtin(builtin),
                Err(_) => DatasetSource::Json(JsonDataset::new(name)),
            },
            (None, Some(path)) => DatasetSource::Json(JsonDataset::new(path.clone())),
            (None, None) => DatasetSource::Builtin(BuiltinDataset::Rock),
        }
    }
}
