//! Application configuration file support.
//!
//! Settings are read from a TOML file and then overridden by environment
//! variables. Every field has a default, so an empty (or absent) file is a
//! valid configuration.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [sources]
//! confirmed = "data/time_series_covid19_confirmed_global.csv"
//! lockdown = "https://example.org/countryLockdowndates.csv"
//!
//! [view]
//! threshold = 100
//! metric = "cases"
//! scale = "log"
//!
//! [pipeline]
//! invalid_counts = "propagate"
//!
//! [selection]
//! initial = ["Italy", "Hubei, China"]
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{InvalidCountPolicy, Metric, ScaleMode};
use crate::pipeline::{ViewState, DEFAULT_THRESHOLD};
use crate::sources::{LocatedSource, SourceKind, SourceLocation};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "TRENDS_CONFIG";

/// File searched for when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "trends.toml";

const UPSTREAM_BASE: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub sources: SourceSettings,
    pub view: ViewSettings,
    pub pipeline: PipelineSettings,
    pub selection: SelectionSettings,
}

/// Bind address of the HTTP server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where each table comes from: a URL or a file path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub confirmed: SourceLocation,
    pub deaths: SourceLocation,
    pub recovered: SourceLocation,
    pub lockdown: SourceLocation,
}

impl Default for SourceSettings {
    fn default() -> Self {
        let upstream = |name: &str| SourceLocation::Url(format!("{}/{}", UPSTREAM_BASE, name));
        Self {
            confirmed: upstream("time_series_covid19_confirmed_global.csv"),
            deaths: upstream("time_series_covid19_deaths_global.csv"),
            recovered: upstream("time_series_covid19_recovered_global.csv"),
            lockdown: SourceLocation::File(PathBuf::from("data/countryLockdowndates.csv")),
        }
    }
}

impl SourceSettings {
    pub fn location(&self, kind: SourceKind) -> &SourceLocation {
        match kind {
            SourceKind::Confirmed => &self.confirmed,
            SourceKind::Deaths => &self.deaths,
            SourceKind::Recovered => &self.recovered,
            SourceKind::Lockdown => &self.lockdown,
        }
    }

    /// A source fetching each table from its configured location.
    pub fn to_source(&self) -> LocatedSource {
        SourceKind::ALL
            .into_iter()
            .map(|kind| (kind, self.location(kind).clone()))
            .collect()
    }
}

/// Initial chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub threshold: f64,
    pub max_days: Option<usize>,
    pub metric: Metric,
    pub scale: ScaleMode,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_days: None,
            metric: Metric::default(),
            scale: ScaleMode::default(),
        }
    }
}

impl ViewSettings {
    pub fn to_view_state(&self) -> ViewState {
        ViewState {
            threshold: self.threshold,
            max_days: self.max_days,
            metric: self.metric,
            scale: self.scale,
        }
    }
}

/// How the tables are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub invalid_counts: InvalidCountPolicy,
}

/// Regions selected when the dataset is first loaded, by display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    pub initial: Vec<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Uses `TRENDS_CONFIG` when set (the file must then exist). Otherwise
    /// searches for `trends.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// and falls back to the defaults when none is found.
    pub fn from_default_location() -> Result<Self, ConfigError> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Self::from_file(path);
        }

        let search_paths = [
            PathBuf::from(DEFAULT_CONFIG_FILE),
            PathBuf::from("backend").join(DEFAULT_CONFIG_FILE),
            PathBuf::from("..").join(DEFAULT_CONFIG_FILE),
        ];
        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// [`from_default_location`](Self::from_default_location) followed by
    /// [`apply_env`](Self::apply_env).
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_default_location()?;
        config.apply_env()?;
        Ok(config)
    }

    /// Override settings from the environment.
    ///
    /// # Environment Variables
    /// - `HOST`: server host
    /// - `PORT`: server port
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT must be a port number, got '{}'", port)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.view.threshold.is_finite() || self.view.threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "view.threshold must be a non-negative number, got {}",
                self.view.threshold
            )));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".to_string()));
        }
        Ok(())
    }
}
