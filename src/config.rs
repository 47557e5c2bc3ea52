//! # Configuration Management
//!
//! Loads the observer position and classification thresholds for the
//! `route-daylight` binary from `daylight-config.toml`. The library core
//! never reads this file: the binary turns it into explicit arguments.

use crate::DaylightClassifier;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "daylight-config.toml";

/// Application configuration loaded from daylight-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Where the sun is observed from
    pub observer: ObserverConfig,
    /// Altitudes and event window
    #[serde(default)]
    pub thresholds: DaylightClassifier,
}

/// Observer position
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObserverConfig {
    /// Human-readable place name for reports
    pub name: String,
    /// Degrees, north positive
    pub latitude: f64,
    /// Degrees, east positive
    pub longitude: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            observer: ObserverConfig {
                name: "Portland Head, ME".to_string(),
                latitude: 43.6231,
                longitude: -70.2078,
            },
            thresholds: DaylightClassifier::default(),
        }
    }
}

impl Config {
    /// Load configuration from daylight-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(observer = %config.observer.name, "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "invalid config file, using defaults"
                    );
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save current configuration as pretty TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }

    /// Classifier built from the configured thresholds
    pub fn classifier(&self) -> DaylightClassifier {
        self.thresholds
    }
}
