//! Runtime configuration for the kinetic table.
//!
//! Layers, later wins: built-in defaults, an optional JSON file named by
//! `KINETIC_CONFIG`, then single-value `KINETIC_*` environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::director::DirectorConfig;
use crate::kernel::actuator::ActuatorConfig;
use crate::services::llm::LlmSettings;

pub const CONFIG_PATH_VAR: &str = "KINETIC_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub rows: usize,
    pub cols: usize,
    /// Pin travel, mm.
    pub max_height: f64,
    /// Motor speed limit, mm/s.
    pub max_speed: f64,
    pub frame_rate_hz: u32,
    pub think_interval_secs: f64,
    pub inference_url: String,
    pub model: String,
    pub call_timeout_secs: f64,
    pub temperature: f32,
    pub speaking_secs_per_word: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            rows: 30,
            cols: 30,
            max_height: 100.0,
            max_speed: 50.0,
            frame_rate_hz: 60,
            think_interval_secs: 15.0,
            inference_url: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            call_timeout_secs: 30.0,
            temperature: 0.9,
            speaking_secs_per_word: 0.35,
        }
    }
}

fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)))
    }
}

fn secs(value: f64, fallback: Duration) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(fallback)
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{}={:?} is not a valid value", name, raw)))
}

impl TableConfig {
    /// Defaults, then `KINETIC_CONFIG` file, then env overrides. Validated.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `KINETIC_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("KINETIC_MODEL") {
            self.model = v.trim().to_string();
        }
        if let Some(v) = lookup("KINETIC_INFERENCE_URL") {
            self.inference_url = v.trim().to_string();
        }
        if let Some(v) = lookup("KINETIC_THINK_INTERVAL") {
            self.think_interval_secs = parse_var("KINETIC_THINK_INTERVAL", &v)?;
        }
        if let Some(v) = lookup("KINETIC_ROWS") {
            self.rows = parse_var("KINETIC_ROWS", &v)?;
        }
        if let Some(v) = lookup("KINETIC_COLS") {
            self.cols = parse_var("KINETIC_COLS", &v)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must have at least one pin, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.frame_rate_hz == 0 {
            return Err(ConfigError::Invalid("frame_rate_hz must be positive".to_string()));
        }
        positive("max_height", self.max_height)?;
        positive("max_speed", self.max_speed)?;
        positive("think_interval_secs", self.think_interval_secs)?;
        positive("call_timeout_secs", self.call_timeout_secs)?;
        positive("speaking_secs_per_word", self.speaking_secs_per_word)?;
        if self.model.is_empty() || self.inference_url.is_empty() {
            return Err(ConfigError::Invalid("model and inference_url must be set".to_string()));
        }
        Ok(())
    }

    pub fn actuator(&self) -> ActuatorConfig {
        ActuatorConfig {
            rows: self.rows,
            cols: self.cols,
            max_height: self.max_height,
            max_speed: self.max_speed,
        }
    }

    pub fn director(&self) -> DirectorConfig {
        DirectorConfig {
            think_interval: secs(self.think_interval_secs, Duration::from_secs(15)),
            call_timeout: secs(self.call_timeout_secs, Duration::from_secs(30)),
            rows: self.rows,
            cols: self.cols,
            max_height: self.max_height,
            speaking_secs_per_word: self.speaking_secs_per_word,
        }
    }

    pub fn llm(&self) -> LlmSettings {
        LlmSettings {
            base_url: self.inference_url.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            timeout: secs(self.call_timeout_secs, Duration::from_secs(30)),
        }
    }
}
