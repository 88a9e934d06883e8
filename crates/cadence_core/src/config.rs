//! Scheduler configuration
//!
//! The scheduler reads a small TOML document, either as a bare table or as a
//! `[scheduler]` section inside a larger game configuration file:
//!
//! ```toml
//! [scheduler]
//! frame_rate = 60
//! input_mode = "inline"
//! scene_priority = 99
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// When task input handlers run relative to their update callbacks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Input runs right after the task's own update, only if the update kept it alive
    #[default]
    Inline,
    /// A dedicated input pass in registration order precedes the update pass
    Separate,
}

/// Scheduler configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Fixed frame clock rate; every frame advances time by `1 / frame_rate` seconds
    pub frame_rate: u32,
    /// Input dispatch strategy
    pub input_mode: InputMode,
    /// Render priority for tasks owned by the scene engine
    pub scene_priority: i32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            input_mode: InputMode::Inline,
            scene_priority: 99,
        }
    }
}

impl SchedulerConfig {
    /// Parse a configuration from TOML source
    ///
    /// Accepts either a `[scheduler]` table or top-level keys. Missing keys
    /// take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut table: toml::Table =
            toml::from_str(source).map_err(|e| SchedulerError::Config(e.to_string()))?;

        let section = match table.remove("scheduler") {
            Some(section) => section,
            None => toml::Value::Table(table),
        };

        let config: SchedulerConfig = section
            .try_into()
            .map_err(|e: toml::de::Error| SchedulerError::Config(e.to_string()))?;
        Ok(config.normalized())
    }

    /// Load a configuration file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| SchedulerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Serialize to a TOML `[scheduler]` section
    pub fn to_toml(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Document<'a> {
            scheduler: &'a SchedulerConfig,
        }

        toml::to_string_pretty(&Document { scheduler: self })
            .map_err(|e| SchedulerError::Config(e.to_string()))
    }

    /// Builder-style frame rate override
    pub fn with_frame_rate(mut self, frame_rate: u32) -> Self {
        self.frame_rate = frame_rate;
        self.normalized()
    }

    /// Builder-style input mode override
    pub fn with_input_mode(mut self, input_mode: InputMode) -> Self {
        self.input_mode = input_mode;
        self
    }

    /// Length of one frame in seconds
    pub fn frame_delta(&self) -> f64 {
        1.0 / f64::from(self.frame_rate.max(1))
    }

    fn normalized(mut self) -> Self {
        if self.frame_rate == 0 {
            tracing::warn!("scheduler frame_rate of 0 clamped to 1");
            self.frame_rate = 1;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.input_mode, InputMode::Inline);
        assert_eq!(config.scene_priority, 99);
        assert!((config.frame_delta() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_section() {
        let config = SchedulerConfig::from_toml_str(
            r#"
            [scheduler]
            frame_rate = 30
            input_mode = "separate"
            "#,
        )
        .unwrap();

        assert_eq!(config.frame_rate, 30);
        assert_eq!(config.input_mode, InputMode::Separate);
        assert_eq!(config.scene_priority, 99);
    }

    #[test]
    fn test_parse_bare_table() {
        let config = SchedulerConfig::from_toml_str("scene_priority = 5").unwrap();
        assert_eq!(config.scene_priority, 5);
        assert_eq!(config.frame_rate, 60);
    }

    #[test]
    fn test_zero_frame_rate_is_clamped() {
        let config = SchedulerConfig::from_toml_str("frame_rate = 0").unwrap();
        assert_eq!(config.frame_rate, 1);
    }

    #[test]
    fn test_invalid_toml() {
        let err = SchedulerConfig::from_toml_str("frame_rate = \"fast\"").unwrap_err();
        assert!(matches!(err, SchedulerError::Config(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = SchedulerConfig::default().with_input_mode(InputMode::Separate);
        let text = config.to_toml().unwrap();
        assert!(text.contains("[scheduler]"));
        assert_eq!(SchedulerConfig::from_toml_str(&text).unwrap(), config);
    }
}
