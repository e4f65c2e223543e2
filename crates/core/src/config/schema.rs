//! Configuration schema definitions
//!
//! Shared configuration types for the deploy tools.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ConfigSchema {
    /// Android artifact classification settings
    #[serde(default)]
    pub android: AndroidConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Reject values that can never take effect
    pub fn validate(&self) -> Result<()> {
        self.android.validate()?;

        if self.logging.level.trim().is_empty() {
            return Err(
                Error::invalid_config_value("logging.level", "Log level must not be empty")
                    .with_suggestion("Use a filter directive such as \"info\" or \"app=debug\""),
            );
        }

        Ok(())
    }
}

/// Android artifact classification configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AndroidConfig {
    /// Gradle modules whose artifacts are classified; empty means every module
    #[serde(default)]
    pub modules: Vec<String>,
}

impl AndroidConfig {
    /// Whether artifacts of `module` pass the module filter
    pub fn includes_module(&self, module: &str) -> bool {
        self.modules.is_empty() || self.modules.iter().any(|m| m == module)
    }

    /// Module names are the first `-` separated segment of an artifact name,
    /// so a name containing `-` never matches.
    fn validate(&self) -> Result<()> {
        match self.modules.iter().find(|m| m.contains('-')) {
            Some(module) => Err(Error::invalid_config_value(
                "android.modules",
                format!("Module name \"{module}\" can never match an artifact"),
            )
            .with_suggestion("Use the Gradle module name, e.g. \"app\"")),
            None => Ok(()),
        }
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human readable output
    #[default]
    Compact,
    /// Newline-delimited JSON
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive, `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,

    /// Print the event target module
    #[serde(default)]
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            show_target: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
