use super::*;
use serde::Deserialize;

pub const LEVEL_ENV: &str = "KV_LOG_LEVEL";
pub const COLOR_ENV: &str = "KV_LOG_COLOR";

/// Settings for [`Logger::from_config`] and [`init_logger`].
///
/// Deserializes from any serde format with every field optional, so it can be
/// embedded in a host application's configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: Level,
    /// Prefix records with `ts=<RFC 3339 UTC>`.
    pub timestamp: bool,
    /// Prefix records with `caller=<file>:<line>`.
    pub caller: bool,
    /// Colour the level in `tracing` output. Plain logfmt emitters ignore it.
    pub colored: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            timestamp: true,
            caller: true,
            colored: false,
        }
    }
}

impl LoggerConfig {
    /// Defaults overridden by `KV_LOG_LEVEL` and `KV_LOG_COLOR`.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(LEVEL_ENV).ok().as_deref(),
            std::env::var(COLOR_ENV).is_ok(),
        )
    }

    fn from_vars(level: Option<&str>, colored: bool) -> Self {
        let mut config = Self::default();
        if let Some(level) = level {
            config.level = Level::from_name_lossy(level);
        }
        config.colored = colored;
        config
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn plain(self) -> Self {
        Self {
            timestamp: false,
            caller: false,
            ..self
        }
    }
}
