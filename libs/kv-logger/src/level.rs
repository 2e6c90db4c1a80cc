use super::*;
use serde::Deserialize;
use std::{fmt, str::FromStr};

/// Severity of a record, and the threshold of a filter.
///
/// Levels are ordered `None < Error < Warn < Info < Debug`. A filter set to
/// some level admits every record at that level or a more severe one, so
/// `Debug` admits everything and `None` admits nothing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Level {
    None,
    Error,
    Warn,
    Info,
    #[default]
    Debug,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::None,
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::None => "none",
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }

    /// Parses a level name, falling back to [`Level::Debug`] (admit
    /// everything) when the name is not recognized.
    pub fn from_name_lossy(name: &str) -> Self {
        name.parse().unwrap_or(Level::Debug)
    }

    /// Whether a filter at `self` lets a record at `record` through.
    #[inline]
    pub fn admits(&self, record: Level) -> bool {
        record != Level::None && record <= *self
    }

    pub(crate) fn to_tracing(self) -> Option<tracing::Level> {
        match self {
            Level::None => None,
            Level::Error => Some(tracing::Level::ERROR),
            Level::Warn => Some(tracing::Level::WARN),
            Level::Info => Some(tracing::Level::INFO),
            Level::Debug => Some(tracing::Level::DEBUG),
        }
    }

    // trace has no counterpart here, it folds into debug
    pub(crate) fn from_tracing(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG | tracing::Level::TRACE => Level::Debug,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> LogResult<Self> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LogError::UnknownLevel(s.to_owned()))
    }
}

impl From<&str> for Level {
    fn from(name: &str) -> Self {
        Level::from_name_lossy(name)
    }
}

impl From<String> for Level {
    fn from(name: String) -> Self {
        Level::from_name_lossy(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_order() {
        assert!(Level::None < Level::Error);
        assert!(Level::Error < Level::Warn);
        assert!(Level::Warn < Level::Info);
        assert!(Level::Info < Level::Debug);
    }

    #[test]
    fn test_level_admits() {
        assert!(Level::Warn.admits(Level::Error));
        assert!(Level::Warn.admits(Level::Warn));
        assert!(!Level::Warn.admits(Level::Info));
        assert!(!Level::Warn.admits(Level::Debug));

        for level in Level::ALL {
            assert!(!Level::None.admits(level));
            assert_eq!(Level::Debug.admits(level), level != Level::None);
        }
    }

    #[test]
    fn test_level_parse() {
        for level in Level::ALL {
            assert_eq!(level.as_str().parse::<Level>().unwrap(), level);
            assert_eq!(level.to_string(), level.as_str());
        }
        assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warn);
        assert!(matches!(
            "verbose".parse::<Level>(),
            Err(LogError::UnknownLevel(name)) if name == "verbose"
        ));
    }

    #[test]
    fn test_level_lossy_fallback() {
        assert_eq!(Level::from_name_lossy("error"), Level::Error);
        assert_eq!(Level::from_name_lossy("verbose"), Level::Debug);
        assert_eq!(Level::from(""), Level::Debug);
    }

    #[test]
    fn test_level_deserialize() {
        let level: Level = serde_json::from_str("\"info\"").unwrap();
        assert_eq!(level, Level::Info);
        let level: Level = serde_json::from_str("\"chatty\"").unwrap();
        assert_eq!(level, Level::Debug);
    }

    #[test]
    fn test_level_tracing_mapping() {
        assert_eq!(Level::None.to_tracing(), None);
        for level in [Level::Error, Level::Warn, Level::Info, Level::Debug] {
            let mapped = level.to_tracing().unwrap();
            assert_eq!(Level::from_tracing(&mapped), level);
        }
        assert_eq!(Level::from_tracing(&tracing::Level::TRACE), Level::Debug);
    }
}
