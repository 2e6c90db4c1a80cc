use super::*;
use std::{
    io::{stderr, stdout, Write},
    panic::Location,
    sync::Arc,
};
use tracing_subscriber::prelude::*;

/// Structured logger facade.
///
/// Each call builds one flat record, `level`, `msg`, then the pairs added
/// through [`Logger::with`], then the pairs given at the call site, and hands
/// it to the underlying emitter. Emission never reports failure: a record the
/// emitter rejects is dropped.
///
/// Loggers are immutable. Deriving a logger with [`Logger::with`] or
/// [`Logger::with_level_filter`] shares the same emitter chain.
#[derive(Clone)]
pub struct Logger {
    emitter: Arc<dyn Emit>,
    fields: Vec<KeyValue>,
}

impl Logger {
    /// Logfmt to stdout with `ts` and `caller` pairs, admitting every level.
    pub fn new() -> Self {
        Self::with_writer(stdout())
    }

    /// Same as [`Logger::new`] with an explicit destination.
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self::from_config(&LoggerConfig::default(), writer)
    }

    pub fn from_config<W: Write + Send + 'static>(config: &LoggerConfig, writer: W) -> Self {
        let mut defaults = Vec::with_capacity(2);
        if config.timestamp {
            defaults.push(KeyValue::new("ts", Valuer::TimestampUtc));
        }
        if config.caller {
            defaults.push(KeyValue::new("caller", Valuer::Caller));
        }

        let emitter = Context::new(LogfmtEmitter::new(writer), defaults);
        Self::from_emitter(LevelFilter::new(emitter, config.level))
    }

    /// Wraps an emitter as is: no default pairs, no filtering.
    pub fn from_emitter<E: Emit + 'static>(emitter: E) -> Self {
        Self::from_shared(Arc::new(emitter))
    }

    pub fn from_shared(emitter: Arc<dyn Emit>) -> Self {
        Self {
            emitter,
            fields: Vec::new(),
        }
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[KeyValue]) {
        self.log(Level::Debug, msg, fields, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[KeyValue]) {
        self.log(Level::Info, msg, fields, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[KeyValue]) {
        self.log(Level::Warn, msg, fields, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[KeyValue]) {
        self.log(Level::Error, msg, fields, Location::caller());
    }

    /// Logs at error level, writes `fatal: <msg>` to stderr, then terminates
    /// the process with exit code 1.
    ///
    /// The stderr line and the exit happen whether or not the record passed
    /// the filter or was written.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[KeyValue]) -> ! {
        self.log(Level::Error, msg, fields, Location::caller());
        let _ = writeln!(stderr(), "fatal: {msg}");
        std::process::exit(1)
    }

    /// Derives a logger that adds `fields` to every record, after the
    /// message and before the call-site pairs.
    pub fn with<I>(&self, fields: I) -> Logger
    where
        I: IntoIterator<Item = KeyValue>,
    {
        let mut merged = self.fields.clone();
        merged.extend(fields);
        Self {
            emitter: self.emitter.clone(),
            fields: merged,
        }
    }

    /// Derives a logger that only admits records at `level` or more severe.
    pub fn with_level_filter(&self, level: Level) -> Logger {
        Self {
            emitter: Arc::new(LevelFilter::new(self.emitter.clone(), level)),
            fields: self.fields.clone(),
        }
    }

    fn log(
        &self,
        level: Level,
        msg: &str,
        fields: &[KeyValue],
        location: &'static Location<'static>,
    ) {
        let record = Record::new(self.normalize(level, msg, fields), location);
        if let Err(e) = self.emitter.emit(record) {
            tracing::trace!(target: "kv_logger", "record dropped: {}", e);
        }
    }

    fn normalize(&self, level: Level, msg: &str, fields: &[KeyValue]) -> Vec<KeyValue> {
        let mut kvs = Vec::with_capacity(2 + self.fields.len() + fields.len());
        kvs.push(KeyValue::new(LEVEL_KEY, level));
        kvs.push(KeyValue::new(MSG_KEY, msg));
        kvs.extend(self.fields.iter().cloned());
        kvs.extend(fields.iter().cloned());
        kvs
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives a level-filtered logger from a level name.
///
/// Unrecognized names admit every level.
pub fn level_filtered_logger(logger: &Logger, level: &str) -> Logger {
    logger.with_level_filter(Level::from_name_lossy(level))
}

/// Installs a global `tracing` subscriber that renders events as logfmt on
/// stdout, filtered at `config.level`.
#[inline]
pub fn init_logger(config: &LoggerConfig) -> LogResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(stdout)
                .event_format(LogfmtFormatter::new(config))
                .with_filter(TracingFilter::new(config.level)),
        )
        .try_init()?;
    Ok(())
}
