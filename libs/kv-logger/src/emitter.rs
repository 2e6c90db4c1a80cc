//! Emitters turn a finished [`Record`] into output.
//!
//! The facade only ever talks to `dyn Emit`. Decorators such as [`Context`]
//! and [`LevelFilter`] wrap another emitter, so a chain is built by nesting:
//! `LevelFilter<Context<LogfmtEmitter<Stdout>>>` is what [`Logger::new`]
//! produces.

use super::*;
use std::{
    io::{self, Write},
    panic::Location,
    sync::{Arc, Mutex},
};

pub const LEVEL_KEY: &str = "level";
pub const MSG_KEY: &str = "msg";

const TRACING_TARGET: &str = "kv_logger";

/// One log event: ordered pairs plus the call site that produced them.
#[derive(Debug, Clone)]
pub struct Record {
    pub fields: Vec<KeyValue>,
    pub location: &'static Location<'static>,
}

impl Record {
    pub fn new(fields: Vec<KeyValue>, location: &'static Location<'static>) -> Self {
        Self { fields, location }
    }

    /// The first `level` pair holding a [`Value::Level`], if any.
    pub fn level(&self) -> Option<Level> {
        self.fields.iter().find_map(|kv| match kv.value {
            Value::Level(level) if kv.key == LEVEL_KEY => Some(level),
            _ => None,
        })
    }
}

/// Accepts a record and writes it somewhere, or fails.
pub trait Emit: Send + Sync {
    fn emit(&self, record: Record) -> LogResult<()>;
}

impl<E: Emit + ?Sized> Emit for Arc<E> {
    fn emit(&self, record: Record) -> LogResult<()> {
        (**self).emit(record)
    }
}

impl<E: Emit + ?Sized> Emit for Box<E> {
    fn emit(&self, record: Record) -> LogResult<()> {
        (**self).emit(record)
    }
}

/// Renders records as logfmt lines into a writer shared behind a mutex.
pub struct LogfmtEmitter<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> LogfmtEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> LogResult<W> {
        self.writer.into_inner().map_err(|_| LogError::Poisoned)
    }
}

impl<W: Write + Send> Emit for LogfmtEmitter<W> {
    fn emit(&self, record: Record) -> LogResult<()> {
        // encode before locking so a bad key never holds the writer
        let line = logfmt::encode_to_string(&record.fields, record.location)?;
        let mut writer = self.writer.lock().map_err(|_| LogError::Poisoned)?;
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Prefixes every record with a fixed set of pairs.
///
/// Pairs may hold [`Valuer`]s, which are resolved at render time against the
/// record's call site.
pub struct Context<E> {
    inner: E,
    fields: Vec<KeyValue>,
}

impl<E: Emit> Context<E> {
    pub fn new<I>(inner: E, fields: I) -> Self
    where
        I: IntoIterator<Item = KeyValue>,
    {
        Self {
            inner,
            fields: fields.into_iter().collect(),
        }
    }
}

impl<E: Emit> Emit for Context<E> {
    fn emit(&self, mut record: Record) -> LogResult<()> {
        if !self.fields.is_empty() {
            record.fields.splice(0..0, self.fields.iter().cloned());
        }
        self.inner.emit(record)
    }
}

/// In-memory writer that can be cloned and read back.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        match self.0.lock() {
            Ok(buf) => String::from_utf8_lossy(&buf).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }

    /// Returns the contents and clears the buffer.
    pub fn take(&self) -> String {
        let bytes = match self.0.lock() {
            Ok(mut buf) => std::mem::take(&mut *buf),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "buffer lock poisoned"))?;
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Forwards records to `tracing` as events on the `kv_logger` target.
///
/// The level pair selects the event level and the `msg` pair becomes the
/// event message. Any other pairs are logfmt-encoded into one `fields` value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEmitter;

macro_rules! forward {
    ($macro:ident, $msg:expr, $fields:expr) => {
        match $fields {
            Some(fields) => {
                tracing::$macro!(target: TRACING_TARGET, fields = fields.as_str(), "{}", $msg)
            }
            None => tracing::$macro!(target: TRACING_TARGET, "{}", $msg),
        }
    };
}

impl Emit for TracingEmitter {
    fn emit(&self, record: Record) -> LogResult<()> {
        let level = record.level().unwrap_or(Level::Info);
        let mut msg = None;
        let mut rest = Vec::with_capacity(record.fields.len());
        for kv in record.fields {
            if kv.key == LEVEL_KEY && matches!(kv.value, Value::Level(_)) {
                continue;
            }
            if kv.key == MSG_KEY && msg.is_none() {
                msg = Some(kv.value.text(record.location).into_owned());
                continue;
            }
            rest.push(kv);
        }
        let msg = msg.unwrap_or_default();
        let fields = if rest.is_empty() {
            None
        } else {
            let line = logfmt::encode_to_string(&rest, record.location)?;
            Some(line.trim_end_matches('\n').to_owned())
        };

        match level {
            Level::None => {}
            Level::Error => forward!(error, msg, fields),
            Level::Warn => forward!(warn, msg, fields),
            Level::Info => forward!(info, msg, fields),
            Level::Debug => forward!(debug, msg, fields),
        }
        Ok(())
    }
}
