//! A small structured-logging facade.
//!
//! [`Logger`] turns a message plus key-value pairs into one flat record and
//! hands it to an [`Emit`] implementation. The default chain writes logfmt
//! lines to stdout:
//!
//! ```
//! use kv_logger::{kv, Level, Logger};
//!
//! let log = Logger::new().with(kv!("service" => "billing"));
//! log.info("invoice sent", &kv!("id" => 42));
//!
//! let quiet = log.with_level_filter(Level::Warn);
//! quiet.debug("not printed", &[]);
//! ```

mod config;
mod emitter;
mod filter;
mod formatter;
mod level;
mod logger;
mod types;
mod value;

#[cfg(test)]
mod test_helpers;

pub mod logfmt;

pub use config::{LoggerConfig, COLOR_ENV, LEVEL_ENV};
pub use emitter::{
    Context, Emit, LogfmtEmitter, Record, SharedBuffer, TracingEmitter, LEVEL_KEY, MSG_KEY,
};
pub use filter::{LevelFilter, TracingFilter};
pub use formatter::LogfmtFormatter;
pub use level::Level;
pub use logger::{init_logger, level_filtered_logger, Logger};
pub use types::{LogError, LogResult};
pub use value::{pairs, KeyValue, Value, Valuer, MISSING_VALUE};
