use super::*;
use nu_ansi_term::{AnsiGenericString, Color};
use std::{
    fmt::{self, Write as _},
    panic::Location,
};
use tracing::{
    field::{Field, Visit},
    Event, Level as TracingLevel, Metadata, Subscriber,
};
use tracing_log::NormalizeEvent;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    registry::LookupSpan,
};

/// Renders `tracing` events as logfmt lines:
/// `ts=… level=… caller=… target=… msg=… key=value… span=outer:inner`.
///
/// `ts` and `caller` follow [`LoggerConfig::timestamp`] and
/// [`LoggerConfig::caller`]; `span` only appears inside a span.
pub struct LogfmtFormatter {
    timestamp: bool,
    caller: bool,
    colored: bool,
}

impl LogfmtFormatter {
    pub fn new(config: &LoggerConfig) -> Self {
        Self {
            timestamp: config.timestamp,
            caller: config.caller,
            colored: config.colored,
        }
    }

    fn format_level(level: &TracingLevel) -> AnsiGenericString<'static, str> {
        match *level {
            TracingLevel::ERROR => Color::Red.paint("error"),
            TracingLevel::WARN => Color::Yellow.paint("warn"),
            TracingLevel::INFO => Color::Green.paint("info"),
            TracingLevel::DEBUG => Color::Blue.paint("debug"),
            TracingLevel::TRACE => Color::Purple.paint("trace"),
        }
    }

    fn call_site(meta: &Metadata<'_>) -> Option<String> {
        let file = meta.file()?;
        let file = file.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(file);
        Some(match meta.line() {
            Some(line) => format!("{file}:{line}"),
            None => file.to_owned(),
        })
    }

    fn render(
        &self,
        meta: &Metadata<'_>,
        fields: FieldCollector,
        spans: Option<String>,
    ) -> LogResult<String> {
        // the only valuer below is the timestamp, which ignores the location
        let location = Location::caller();
        let mut line = String::with_capacity(128);

        if self.timestamp {
            logfmt::write_pair(&KeyValue::new("ts", Valuer::TimestampUtc), location, &mut line)?;
            line.push(' ');
        }

        line.push_str("level=");
        if self.colored {
            // writing to a String cannot fail
            let _ = write!(line, "{}", Self::format_level(meta.level()));
        } else {
            line.push_str(&meta.level().as_str().to_ascii_lowercase());
        }

        let mut tail = Vec::with_capacity(fields.fields.len() + 4);
        if self.caller {
            if let Some(caller) = Self::call_site(meta) {
                tail.push(KeyValue::new("caller", caller));
            }
        }
        tail.push(KeyValue::new("target", meta.target().to_owned()));
        if let Some(message) = fields.message {
            tail.push(KeyValue::new(MSG_KEY, message));
        }
        tail.extend(fields.fields);
        if let Some(spans) = spans {
            tail.push(KeyValue::new("span", spans));
        }

        for kv in &tail {
            line.push(' ');
            logfmt::write_pair(kv, location, &mut line)?;
        }
        line.push('\n');
        Ok(line)
    }
}

impl<S, N> FormatEvent<S, N> for LogfmtFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let normalized_meta = event.normalized_metadata();
        let meta = normalized_meta.as_ref().unwrap_or_else(|| event.metadata());

        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        let spans = ctx.event_scope().map(|scope| {
            scope
                .from_root()
                .map(|span| span.name())
                .collect::<Vec<_>>()
                .join(":")
        });

        let line = self.render(meta, fields, spans).map_err(|_| fmt::Error)?;
        writer.write_str(&line)
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<KeyValue>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, value: Value) {
        match field.name() {
            "message" => {
                self.message = Some(match value {
                    Value::Str(s) => s,
                    other => other.text(Location::caller()).into_owned(),
                })
            }
            // metadata injected by the log bridge, already normalized
            name if name.starts_with("log.") => {}
            name => self.fields.push(KeyValue::new(name, value)),
        }
    }
}

impl Visit for FieldCollector {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, value.into());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.into());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}").into());
    }
}
