use super::*;
use tracing_subscriber::prelude::*;

/// Runs `f` under a thread-local subscriber using [`LogfmtFormatter`] and
/// returns everything it wrote.
pub fn capture(config: &LoggerConfig, f: impl FnOnce()) -> String {
    let buf = SharedBuffer::new();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_writer(move || writer.clone())
            .event_format(LogfmtFormatter::new(config))
            .with_filter(TracingFilter::new(config.level)),
    );
    tracing::subscriber::with_default(subscriber, f);
    buf.contents()
}
