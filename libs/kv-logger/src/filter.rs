use super::*;
use tracing::{level_filters::LevelFilter as TracingLevelFilter, subscriber::Interest, Metadata};
use tracing_subscriber::layer::{Context as LayerContext, Filter};

/// Drops records whose severity the configured level does not admit.
///
/// Records without a level pair always pass. Filters nest, so wrapping an
/// already filtered emitter can only narrow what gets through.
pub struct LevelFilter<E> {
    inner: E,
    level: Level,
}

impl<E: Emit> LevelFilter<E> {
    pub fn new(inner: E, level: Level) -> Self {
        Self { inner, level }
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl<E: Emit> Emit for LevelFilter<E> {
    fn emit(&self, record: Record) -> LogResult<()> {
        match record.level() {
            Some(level) if !self.level.admits(level) => Ok(()),
            _ => self.inner.emit(record),
        }
    }
}

/// Per-layer filter applying the same severity policy to `tracing` events.
pub struct TracingFilter {
    level: Level,
}

impl TracingFilter {
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    fn is_enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.level.admits(Level::from_tracing(metadata.level()))
    }
}

impl<S> Filter<S> for TracingFilter {
    fn enabled(&self, metadata: &Metadata<'_>, _: &LayerContext<'_, S>) -> bool {
        self.is_enabled(metadata)
    }

    fn callsite_enabled(&self, metadata: &'static Metadata<'static>) -> Interest {
        if self.is_enabled(metadata) {
            Interest::always()
        } else {
            Interest::never()
        }
    }

    fn max_level_hint(&self) -> Option<TracingLevelFilter> {
        Some(match self.level {
            // trace folds into debug, so debug lets it through
            Level::Debug => TracingLevelFilter::TRACE,
            level => level
                .to_tracing()
                .map_or(TracingLevelFilter::OFF, TracingLevelFilter::from_level),
        })
    }
}
