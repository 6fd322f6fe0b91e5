//! Conditional tracing for the detection pipeline.
//!
//! With the `tracing` feature enabled, pipeline stages emit spans and events
//! through the `tracing` crate. Without it every macro here compiles away and
//! the numeric code stays free of any observability side effects.

/// Create an info-level span around a detector run, a tile or an octave.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Emit an info-level event with key/value fields.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Span guard stand-in used when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Returns self, mimicking `Span::entered()`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}

/// Times one pipeline stage and reports it when finished.
///
/// The guard records the number of points that survived the stage; call
/// [`StageTimer::finish`] with the count, or drop it to report the count
/// given at construction.
pub(crate) struct StageTimer {
    stage: &'static str,
    count: usize,
    #[cfg(feature = "tracing")]
    start: std::time::Instant,
}

impl StageTimer {
    pub(crate) fn start(stage: &'static str) -> Self {
        Self {
            stage,
            count: 0,
            #[cfg(feature = "tracing")]
            start: std::time::Instant::now(),
        }
    }

    /// Consumes the timer, reporting `count` surviving points.
    pub(crate) fn finish(mut self, count: usize) {
        self.count = count;
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        #[cfg(feature = "tracing")]
        let elapsed_us = self.start.elapsed().as_micros() as u64;
        #[cfg(not(feature = "tracing"))]
        let elapsed_us = 0u64;
        trace_event!(
            "stage_done",
            stage = self.stage,
            points = self.count,
            elapsed_us = elapsed_us
        );
    }
}
