//! The instrumentation gate: wraps data-access invocations, measures them,
//! and emits threshold-classified log records.

use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::EchoConfig;
use crate::error::EchoError;
use crate::format::{normalize, substitute};
use crate::sink::{LogSink, Severity, StderrSink};
use crate::statement::StatementCall;
use crate::summary::summarize;

/// What one instrumented call amounted to, as seen from the epilogue.
///
/// Computed after the delegated invocation returns or raises; lives only
/// long enough to build the log emission.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionOutcome {
    /// Wall-clock time spent in the delegated invocation.
    pub elapsed: Duration,
    /// Result-set size. Present for reads (0 when the read failed), absent
    /// for mutations.
    pub rows: Option<usize>,
    /// Whether the delegated invocation succeeded.
    pub ok: bool,
}

/// Statement instrumentation gate.
///
/// Holds the immutable threshold configuration and an injected log sink.
/// Stateless per call; shared freely across threads.
///
/// The wrapped invocation's outcome is the only thing the caller ever sees:
/// the reporting epilogue is best-effort and swallows its own failures,
/// logging them at error severity instead.
///
/// # Example
///
/// ```
/// use sqlecho::{EchoConfig, Params, SqlEcho, StatementCall};
///
/// let echo = SqlEcho::new(EchoConfig::new());
/// let call = StatementCall::read("SELECT * FROM users WHERE id = ?")
///     .bind("id")
///     .with_params(Params::value(7i64));
///
/// let rows: Result<Vec<String>, String> =
///     echo.observe_query(&call, || Ok(vec!["alice".to_string()]));
/// assert_eq!(rows.unwrap().len(), 1);
/// ```
pub struct SqlEcho {
    config: EchoConfig,
    sink: Arc<dyn LogSink>,
}

impl SqlEcho {
    /// Create a gate with the given thresholds, logging to stderr.
    pub fn new(config: EchoConfig) -> Self {
        Self {
            config,
            sink: Arc::new(StderrSink::default()),
        }
    }

    /// Replace the log sink.
    pub fn with_sink<S: LogSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Replace the log sink from an Arc.
    pub fn with_sink_arc(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &EchoConfig {
        &self.config
    }

    /// Instrument a row-returning invocation.
    ///
    /// `invoke` runs exactly once and its result is returned unchanged,
    /// whatever happens in the reporting epilogue.
    pub fn observe_query<R, E, F>(&self, call: &StatementCall, invoke: F) -> Result<Vec<R>, E>
    where
        R: Debug,
        F: FnOnce() -> Result<Vec<R>, E>,
    {
        let start = Instant::now();
        let result = invoke();
        let outcome = ExecutionOutcome {
            elapsed: start.elapsed(),
            rows: Some(result.as_ref().map(Vec::len).unwrap_or(0)),
            ok: result.is_ok(),
        };
        self.epilogue(call, &outcome, result.as_ref().ok().map(Vec::as_slice));
        result
    }

    /// Instrument a mutating invocation.
    ///
    /// Same protected-path semantics as [`observe_query`](Self::observe_query);
    /// mutations report no result size.
    pub fn observe_execute<T, E, F>(&self, call: &StatementCall, invoke: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let start = Instant::now();
        let result = invoke();
        let outcome = ExecutionOutcome {
            elapsed: start.elapsed(),
            rows: None,
            ok: result.is_ok(),
        };
        self.epilogue::<()>(call, &outcome, None);
        result
    }

    /// Best-effort reporting pass. Must never reach the caller: even a
    /// panicking `Debug` impl or sink only produces an error record.
    fn epilogue<R: Debug>(
        &self,
        call: &StatementCall,
        outcome: &ExecutionOutcome,
        rows: Option<&[R]>,
    ) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| {
            self.report(call, outcome, rows);
        })) {
            self.sink.emit(
                Severity::Error,
                &format!("statement logging failed: {}", panic_message(&payload)),
            );
        }
    }

    fn report<R: Debug>(
        &self,
        call: &StatementCall,
        outcome: &ExecutionOutcome,
        rows: Option<&[R]>,
    ) {
        let display = self.display_sql(call);
        let severity = self.classify(call, outcome);
        let elapsed = outcome.elapsed.as_millis();
        match outcome.rows {
            Some(n) => self.sink.emit(
                severity,
                &format!("executed sql: [{display}] elapsed: {elapsed}ms rows: {n}"),
            ),
            None => self.sink.emit(
                severity,
                &format!("executed sql: [{display}] elapsed: {elapsed}ms"),
            ),
        }

        if self.config.dump_results && call.kind().is_read() {
            self.dump_rows(rows.unwrap_or(&[]));
        }
    }

    /// Build the display text: normalized, with parameters substituted when
    /// possible. A substitution failure falls back to the normalized text
    /// and is reported separately at error severity.
    fn display_sql(&self, call: &StatementCall) -> String {
        let normalized = normalize(call.sql());
        if normalized.is_empty() {
            return normalized;
        }
        match substitute(&normalized, call) {
            Ok(substituted) => substituted,
            Err(err) => {
                self.sink
                    .emit(Severity::Error, &format!("sql reconstruction failed: {err}"));
                normalized
            }
        }
    }

    fn classify(&self, call: &StatementCall, outcome: &ExecutionOutcome) -> Severity {
        let too_many = call.kind().is_read()
            && outcome
                .rows
                .is_some_and(|n| n > self.config.row_warn_threshold);
        if too_many || outcome.elapsed > self.config.slow_threshold {
            Severity::Warn
        } else {
            Severity::Info
        }
    }

    /// Second, separate record for the result contents. The dump cap reuses
    /// the row-count warning threshold; a panicking element `Debug` is
    /// reported instead of dumped.
    fn dump_rows<R: Debug>(&self, rows: &[R]) {
        match panic::catch_unwind(AssertUnwindSafe(|| {
            summarize(rows, self.config.row_warn_threshold)
        })) {
            Ok((severity, message)) => self.sink.emit(severity, &message),
            Err(payload) => {
                let err = EchoError::summarize(panic_message(&payload));
                self.sink.emit(Severity::Error, &err.to_string());
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
