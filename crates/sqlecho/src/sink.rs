//! Log sinks: where instrumentation records go.

use std::fmt;

/// Severity tier of one log record.
///
/// Info and warn reflect normal instrumentation outcomes; error reflects a
/// fault inside the instrumentation itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for severity-tagged instrumentation records.
///
/// Injected into the gate at construction. Implementations own their own
/// thread-safety; the gate never batches or retries emissions.
pub trait LogSink: Send + Sync {
    fn emit(&self, severity: Severity, message: &str);
}

/// A sink that prints records to stderr with a prefix.
#[derive(Debug, Clone)]
pub struct StderrSink {
    /// Prefix for log lines.
    pub prefix: String,
}

impl Default for StderrSink {
    fn default() -> Self {
        Self {
            prefix: "[sqlecho]".to_string(),
        }
    }
}

impl StderrSink {
    /// Create a new stderr sink with the default prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

impl LogSink for StderrSink {
    fn emit(&self, severity: Severity, message: &str) {
        eprintln!("{} [{}] {}", self.prefix, severity, message);
    }
}

/// A sink that emits records through the `tracing` ecosystem.
///
/// Events carry the fixed target `sqlecho.sql` so subscribers can filter the
/// statement log independently of the host application's own spans.
///
/// Enable via the crate feature: `sqlecho = { features = ["tracing"] }`
/// (on by default).
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl TracingSink {
    /// Create a new tracing sink.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "tracing")]
impl LogSink for TracingSink {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::info!(target: "sqlecho.sql", "{message}"),
            Severity::Warn => tracing::warn!(target: "sqlecho.sql", "{message}"),
            Severity::Error => tracing::error!(target: "sqlecho.sql", "{message}"),
        }
    }
}
