//! # sqlecho
//!
//! Statement logging for ORM-style execution pipelines.
//!
//! `sqlecho` wraps a data-access invocation, reconstructs a human-readable
//! rendition of the executed statement (bound parameters inlined into their
//! `?` placeholders), measures wall-clock latency and result-set size, and
//! emits tiered log records when configured thresholds are exceeded.
//!
//! ## Guarantees
//!
//! - **Non-interference**: the wrapped invocation runs exactly once and its
//!   result or error reaches the caller unchanged. Everything the reporting
//!   path does is best-effort; its own failures only produce error-severity
//!   log records.
//! - **Diagnostics only**: the reconstructed text is for operators' eyes.
//!   It is not escaped and must never be re-executed.
//!
//! ## Example
//!
//! ```
//! use sqlecho::{EchoConfig, Params, ParamValue, SqlEcho, StatementCall, StderrSink};
//! use std::time::Duration;
//!
//! let echo = SqlEcho::new(
//!     EchoConfig::new()
//!         .with_row_warn_threshold(500)
//!         .with_slow_threshold(Duration::from_secs(2)),
//! )
//! .with_sink(StderrSink::new());
//!
//! let call = StatementCall::read("SELECT * FROM users WHERE status = ? AND age > ?")
//!     .bind("status")
//!     .bind("age")
//!     .with_params(Params::named([
//!         ("status", ParamValue::from("active")),
//!         ("age", ParamValue::from(21i64)),
//!     ]));
//!
//! // Logs: executed sql: [SELECT * FROM users WHERE status = 'active' AND age > 21] ...
//! let rows: Result<Vec<String>, String> =
//!     echo.observe_query(&call, || Ok(vec!["alice".to_string()]));
//! # assert!(rows.is_ok());
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod instrument;
pub mod sink;
pub mod statement;
pub mod summary;
pub mod value;

pub use config::EchoConfig;
pub use error::{EchoError, EchoResult};
pub use format::{normalize, substitute};
pub use instrument::{ExecutionOutcome, SqlEcho};
pub use sink::{LogSink, Severity, StderrSink};
pub use statement::{BindDirection, Params, PlaceholderBinding, StatementCall, StatementKind};
pub use summary::summarize;
pub use value::ParamValue;

#[cfg(feature = "tracing")]
pub use sink::TracingSink;
