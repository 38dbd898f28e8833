//! Operator-facing thresholds for the instrumentation gate.

use std::time::Duration;

/// Thresholds and flags read on every instrumented call.
///
/// Constructed once, never mutated during operation. Thresholds only select
/// log severity after the fact; they never alter call behavior.
#[derive(Debug, Clone)]
pub struct EchoConfig {
    /// Row-count threshold above which a read logs at warning severity.
    pub row_warn_threshold: usize,
    /// Elapsed-time threshold above which any call logs at warning severity.
    pub slow_threshold: Duration,
    /// Whether to emit a second record dumping read results.
    pub dump_results: bool,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            row_warn_threshold: 1000,
            slow_threshold: Duration::from_millis(5000),
            dump_results: false,
        }
    }
}

impl EchoConfig {
    /// Create a configuration with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row-count warning threshold.
    pub fn with_row_warn_threshold(mut self, rows: usize) -> Self {
        self.row_warn_threshold = rows;
        self
    }

    /// Set the slow-statement duration threshold.
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    /// Enable or disable result dumping.
    pub fn with_dump_results(mut self, enabled: bool) -> Self {
        self.dump_results = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_recognized_options() {
        let config = EchoConfig::new();
        assert_eq!(config.row_warn_threshold, 1000);
        assert_eq!(config.slow_threshold, Duration::from_millis(5000));
        assert!(!config.dump_results);
    }

    #[test]
    fn builder_overrides_each_option() {
        let config = EchoConfig::new()
            .with_row_warn_threshold(10)
            .with_slow_threshold(Duration::from_millis(250))
            .with_dump_results(true);
        assert_eq!(config.row_warn_threshold, 10);
        assert_eq!(config.slow_threshold, Duration::from_millis(250));
        assert!(config.dump_results);
    }
}
