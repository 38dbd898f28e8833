//! Bounded structural dumps of read results.

use std::fmt::Debug;

use crate::sink::Severity;

/// Summarize a result collection for a diagnostic log record.
///
/// Empty collections produce an "empty" notice without iterating. Up to
/// `cap` elements are dumped via their `Debug` form, joined by
/// newline-tab separators. Larger collections produce a size-exceeded
/// notice instead, to bound log volume.
pub fn summarize<R: Debug>(rows: &[R], cap: usize) -> (Severity, String) {
    if rows.is_empty() {
        return (Severity::Info, "statement result is empty".to_string());
    }
    if rows.len() > cap {
        return (
            Severity::Warn,
            format!(
                "statement result size {} exceeds dump cap {}",
                rows.len(),
                cap
            ),
        );
    }
    let body = rows
        .iter()
        .map(|row| format!("{row:?}"))
        .collect::<Vec<_>>()
        .join("\n\t");
    (Severity::Info, format!("statement result: {body}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_results_emit_a_notice_without_iterating() {
        let rows: Vec<i64> = Vec::new();
        let (severity, message) = summarize(&rows, 10);
        assert_eq!(severity, Severity::Info);
        assert_eq!(message, "statement result is empty");
    }

    #[test]
    fn small_results_dump_each_element() {
        let rows = vec![(1, "a"), (2, "b")];
        let (severity, message) = summarize(&rows, 10);
        assert_eq!(severity, Severity::Info);
        assert_eq!(message, "statement result: (1, \"a\")\n\t(2, \"b\")");
    }

    #[test]
    fn oversized_results_skip_the_element_dump() {
        let rows = vec![0u8; 3];
        let (severity, message) = summarize(&rows, 2);
        assert_eq!(severity, Severity::Warn);
        assert_eq!(message, "statement result size 3 exceeds dump cap 2");
    }
}
