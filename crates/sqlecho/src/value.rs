//! Bound parameter values and their statement-embeddable text form.

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

/// Display pattern for date/time values inlined into statement text.
const DATE_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Format tag embedded next to rendered timestamps so a reader knows the
/// intended database-side precision. Never parsed back.
const DB_TIMESTAMP_PATTERN: &str = "yyyy-MM-dd HH24:MI:ss.ff";

/// A single value bound to a statement placeholder.
///
/// The renderer only distinguishes the kinds that get special treatment
/// (null, strings, date/time); everything else falls through to its default
/// textual form.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Absent value, rendered as the literal `null`
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    /// Naive timestamp (no offset)
    Timestamp(NaiveDateTime),
    /// UTC timestamp
    TimestampTz(DateTime<Utc>),
    /// Structured leftover (arrays, nested objects)
    Json(serde_json::Value),
}

impl ParamValue {
    /// Render this value into its statement-embeddable text form.
    ///
    /// The output is for logging only and is never re-executed, so string
    /// values are single-quoted without internal-quote escaping. Rendering
    /// never fails; kinds without a dedicated form use their default textual
    /// conversion.
    pub fn render(&self) -> String {
        match self {
            ParamValue::Null => "null".to_string(),
            ParamValue::Text(s) => format!("'{s}'"),
            ParamValue::Timestamp(ts) => {
                format!(
                    "to_timestamp('{}', '{}')",
                    ts.format(DATE_PATTERN),
                    DB_TIMESTAMP_PATTERN
                )
            }
            ParamValue::TimestampTz(ts) => {
                format!(
                    "to_timestamp('{}', '{}')",
                    ts.format(DATE_PATTERN),
                    DB_TIMESTAMP_PATTERN
                )
            }
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::Uuid(id) => id.to_string(),
            ParamValue::Json(v) => v.to_string(),
        }
    }

    /// Map a JSON scalar onto the matching value kind.
    ///
    /// Arrays and objects stay structured; the payload layer decides whether
    /// to decompose them further by property name.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ParamValue::Null,
            serde_json::Value::Bool(b) => ParamValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ParamValue::Int(i),
                None => ParamValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ParamValue::Text(s),
            other => ParamValue::Json(other),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(n.into())
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        ParamValue::Float(f)
    }
}

impl From<Uuid> for ParamValue {
    fn from(id: Uuid) -> Self {
        ParamValue::Uuid(id)
    }
}

impl From<NaiveDateTime> for ParamValue {
    fn from(ts: NaiveDateTime) -> Self {
        ParamValue::Timestamp(ts)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(ts: DateTime<Utc>) -> Self {
        ParamValue::TimestampTz(ts)
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(v: serde_json::Value) -> Self {
        ParamValue::from_json(v)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => ParamValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn null_renders_as_literal_null() {
        assert_eq!(ParamValue::Null.render(), "null");
        let absent: Option<i64> = None;
        assert_eq!(ParamValue::from(absent).render(), "null");
    }

    #[test]
    fn strings_are_single_quoted_without_escaping() {
        assert_eq!(ParamValue::from("x").render(), "'x'");
        assert_eq!(ParamValue::from("it's").render(), "'it's'");
    }

    #[test]
    fn timestamps_render_as_tagged_to_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(
            ParamValue::from(ts).render(),
            "to_timestamp('2024-01-02 03:04:05', 'yyyy-MM-dd HH24:MI:ss.ff')"
        );
    }

    #[test]
    fn other_kinds_use_their_default_text_form() {
        assert_eq!(ParamValue::from(5i64).render(), "5");
        assert_eq!(ParamValue::from(true).render(), "true");
        assert_eq!(ParamValue::from(2.5).render(), "2.5");
        let id = Uuid::nil();
        assert_eq!(ParamValue::from(id).render(), id.to_string());
        let arr = serde_json::json!([1, 2]);
        assert_eq!(ParamValue::Json(arr.clone()).render(), arr.to_string());
    }

    #[test]
    fn json_scalars_map_onto_value_kinds() {
        assert_eq!(
            ParamValue::from_json(serde_json::json!(null)),
            ParamValue::Null
        );
        assert_eq!(
            ParamValue::from_json(serde_json::json!(7)),
            ParamValue::Int(7)
        );
        assert_eq!(
            ParamValue::from_json(serde_json::json!("a")),
            ParamValue::Text("a".into())
        );
        assert!(matches!(
            ParamValue::from_json(serde_json::json!({"k": 1})),
            ParamValue::Json(_)
        ));
    }
}
