//! Statement text reconstruction: whitespace normalization and positional
//! placeholder substitution.

use std::sync::OnceLock;

use crate::error::{EchoError, EchoResult};
use crate::statement::{Params, StatementCall};
use crate::value::ParamValue;

fn whitespace_re() -> &'static regex::Regex {
    static WHITESPACE_RE: OnceLock<regex::Regex> = OnceLock::new();
    WHITESPACE_RE
        .get_or_init(|| regex::Regex::new(r"\s+").expect("invalid built-in whitespace regex"))
}

/// Collapse every run of whitespace (newlines included) into a single space.
///
/// Idempotent; empty input returns an empty string.
pub fn normalize(sql: &str) -> String {
    whitespace_re().replace_all(sql, " ").into_owned()
}

/// Substitute bound parameter values into the statement's `?` markers.
///
/// `text` is the (already normalized) working copy; the call snapshot is
/// never mutated. Bindings are consumed strictly in order, one marker each,
/// scanning left to right without backtracking: a `?` inside an already
/// substituted value is never treated as a marker.
///
/// Fails only when a named property cannot be resolved on the structured
/// payload; the gate recovers by falling back to the unsubstituted text.
pub fn substitute(text: &str, call: &StatementCall) -> EchoResult<String> {
    if call.bindings().is_empty() || call.params().is_none() {
        return Ok(text.to_string());
    }

    let mut out = text.to_string();
    let mut cursor = 0;
    for binding in call.bindings() {
        let value = if binding.direction().requires_value() {
            resolve(call, binding.property())?
        } else {
            // Output-only bindings skip resolution but still occupy a marker
            // position, substituting as null. Matches the observed behavior
            // of the system this layer instruments; confirm with its owners
            // before changing.
            ParamValue::Null
        };
        let rendered = value.render();
        match out[cursor..].find('?') {
            Some(rel) => {
                let pos = cursor + rel;
                out.replace_range(pos..pos + 1, &rendered);
                cursor = pos + rendered.len();
            }
            // more bindings than markers: nothing left to replace
            None => break,
        }
    }
    Ok(out)
}

/// Resolve the input value for one binding.
///
/// Resolution order: the call's pre-resolved additional parameters by name,
/// then the payload itself (absent payload resolves to null, an atomic
/// payload is used as-is, a structured payload is decomposed by property
/// name).
fn resolve(call: &StatementCall, property: &str) -> EchoResult<ParamValue> {
    if let Some(v) = call.additional(property) {
        return Ok(v);
    }
    match call.params() {
        Params::None => Ok(ParamValue::Null),
        Params::Value(v) => Ok(v.clone()),
        Params::Named(_) => call
            .params()
            .property(property)
            .ok_or_else(|| EchoError::substitution(property, "no such property on parameter payload")),
    }
}
