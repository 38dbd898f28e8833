//! The intercepted-call snapshot: statement text, placeholder bindings, and
//! the parameter payload they resolve against.

use std::collections::BTreeMap;

use crate::value::ParamValue;

/// The kind of operation an intercepted statement performs.
///
/// Reads produce a result collection whose size feeds the row-count
/// threshold; mutations report no size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Row-returning statement (SELECT, WITH, ...)
    Read,
    /// Data- or schema-changing statement
    Mutate,
}

impl StatementKind {
    /// Detect the operation kind from the statement text.
    ///
    /// Skips leading whitespace, SQL comments, and parentheses before the
    /// keyword check. Anything that is not recognizably row-returning is
    /// treated as a mutation.
    pub fn from_sql(sql: &str) -> Self {
        let head = strip_leading_noise(sql);
        let read = ["SELECT", "WITH", "VALUES", "SHOW", "EXPLAIN"]
            .iter()
            .any(|kw| keyword_eq(head, kw));
        if read {
            StatementKind::Read
        } else {
            StatementKind::Mutate
        }
    }

    /// Whether this kind returns a countable result collection.
    pub fn is_read(self) -> bool {
        matches!(self, StatementKind::Read)
    }
}

/// Strip leading whitespace, `--` and `/* */` comments, and parentheses from
/// statement text to expose the first meaningful keyword.
fn strip_leading_noise(sql: &str) -> &str {
    let mut s = sql;
    loop {
        let before = s;
        s = s.trim_start();
        if let Some(rest) = s.strip_prefix("--") {
            match rest.find('\n') {
                Some(pos) => {
                    s = &rest[pos + 1..];
                    continue;
                }
                // comment is the whole remaining string
                None => return "",
            }
        }
        if let Some(rest) = s.strip_prefix("/*") {
            match rest.find("*/") {
                Some(pos) => {
                    s = &rest[pos + 2..];
                    continue;
                }
                // unclosed block comment
                None => return "",
            }
        }
        if let Some(rest) = s.strip_prefix('(') {
            s = rest;
            continue;
        }
        if s == before {
            return s;
        }
    }
}

fn keyword_eq(s: &str, keyword: &str) -> bool {
    match s.get(0..keyword.len()) {
        Some(prefix) => prefix.eq_ignore_ascii_case(keyword),
        None => false,
    }
}

/// Which way a bound value flows through its placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindDirection {
    /// Value flows into the statement
    In,
    /// Value flows out of the call; no input value exists for it
    Out,
    /// Value flows both ways
    InOut,
}

impl BindDirection {
    /// Whether a binding in this direction carries an input value to resolve.
    pub fn requires_value(self) -> bool {
        matches!(self, BindDirection::In | BindDirection::InOut)
    }
}

/// One placeholder descriptor, in statement order.
///
/// The Nth `?` marker in the text is always paired with the Nth binding in
/// the list, regardless of property-name collisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderBinding {
    property: String,
    direction: BindDirection,
}

impl PlaceholderBinding {
    /// An input binding for the named property.
    pub fn input(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: BindDirection::In,
        }
    }

    /// An output-only binding for the named property.
    pub fn output(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: BindDirection::Out,
        }
    }

    /// An input-output binding for the named property.
    pub fn input_output(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: BindDirection::InOut,
        }
    }

    /// Logical property name this binding resolves.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Direction the bound value flows.
    pub fn direction(&self) -> BindDirection {
        self.direction
    }
}

/// The parameter payload supplied with an intercepted call.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    /// No payload; every binding resolves to null
    #[default]
    None,
    /// Atomic payload with a direct rendering, used as-is for every binding
    Value(ParamValue),
    /// Structured payload decomposed by property name
    Named(BTreeMap<String, ParamValue>),
}

impl Params {
    /// An atomic payload.
    pub fn value(v: impl Into<ParamValue>) -> Self {
        Params::Value(v.into())
    }

    /// A structured payload from (name, value) pairs.
    pub fn named<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Params::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Decompose a JSON value into a payload.
    ///
    /// Objects become a structured payload (top-level fields mapped onto
    /// value kinds, nested arrays/objects kept as JSON); any other JSON
    /// value becomes an atomic payload.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => Params::Named(
                map.into_iter()
                    .map(|(k, v)| (k, ParamValue::from_json(v)))
                    .collect(),
            ),
            other => Params::Value(ParamValue::from_json(other)),
        }
    }

    /// Whether a payload is present at all.
    pub fn is_none(&self) -> bool {
        matches!(self, Params::None)
    }

    /// Look up a named property on a structured payload.
    ///
    /// An exact key hit wins. Otherwise a dotted path (`order.id`) selects a
    /// JSON-valued field by its first segment and traverses the remaining
    /// segments field-by-field. Returns `None` for atomic/absent payloads or
    /// when the path resolves nowhere.
    pub fn property(&self, name: &str) -> Option<ParamValue> {
        let Params::Named(map) = self else {
            return None;
        };
        if let Some(v) = map.get(name) {
            return Some(v.clone());
        }
        let (head, rest) = name.split_once('.')?;
        let ParamValue::Json(root) = map.get(head)? else {
            return None;
        };
        let mut node = root;
        for segment in rest.split('.') {
            node = node.get(segment)?;
        }
        Some(ParamValue::from_json(node.clone()))
    }
}

/// Immutable snapshot of one intercepted operation.
///
/// Created once per call by the host adapter, read by the instrumentation
/// gate, and discarded when the call completes. Reconstruction never mutates
/// the snapshot; substitution operates on a working copy of the text.
#[derive(Debug, Clone)]
pub struct StatementCall {
    sql: String,
    kind: StatementKind,
    bindings: Vec<PlaceholderBinding>,
    params: Params,
    additional: BTreeMap<String, ParamValue>,
}

impl StatementCall {
    /// Snapshot a statement, detecting the operation kind from its text.
    pub fn new(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let kind = StatementKind::from_sql(&sql);
        Self {
            sql,
            kind,
            bindings: Vec::new(),
            params: Params::None,
            additional: BTreeMap::new(),
        }
    }

    /// Snapshot a row-returning statement.
    pub fn read(sql: impl Into<String>) -> Self {
        let mut call = Self::new(sql);
        call.kind = StatementKind::Read;
        call
    }

    /// Snapshot a mutating statement.
    pub fn mutate(sql: impl Into<String>) -> Self {
        let mut call = Self::new(sql);
        call.kind = StatementKind::Mutate;
        call
    }

    /// Attach the ordered placeholder binding list.
    pub fn with_bindings(mut self, bindings: impl IntoIterator<Item = PlaceholderBinding>) -> Self {
        self.bindings = bindings.into_iter().collect();
        self
    }

    /// Append one input binding.
    pub fn bind(mut self, property: impl Into<String>) -> Self {
        self.bindings.push(PlaceholderBinding::input(property));
        self
    }

    /// Attach the parameter payload.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Record a pre-resolved parameter known outside the payload, by name.
    ///
    /// These take precedence over the payload during resolution.
    pub fn with_additional(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Self {
        self.additional.insert(name.into(), value.into());
        self
    }

    /// Raw statement text as supplied by the host.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Operation kind.
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Placeholder bindings in statement order.
    pub fn bindings(&self) -> &[PlaceholderBinding] {
        &self.bindings
    }

    /// Parameter payload.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Pre-resolved additional parameter, by name.
    pub fn additional(&self, name: &str) -> Option<ParamValue> {
        self.additional.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_detection_skips_comments_and_parens() {
        assert_eq!(
            StatementKind::from_sql("SELECT * FROM users"),
            StatementKind::Read
        );
        assert_eq!(
            StatementKind::from_sql("  select 1"),
            StatementKind::Read
        );
        assert_eq!(
            StatementKind::from_sql("-- note\n(WITH c AS (SELECT 1) SELECT * FROM c)"),
            StatementKind::Read
        );
        assert_eq!(
            StatementKind::from_sql("/* hint */ UPDATE users SET name = ?"),
            StatementKind::Mutate
        );
        assert_eq!(
            StatementKind::from_sql("INSERT INTO users (name) VALUES (?)"),
            StatementKind::Mutate
        );
        assert_eq!(StatementKind::from_sql("/* unclosed"), StatementKind::Mutate);
    }

    #[test]
    fn builder_produces_an_immutable_snapshot() {
        let call = StatementCall::read("SELECT * FROM t WHERE a = ?")
            .bind("a")
            .with_additional("limit", 10i64);
        assert_eq!(call.kind(), StatementKind::Read);
        assert_eq!(call.bindings().len(), 1);
        assert_eq!(call.bindings()[0].property(), "a");
        assert_eq!(call.additional("limit"), Some(ParamValue::Int(10)));
        assert_eq!(call.additional("missing"), None);
    }

    #[test]
    fn named_payload_resolves_properties_and_dotted_paths() {
        let params = Params::named([
            ("id", ParamValue::Int(7)),
            (
                "order",
                ParamValue::Json(serde_json::json!({"item": {"sku": "A-1"}})),
            ),
        ]);
        assert_eq!(params.property("id"), Some(ParamValue::Int(7)));
        assert_eq!(
            params.property("order.item.sku"),
            Some(ParamValue::Text("A-1".into()))
        );
        assert_eq!(params.property("order.missing"), None);
        assert_eq!(params.property("nope"), None);
    }

    #[test]
    fn atomic_and_absent_payloads_have_no_properties() {
        assert_eq!(Params::value(1i64).property("x"), None);
        assert_eq!(Params::None.property("x"), None);
    }

    #[test]
    fn json_objects_decompose_into_named_payloads() {
        let params = Params::from_json(serde_json::json!({"a": 5, "b": "x"}));
        assert_eq!(params.property("a"), Some(ParamValue::Int(5)));
        assert_eq!(params.property("b"), Some(ParamValue::Text("x".into())));

        let atomic = Params::from_json(serde_json::json!(42));
        assert_eq!(atomic, Params::Value(ParamValue::Int(42)));
    }
}
