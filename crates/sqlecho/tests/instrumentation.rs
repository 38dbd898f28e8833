//! End-to-end behavior of the instrumentation gate through the public API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use sqlecho::{
    EchoConfig, LogSink, Params, ParamValue, PlaceholderBinding, Severity, SqlEcho, StatementCall,
};

/// Sink that records every emission for assertions.
#[derive(Default)]
struct RecordingSink {
    records: Mutex<Vec<(Severity, String)>>,
}

impl RecordingSink {
    fn records(&self) -> Vec<(Severity, String)> {
        self.records.lock().unwrap().clone()
    }
}

impl LogSink for RecordingSink {
    fn emit(&self, severity: Severity, message: &str) {
        self.records
            .lock()
            .unwrap()
            .push((severity, message.to_string()));
    }
}

fn gate(config: EchoConfig) -> (SqlEcho, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    (SqlEcho::new(config).with_sink_arc(sink.clone()), sink)
}

#[derive(Debug, PartialEq, Clone)]
struct User {
    id: i64,
    name: String,
}

#[test]
fn results_reach_the_caller_bit_for_bit() {
    let (echo, _) = gate(EchoConfig::new());
    let expected = vec![
        User {
            id: 1,
            name: "alice".into(),
        },
        User {
            id: 2,
            name: "bob".into(),
        },
    ];
    let returned = expected.clone();

    let call = StatementCall::read("SELECT id, name FROM users");
    let result: Result<Vec<User>, String> = echo.observe_query(&call, move || Ok(returned));
    assert_eq!(result.unwrap(), expected);
}

#[test]
fn delegate_errors_propagate_even_when_reconstruction_fails() {
    let (echo, sink) = gate(EchoConfig::new());

    // unresolvable binding forces the substitution fallback path
    let call = StatementCall::read("SELECT * FROM users WHERE id = ?")
        .bind("no_such_property")
        .with_params(Params::named([("id", ParamValue::Int(1))]));

    let result: Result<Vec<User>, &str> = echo.observe_query(&call, || Err("connection reset"));
    assert_eq!(result.unwrap_err(), "connection reset");

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].0, Severity::Error);
    assert!(records[0].1.contains("sql reconstruction failed"));
    assert_eq!(records[1].0, Severity::Info);
    assert!(records[1].1.contains("[SELECT * FROM users WHERE id = ?]"));
}

#[test]
fn full_reconstruction_with_mixed_value_kinds() {
    let (echo, sink) = gate(EchoConfig::new());

    let call = StatementCall::mutate(
        "UPDATE orders\n  SET note = ?, paid = ?\n  WHERE id = ? AND customer = ?",
    )
    .bind("note")
    .bind("paid")
    .bind("id")
    .bind("customer")
    .with_params(Params::named([
        ("note", ParamValue::Text("rush".into())),
        ("paid", ParamValue::Bool(true)),
        ("id", ParamValue::Int(42)),
        ("customer", ParamValue::Null),
    ]));

    let result: Result<u64, ()> = echo.observe_execute(&call, || Ok(1));
    assert_eq!(result.unwrap(), 1);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].1.contains(
        "UPDATE orders SET note = 'rush', paid = true WHERE id = 42 AND customer = null"
    ));
}

#[test]
fn severity_matrix_matches_the_thresholds() {
    // generous duration threshold keeps elapsed time out of the picture
    let config = EchoConfig::new()
        .with_row_warn_threshold(3)
        .with_slow_threshold(Duration::from_secs(60));
    let (echo, sink) = gate(config);

    let call = StatementCall::read("SELECT 1");
    let _: Result<Vec<u8>, ()> = echo.observe_query(&call, || Ok(vec![0; 4]));
    let _: Result<Vec<u8>, ()> = echo.observe_query(&call, || Ok(vec![0; 3]));

    let records = sink.records();
    assert_eq!(records[0].0, Severity::Warn);
    assert_eq!(records[1].0, Severity::Info);
}

#[test]
fn output_bindings_hold_their_position() {
    let (echo, sink) = gate(EchoConfig::new());

    let call = StatementCall::mutate("CALL register(?, ?, ?)")
        .with_bindings([
            PlaceholderBinding::input("name"),
            PlaceholderBinding::output("new_id"),
            PlaceholderBinding::input_output("attempts"),
        ])
        .with_params(Params::named([
            ("name", ParamValue::Text("carol".into())),
            ("attempts", ParamValue::Int(1)),
        ]));

    let result: Result<u64, ()> = echo.observe_execute(&call, || Ok(1));
    assert!(result.is_ok());
    assert!(sink.records()[0].1.contains("CALL register('carol', null, 1)"));
}

#[test]
fn dumping_stays_within_the_cap() {
    let config = EchoConfig::new()
        .with_row_warn_threshold(2)
        .with_dump_results(true);
    let (echo, sink) = gate(config);
    let call = StatementCall::read("SELECT id, name FROM users");

    let user = User {
        id: 1,
        name: "alice".into(),
    };
    let _: Result<Vec<User>, ()> = echo.observe_query(&call, || Ok(vec![user]));
    let _: Result<Vec<User>, ()> = echo.observe_query(&call, || Ok(Vec::new()));

    let records = sink.records();
    assert_eq!(records.len(), 4);
    assert!(records[1].1.starts_with("statement result: User"));
    assert_eq!(records[3].1, "statement result is empty");
}
