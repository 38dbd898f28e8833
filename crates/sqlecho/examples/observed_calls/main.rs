//! Example demonstrating instrumented data-access calls via SqlEcho.
//!
//! Run with:
//!   cargo run --example observed_calls -p sqlecho
//!
//! No database required: a tiny in-memory repository stands in for the real
//! data-access layer.

use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use sqlecho::{EchoConfig, Params, ParamValue, SqlEcho, StatementCall, StderrSink};

#[derive(Debug, Clone)]
struct User {
    id: i64,
    name: String,
    status: String,
}

/// Stand-in for the real data-access layer.
struct UserRepo {
    users: Vec<User>,
}

impl UserRepo {
    fn by_status(&self, status: &str) -> Result<Vec<User>, String> {
        // simulate some I/O latency
        thread::sleep(Duration::from_millis(20));
        Ok(self
            .users
            .iter()
            .filter(|u| u.status == status)
            .cloned()
            .collect())
    }

    fn deactivate_before(&self, _cutoff: NaiveDate) -> Result<u64, String> {
        thread::sleep(Duration::from_millis(5));
        Ok(2)
    }
}

fn main() {
    let repo = UserRepo {
        users: vec![
            User {
                id: 1,
                name: "alice".into(),
                status: "active".into(),
            },
            User {
                id: 2,
                name: "bob".into(),
                status: "active".into(),
            },
            User {
                id: 3,
                name: "carol".into(),
                status: "disabled".into(),
            },
        ],
    };

    let echo = SqlEcho::new(
        EchoConfig::new()
            .with_row_warn_threshold(1)
            .with_slow_threshold(Duration::from_millis(10))
            .with_dump_results(true),
    )
    .with_sink(StderrSink::new().prefix("[demo]"));

    // A read: slow + over the row threshold, so both the primary record
    // (warn) and a dump record appear.
    let call = StatementCall::read("SELECT id, name, status\n  FROM users\n  WHERE status = ?")
        .bind("status")
        .with_params(Params::value("active"));
    let active = echo
        .observe_query(&call, || repo.by_status("active"))
        .expect("query failed");
    for user in &active {
        println!("active: #{} {}", user.id, user.name);
    }

    // A mutation with a date parameter, rendered as a tagged to_timestamp.
    let cutoff = NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date");
    let call = StatementCall::mutate("UPDATE users SET status = ? WHERE last_seen < ?")
        .bind("status")
        .bind("cutoff")
        .with_params(Params::named([
            ("status", ParamValue::from("disabled")),
            (
                "cutoff",
                ParamValue::from(cutoff.and_hms_opt(0, 0, 0).expect("valid time")),
            ),
        ]));
    let changed = echo
        .observe_execute(&call, || repo.deactivate_before(cutoff))
        .expect("update failed");
    println!("deactivated {changed} users");
}
