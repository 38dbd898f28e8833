//! Example routing statement records through the `tracing` ecosystem.
//!
//! Run with:
//!   cargo run --example tracing_sink -p sqlecho
//!
//! Records are emitted under the `sqlecho.sql` target, so hosts can filter
//! them with the usual env-filter syntax (e.g. `RUST_LOG=sqlecho.sql=warn`).

use std::time::Duration;

use sqlecho::{EchoConfig, Params, ParamValue, SqlEcho, StatementCall, TracingSink};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let echo = SqlEcho::new(
        EchoConfig::new()
            .with_row_warn_threshold(2)
            .with_slow_threshold(Duration::from_millis(50)),
    )
    .with_sink(TracingSink::new());

    let call = StatementCall::read("SELECT sku, qty FROM stock WHERE qty < ?")
        .bind("qty")
        .with_params(Params::value(10i64));

    // three rows against a threshold of two: logged at warn
    let low_stock: Result<Vec<(String, i64)>, String> = echo.observe_query(&call, || {
        Ok(vec![
            ("A-1".to_string(), 3),
            ("B-2".to_string(), 1),
            ("C-3".to_string(), 9),
        ])
    });
    tracing::info!("{} items low on stock", low_stock.expect("query failed").len());

    // an unresolvable binding: the record falls back to the placeholder form
    // and a separate error-severity record explains why
    let call = StatementCall::read("SELECT * FROM stock WHERE sku = ?")
        .bind("sku")
        .with_params(Params::named([("item", ParamValue::from("A-1"))]));
    let _: Result<Vec<(String, i64)>, String> = echo.observe_query(&call, || Ok(Vec::new()));
}
