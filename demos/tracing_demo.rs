//! Shows the log output of schema execution
//!
//! Run with: cargo run --example tracing_demo --features tracing

use serde_json::{json, Value};
use valchecker::prelude::*;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let lookup = string().transform_async(|value: Value| async move {
        tokio::task::yield_now().await;
        match value.as_str() {
            Some("admin") => Err("reserved name".to_string()),
            _ => Ok(value),
        }
    });

    let schema = array(lookup).fallback(|issues| {
        tracing::info!(count = issues.len(), "recovering from issues");
        json!([])
    });

    let result = schema.execute_async(json!(["guest", "admin"])).await;
    tracing::info!(?result, "finished");
}
