//! Validates a signup form and prints every issue with its path
//!
//! Run with: cargo run --example signup_form

use serde_json::{json, Value};
use valchecker::prelude::*;

fn signup() -> Schema {
    strict_object([
        (
            "username",
            Field::required(string().to_trimmed().min(3).max(16)),
        ),
        (
            "email",
            Field::required(string().to_trimmed().to_lowercase().check(|value| {
                value.as_str().is_some_and(|email| email.contains('@'))
            })),
        ),
        ("age", Field::optional(integer().min(13))),
        (
            "interests",
            Field::optional(array(union([
                literal(json!("rust")),
                literal(json!("go")),
                string().starts_with("other:"),
            ]))),
        ),
    ])
}

fn report(label: &str, input: Value) {
    println!("--- {} ---", label);
    match signup().execute(input).into_ready() {
        Some(ExecutionResult::Success(value)) => println!("ok: {}", value),
        Some(ExecutionResult::Failure(issues)) => {
            for issue in issues.iter() {
                println!("  {}", issue);
            }
        }
        None => println!("unexpected suspension"),
    }
}

fn main() {
    report(
        "valid",
        json!({
            "username": "  ferris ",
            "email": "Ferris@Example.org",
            "interests": ["rust", "other:crabs"]
        }),
    );

    report(
        "invalid",
        json!({
            "username": "x",
            "email": "nowhere",
            "age": 12.5,
            "interests": ["java"],
            "referrer": "ad"
        }),
    );
}
