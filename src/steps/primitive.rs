//! Type guards for JSON primitives
//!
//! Each guard is available as a [`StepContributor`] struct (for custom
//! messages) and as a constructor function that starts a new schema.

use serde_json::Value;

use super::{predicate_step, with_message};
use crate::issue::{MessageHandler, Payload};
use crate::schema::{Schema, SchemaMeta};
use crate::step::{RuntimeStep, StepContributor};

macro_rules! type_guard {
    (
        $(#[$doc:meta])*
        $step:ident, $name:literal, $code:literal, $default:literal, $predicate:expr
    ) => {
        $(#[$doc])*
        #[derive(Clone, Default)]
        pub struct $step {
            message: Option<MessageHandler>,
        }

        impl $step {
            /// Create the guard with its default message.
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl std::fmt::Debug for $step {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($step))
                    .field("message", &self.message.as_ref().map(|_| "<function>"))
                    .finish()
            }
        }

        impl StepContributor for $step {
            fn name(&self) -> &'static str {
                $name
            }

            fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
                vec![predicate_step(
                    $code,
                    $default.to_string(),
                    self.message.clone(),
                    Payload::new(),
                    $predicate,
                )]
            }
        }

        with_message!($step);
    };
}

type_guard!(
    /// Rejects every value.
    IsNever, "never", "never:expected_never", "Expected never.", |_: &Value| false
);

type_guard!(
    /// Accepts only `null`.
    IsNull, "null", "null:expected_null", "Expected null.", Value::is_null
);

type_guard!(
    /// Accepts only booleans.
    IsBoolean, "boolean", "boolean:expected_boolean", "Expected a boolean.", Value::is_boolean
);

type_guard!(
    /// Accepts only numbers.
    IsNumber, "number", "number:expected_number", "Expected a number.", Value::is_number
);

type_guard!(
    /// Accepts numbers without a fractional part.
    IsInteger, "integer", "integer:expected_integer", "Expected an integer.", is_integer
);

type_guard!(
    /// Accepts only strings.
    IsString, "string", "string:expected_string", "Expected a string.", Value::is_string
);

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(number) if number.is_i64() || number.is_u64() => true,
        Value::Number(number) => number.as_f64().is_some_and(|n| n.fract() == 0.0),
        _ => false,
    }
}

/// Accepts every value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyValue;

impl StepContributor for AnyValue {
    fn name(&self) -> &'static str {
        "any"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        Vec::new()
    }
}

/// Accepts only values equal to a fixed JSON value.
#[derive(Clone)]
pub struct Literal {
    expected: Value,
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Literal")
            .field("expected", &self.expected)
            .finish()
    }
}

impl Literal {
    /// Match exactly `expected`.
    pub fn new(expected: Value) -> Self {
        Literal {
            expected,
            message: None,
        }
    }
}

with_message!(Literal);

impl StepContributor for Literal {
    fn name(&self) -> &'static str {
        "literal"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let expected = self.expected.clone();
        let mut extra = Payload::new();
        extra.insert("expected".to_string(), expected.clone());
        vec![predicate_step(
            "literal:expected_literal",
            "Expected literal value.".to_string(),
            self.message.clone(),
            extra,
            move |value| *value == expected,
        )]
    }
}

/// A schema accepting anything.
pub fn any() -> Schema {
    Schema::new().with(&AnyValue)
}

/// A schema rejecting everything.
pub fn never() -> Schema {
    Schema::new().with(&IsNever::new())
}

/// A schema accepting only `null`.
pub fn null() -> Schema {
    Schema::new().with(&IsNull::new())
}

/// A schema accepting booleans.
pub fn boolean() -> Schema {
    Schema::new().with(&IsBoolean::new())
}

/// A schema accepting numbers.
pub fn number() -> Schema {
    Schema::new().with(&IsNumber::new())
}

/// A schema accepting integral numbers.
pub fn integer() -> Schema {
    Schema::new().with(&IsInteger::new())
}

/// A schema accepting strings.
///
/// ```
/// use serde_json::json;
/// use valchecker::steps::string;
///
/// let result = string().execute(json!(true)).into_ready().unwrap();
/// let issue = result.issues().unwrap().first();
/// assert_eq!(issue.code, "string:expected_string");
/// assert_eq!(issue.payload["value"], json!(true));
/// ```
pub fn string() -> Schema {
    Schema::new().with(&IsString::new())
}

/// A schema accepting only `expected`.
pub fn literal(expected: Value) -> Schema {
    Schema::new().with(&Literal::new(expected))
}
