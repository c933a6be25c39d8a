//! Execution results
//!
//! [`ExecutionResult`] is the single outcome shape of every step and schema:
//! either the validated (possibly transformed) value, or a non-empty list of
//! issues. Failures are data, never panics or errors that cross a schema
//! boundary.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use valchecker::issue::{create_issue, IssueSpec};
//! use valchecker::result::{failure, is_failure, is_success, success};
//!
//! let ok = success(json!(42));
//! assert!(is_success(&ok));
//!
//! let err = failure(create_issue(IssueSpec::new("number:expected_number", "Expected a number.")));
//! assert!(is_failure(&err));
//!
//! // Wire shape: `{ "value": ... }` or `{ "issues": [...] }`
//! assert_eq!(serde_json::to_value(&ok).unwrap(), json!({ "value": 42 }));
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::issue::{ExecutionIssue, Issues, PathSegment};

/// Outcome of running a step, pipeline or schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    /// The value passed every step
    Success(Value),
    /// At least one step reported issues
    Failure(Issues),
}

impl ExecutionResult {
    /// Wrap a value as a success. No validation happens here.
    #[inline]
    pub fn success(value: Value) -> Self {
        ExecutionResult::Success(value)
    }

    /// Wrap one issue or an already built issue list as a failure.
    #[inline]
    pub fn failure(issues: impl Into<Issues>) -> Self {
        ExecutionResult::Failure(issues.into())
    }

    /// Convert from a `Result`.
    #[inline]
    pub fn from_result(result: Result<Value, Issues>) -> Self {
        match result {
            Ok(value) => ExecutionResult::Success(value),
            Err(issues) => ExecutionResult::Failure(issues),
        }
    }

    /// Convert to a `Result`.
    ///
    /// ```
    /// use serde_json::json;
    /// use valchecker::ExecutionResult;
    ///
    /// assert_eq!(ExecutionResult::success(json!(1)).into_result(), Ok(json!(1)));
    /// ```
    #[inline]
    pub fn into_result(self) -> Result<Value, Issues> {
        match self {
            ExecutionResult::Success(value) => Ok(value),
            ExecutionResult::Failure(issues) => Err(issues),
        }
    }

    /// Check if this is a success.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success(_))
    }

    /// Check if this is a failure.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionResult::Failure(_))
    }

    /// The success value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            ExecutionResult::Success(value) => Some(value),
            ExecutionResult::Failure(_) => None,
        }
    }

    /// The issues, if any.
    pub fn issues(&self) -> Option<&Issues> {
        match self {
            ExecutionResult::Success(_) => None,
            ExecutionResult::Failure(issues) => Some(issues),
        }
    }

    /// Transform the success value if present.
    #[inline]
    pub fn map<F>(self, f: F) -> Self
    where
        F: FnOnce(Value) -> Value,
    {
        match self {
            ExecutionResult::Success(value) => ExecutionResult::Success(f(value)),
            failure @ ExecutionResult::Failure(_) => failure,
        }
    }

    /// Prepend path segments to every issue; successes are unchanged.
    pub fn with_path_prefix(self, segments: &[PathSegment]) -> Self {
        match self {
            ExecutionResult::Failure(issues) => {
                ExecutionResult::Failure(issues.with_path_prefix(segments))
            }
            success @ ExecutionResult::Success(_) => success,
        }
    }
}

impl From<ExecutionIssue> for ExecutionResult {
    fn from(issue: ExecutionIssue) -> Self {
        ExecutionResult::failure(issue)
    }
}

/// Wrap a value as a success.
#[inline]
pub fn success(value: Value) -> ExecutionResult {
    ExecutionResult::Success(value)
}

/// Wrap one issue or an issue list as a failure.
#[inline]
pub fn failure(issues: impl Into<Issues>) -> ExecutionResult {
    ExecutionResult::failure(issues)
}

/// Check if a result is a success.
#[inline]
pub fn is_success(result: &ExecutionResult) -> bool {
    result.is_success()
}

/// Check if a result is a failure.
#[inline]
pub fn is_failure(result: &ExecutionResult) -> bool {
    result.is_failure()
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireRef<'a> {
    Success { value: &'a Value },
    Failure { issues: &'a Issues },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SuccessWire {
    value: Value,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FailureWire {
    issues: Issues,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Wire {
    Success(SuccessWire),
    Failure(FailureWire),
}

impl Serialize for ExecutionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExecutionResult::Success(value) => WireRef::Success { value },
            ExecutionResult::Failure(issues) => WireRef::Failure { issues },
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ExecutionResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Wire::deserialize(deserializer)? {
            Wire::Success(SuccessWire { value }) => ExecutionResult::Success(value),
            Wire::Failure(FailureWire { issues }) => ExecutionResult::Failure(issues),
        })
    }
}
