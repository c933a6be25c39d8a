//! Testing utilities
//!
//! Assertion macros for [`ExecutionResult`](crate::ExecutionResult). Each
//! macro takes a ready result; await pending outcomes first.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use valchecker::prelude::*;
//! use valchecker::{assert_failure, assert_issue_codes, assert_success};
//!
//! let schema = string().min(2);
//!
//! assert_success!(schema.execute(json!("ok")).into_ready().unwrap());
//! assert_failure!(schema.execute(json!("x")).into_ready().unwrap());
//! assert_issue_codes!(schema.execute(json!(1)).into_ready().unwrap(), ["string:expected_string"]);
//! ```

/// Assert that a result is a success, optionally with a specific value.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use valchecker::{assert_success, ExecutionResult};
///
/// assert_success!(ExecutionResult::success(json!(1)));
/// assert_success!(ExecutionResult::success(json!(1)), json!(1));
/// ```
#[macro_export]
macro_rules! assert_success {
    ($result:expr) => {
        match $result {
            $crate::ExecutionResult::Success(_) => {}
            $crate::ExecutionResult::Failure(issues) => {
                panic!("Expected Success, got Failure: {:?}", issues);
            }
        }
    };
    ($result:expr, $expected:expr) => {
        match $result {
            $crate::ExecutionResult::Success(value) => assert_eq!(value, $expected),
            $crate::ExecutionResult::Failure(issues) => {
                panic!("Expected Success, got Failure: {:?}", issues);
            }
        }
    };
}

/// Assert that a result is a failure.
///
/// # Example
///
/// ```rust
/// use valchecker::issue::{create_issue, IssueSpec};
/// use valchecker::{assert_failure, ExecutionResult};
///
/// assert_failure!(ExecutionResult::failure(create_issue(IssueSpec::new("a:b", "A"))));
/// ```
#[macro_export]
macro_rules! assert_failure {
    ($result:expr) => {
        match $result {
            $crate::ExecutionResult::Failure(_) => {}
            $crate::ExecutionResult::Success(value) => {
                panic!("Expected Failure, got Success: {:?}", value);
            }
        }
    };
}

/// Assert that a result is a failure with exactly these issue codes, in order.
///
/// # Example
///
/// ```rust
/// use valchecker::issue::{create_issue, IssueSpec};
/// use valchecker::{assert_issue_codes, ExecutionResult};
///
/// let issue = create_issue(IssueSpec::new("min:expected_min", "Too small."));
/// let result = ExecutionResult::failure(issue);
/// assert_issue_codes!(result, ["min:expected_min"]);
/// ```
#[macro_export]
macro_rules! assert_issue_codes {
    ($result:expr, [$($code:expr),* $(,)?]) => {
        match $result {
            $crate::ExecutionResult::Failure(issues) => {
                let expected: ::std::vec::Vec<&str> = ::std::vec![$($code),*];
                assert_eq!(issues.codes(), expected);
            }
            $crate::ExecutionResult::Success(value) => {
                panic!("Expected Failure with issue codes, got Success: {:?}", value);
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::issue::{create_issue, IssueSpec};
    use crate::ExecutionResult;
    use serde_json::json;

    fn failed() -> ExecutionResult {
        ExecutionResult::failure(create_issue(IssueSpec::new("number:expected_number", "N")))
    }

    #[test]
    fn assert_success_macro() {
        assert_success!(ExecutionResult::success(json!(1)));
        assert_success!(ExecutionResult::success(json!("a")), json!("a"));
    }

    #[test]
    fn assert_failure_macro() {
        assert_failure!(failed());
    }

    #[test]
    fn assert_issue_codes_macro() {
        assert_issue_codes!(failed(), ["number:expected_number"]);
    }

    #[test]
    #[should_panic(expected = "Expected Success, got Failure")]
    fn assert_success_panics_on_failure() {
        assert_success!(failed());
    }

    #[test]
    #[should_panic(expected = "Expected Failure, got Success")]
    fn assert_failure_panics_on_success() {
        assert_failure!(ExecutionResult::success(json!(null)));
    }

    #[test]
    #[should_panic(expected = "Expected Failure with issue codes")]
    fn assert_issue_codes_panics_on_success() {
        assert_issue_codes!(ExecutionResult::success(json!(0)), ["x:y"]);
    }
}
