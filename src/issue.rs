//! Validation issues
//!
//! An [`ExecutionIssue`] describes one validation failure: a namespaced code
//! (`"<step>:<reason>"`), step-specific diagnostic payload, a resolved
//! human-readable message and the path to the offending value.
//!
//! Leaf steps create issues with an empty path. Structural composers prepend
//! their own key or index on the way out, so a final path reads
//! outermost-first.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use valchecker::issue::{create_issue, prepend_issue_path, IssueSpec, PathSegment};
//!
//! let issue = create_issue(
//!     IssueSpec::new("string:expected_string", "Expected a string.")
//!         .payload_entry("value", json!(42)),
//! );
//! assert!(issue.path.is_empty());
//!
//! let nested = prepend_issue_path(
//!     &issue,
//!     &[PathSegment::from("tags"), PathSegment::from(2usize)],
//! );
//! assert_eq!(nested.path, vec![PathSegment::from("tags"), PathSegment::from(2usize)]);
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::semigroup::Semigroup;

/// Diagnostic data attached to an issue.
pub type Payload = Map<String, Value>;

/// User-supplied message resolver.
///
/// Receives the issue as built with its default message and returns the
/// message to report instead.
pub type MessageHandler = Arc<dyn Fn(&ExecutionIssue) -> String + Send + Sync>;

/// Build a [`MessageHandler`] from a closure.
///
/// ```
/// use valchecker::issue::message;
///
/// let handler = message(|issue| format!("bad value ({})", issue.code));
/// ```
pub fn message<F>(f: F) -> MessageHandler
where
    F: Fn(&ExecutionIssue) -> String + Send + Sync + 'static,
{
    Arc::new(f)
}

/// One segment of an issue path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array index
    Index(usize),
    /// Object property name
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(index) => write!(f, "[{}]", index),
            PathSegment::Key(key) => write!(f, ".{}", key),
        }
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

/// A structured description of one validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionIssue {
    /// Namespaced code, `"<step>:<reason>"`
    pub code: String,
    /// Step-specific diagnostic data
    pub payload: Payload,
    /// Resolved message
    pub message: String,
    /// Location of the failing value, outermost segment first
    pub path: Vec<PathSegment>,
}

impl ExecutionIssue {
    /// Prepend path segments, consuming the issue.
    pub fn with_path_prefix(mut self, segments: &[PathSegment]) -> Self {
        if !segments.is_empty() {
            let mut path = Vec::with_capacity(segments.len() + self.path.len());
            path.extend_from_slice(segments);
            path.append(&mut self.path);
            self.path = path;
        }
        self
    }

    /// Render the path as `.key[0].nested`; empty for the root.
    pub fn path_string(&self) -> String {
        self.path.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ExecutionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{} ({})", self.message, self.code)
        } else {
            write!(f, "{}: {} ({})", self.path_string(), self.message, self.code)
        }
    }
}

/// Everything needed to build an issue.
///
/// ```
/// use serde_json::json;
/// use valchecker::issue::{create_issue, message, IssueSpec};
///
/// let handler = message(|issue| format!("got {}", issue.payload["value"]));
/// let issue = create_issue(
///     IssueSpec::new("number:expected_number", "Expected a number.")
///         .payload_entry("value", json!("x"))
///         .custom_message(Some(&handler)),
/// );
/// assert_eq!(issue.message, "got \"x\"");
/// ```
#[derive(Clone)]
pub struct IssueSpec {
    code: String,
    payload: Payload,
    custom_message: Option<MessageHandler>,
    default_message: String,
}

impl fmt::Debug for IssueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssueSpec")
            .field("code", &self.code)
            .field("payload", &self.payload)
            .field("custom_message", &self.custom_message.as_ref().map(|_| "<function>"))
            .field("default_message", &self.default_message)
            .finish()
    }
}

impl IssueSpec {
    /// Start a spec with a code and the message used when no handler is set.
    pub fn new(code: impl Into<String>, default_message: impl Into<String>) -> Self {
        IssueSpec {
            code: code.into(),
            payload: Payload::new(),
            custom_message: None,
            default_message: default_message.into(),
        }
    }

    /// Replace the whole payload.
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Add one payload entry.
    pub fn payload_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    /// Use a custom message handler when present.
    pub fn custom_message(mut self, handler: Option<&MessageHandler>) -> Self {
        self.custom_message = handler.cloned();
        self
    }
}

/// Build an issue with an empty path.
///
/// The message comes from the custom handler if one was supplied, otherwise
/// from the default message.
pub fn create_issue(spec: IssueSpec) -> ExecutionIssue {
    let mut issue = ExecutionIssue {
        code: spec.code,
        payload: spec.payload,
        message: String::new(),
        path: Vec::new(),
    };
    issue.message = resolve_message(&issue, spec.custom_message.as_ref(), &spec.default_message);
    issue
}

/// Resolve the message for an issue.
///
/// A handler that panics falls back to `default_message`.
pub fn resolve_message(
    issue: &ExecutionIssue,
    custom: Option<&MessageHandler>,
    default_message: &str,
) -> String {
    match custom {
        Some(handler) => match crate::guard::catch_sync(|| handler(issue)) {
            Ok(message) => message,
            Err(_error) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(code = %issue.code, error = %_error, "message handler failed");

                default_message.to_string()
            }
        },
        None => default_message.to_string(),
    }
}

/// Return a copy of `issue` with `segments` prepended to its path.
pub fn prepend_issue_path(issue: &ExecutionIssue, segments: &[PathSegment]) -> ExecutionIssue {
    issue.clone().with_path_prefix(segments)
}

/// A non-empty, ordered list of issues.
///
/// Every failure carries at least one issue, so the list is stored as a head
/// plus a tail and can only be built from at least one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Issues {
    head: ExecutionIssue,
    tail: Vec<ExecutionIssue>,
}

impl Issues {
    /// Build from a first issue and any further ones.
    pub fn new(head: ExecutionIssue, tail: Vec<ExecutionIssue>) -> Self {
        Issues { head, tail }
    }

    /// A list holding exactly one issue.
    pub fn singleton(issue: ExecutionIssue) -> Self {
        Issues::new(issue, Vec::new())
    }

    /// Returns `None` if `issues` is empty.
    pub fn from_vec(mut issues: Vec<ExecutionIssue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            let head = issues.remove(0);
            Some(Issues::new(head, issues))
        }
    }

    /// The first issue.
    pub fn first(&self) -> &ExecutionIssue {
        &self.head
    }

    /// Number of issues, always at least one.
    pub fn len(&self) -> usize {
        1 + self.tail.len()
    }

    /// Always `false`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Append an issue.
    pub fn push(&mut self, issue: ExecutionIssue) {
        self.tail.push(issue);
    }

    /// Iterate in order.
    pub fn iter(&self) -> impl Iterator<Item = &ExecutionIssue> {
        std::iter::once(&self.head).chain(self.tail.iter())
    }

    /// The issue codes in order.
    pub fn codes(&self) -> Vec<&str> {
        self.iter().map(|issue| issue.code.as_str()).collect()
    }

    /// Prepend `segments` to every issue's path.
    pub fn with_path_prefix(self, segments: &[PathSegment]) -> Self {
        Issues {
            head: self.head.with_path_prefix(segments),
            tail: self
                .tail
                .into_iter()
                .map(|issue| issue.with_path_prefix(segments))
                .collect(),
        }
    }

    /// Convert into a plain vector.
    pub fn into_vec(self) -> Vec<ExecutionIssue> {
        let mut issues = Vec::with_capacity(self.len());
        issues.push(self.head);
        issues.extend(self.tail);
        issues
    }
}

impl Semigroup for Issues {
    fn combine(mut self, other: Self) -> Self {
        self.tail.push(other.head);
        self.tail.extend(other.tail);
        self
    }
}

impl IntoIterator for Issues {
    type Item = ExecutionIssue;
    type IntoIter = std::vec::IntoIter<ExecutionIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl From<ExecutionIssue> for Issues {
    fn from(issue: ExecutionIssue) -> Self {
        Issues::singleton(issue)
    }
}

impl Serialize for Issues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for Issues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let issues = Vec::<ExecutionIssue>::deserialize(deserializer)?;
        Issues::from_vec(issues)
            .ok_or_else(|| serde::de::Error::invalid_length(0, &"at least one issue"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue(code: &str) -> ExecutionIssue {
        create_issue(IssueSpec::new(code, "default"))
    }

    #[test]
    fn test_create_issue_uses_default_message() {
        let issue = create_issue(
            IssueSpec::new("string:expected_string", "Expected a string.")
                .payload_entry("value", json!(1)),
        );
        assert_eq!(issue.code, "string:expected_string");
        assert_eq!(issue.message, "Expected a string.");
        assert_eq!(issue.payload["value"], json!(1));
        assert!(issue.path.is_empty());
    }

    #[test]
    fn test_create_issue_prefers_custom_message() {
        let handler = message(|issue| format!("custom for {}", issue.code));
        let issue = create_issue(IssueSpec::new("a:b", "default").custom_message(Some(&handler)));
        assert_eq!(issue.message, "custom for a:b");
    }

    #[test]
    fn test_panicking_message_handler_falls_back_to_default() {
        let handler = message(|_| panic!("handler exploded"));
        let issue = create_issue(
            IssueSpec::new("a:b", "default")
                .payload_entry("value", json!(1))
                .custom_message(Some(&handler)),
        );
        assert_eq!(issue.code, "a:b");
        assert_eq!(issue.message, "default");
        assert_eq!(issue.payload["value"], json!(1));
    }

    #[test]
    fn test_prepend_issue_path_does_not_mutate() {
        let inner = issue("x:y").with_path_prefix(&[PathSegment::from("name")]);
        let outer = prepend_issue_path(
            &inner,
            &[PathSegment::from("users"), PathSegment::from(3usize)],
        );

        assert_eq!(inner.path, vec![PathSegment::from("name")]);
        assert_eq!(
            outer.path,
            vec![
                PathSegment::from("users"),
                PathSegment::from(3usize),
                PathSegment::from("name")
            ]
        );
        assert_eq!(outer.path_string(), ".users[3].name");
    }

    #[test]
    fn test_issues_never_empty() {
        assert!(Issues::from_vec(Vec::new()).is_none());
        let issues = Issues::from_vec(vec![issue("a:1"), issue("b:2")]).unwrap();
        assert_eq!(issues.len(), 2);
        assert!(!issues.is_empty());
        assert_eq!(issues.first().code, "a:1");
    }

    #[test]
    fn test_issues_combine_preserves_order() {
        let left = Issues::new(issue("a:1"), vec![issue("a:2")]);
        let right = Issues::singleton(issue("b:1"));
        assert_eq!(left.combine(right).codes(), vec!["a:1", "a:2", "b:1"]);
    }

    #[test]
    fn test_issue_wire_shape() {
        let issue = issue("min:expected_min").with_path_prefix(&[
            PathSegment::from("items"),
            PathSegment::from(0usize),
        ]);
        let wire = serde_json::to_value(&issue).unwrap();
        assert_eq!(
            wire,
            json!({
                "code": "min:expected_min",
                "payload": {},
                "message": "default",
                "path": ["items", 0]
            })
        );

        let back: ExecutionIssue = serde_json::from_value(wire).unwrap();
        assert_eq!(back, issue);
    }

    #[test]
    fn test_empty_issue_list_rejected_on_deserialize() {
        let result: Result<Issues, _> = serde_json::from_value(json!([]));
        assert!(result.is_err());
    }

    #[test]
    fn test_display_includes_path() {
        let issue = issue("x:y").with_path_prefix(&[PathSegment::from("a")]);
        assert_eq!(issue.to_string(), ".a: default (x:y)");
    }
}
