//! Error types
//!
//! Validation outcomes are never errors: they are [`ExecutionResult`]s. The
//! types here cover the two places where something other than a validation
//! outcome can go wrong: user callbacks that return an error, and schema
//! construction through the [`PluginRegistry`].
//!
//! [`ExecutionResult`]: crate::ExecutionResult
//! [`PluginRegistry`]: crate::registry::PluginRegistry

use std::error::Error as StdError;
use std::fmt;

/// Error returned by user callbacks such as transforms.
///
/// Anything convertible into a boxed error works: `String`, `&str`, or any
/// `std::error::Error + Send + Sync` type.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Error raised while building a schema from named operations.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use valchecker::registry::PluginRegistry;
/// use valchecker::RegistryError;
///
/// let registry = PluginRegistry::with_defaults();
/// let err = registry.resolve("shout", &json!(null)).err().unwrap();
/// assert_eq!(err, RegistryError::UnknownOperation("shout".to_string()));
/// assert_eq!(err.to_string(), "unknown operation: shout");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No contributor is registered under this name
    UnknownOperation(String),
    /// The contributor rejected its parameters
    InvalidParams {
        /// Operation name
        operation: String,
        /// Why the parameters were rejected
        reason: String,
    },
    /// An operation list was not shaped as expected
    InvalidDefinition(String),
}

impl RegistryError {
    /// Shorthand for [`RegistryError::InvalidParams`].
    pub fn invalid_params(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        RegistryError::InvalidParams {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownOperation(name) => write!(f, "unknown operation: {}", name),
            RegistryError::InvalidParams { operation, reason } => {
                write!(f, "invalid parameters for {}: {}", operation, reason)
            }
            RegistryError::InvalidDefinition(reason) => {
                write!(f, "invalid schema definition: {}", reason)
            }
        }
    }
}

impl StdError for RegistryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_params() {
        let err = RegistryError::invalid_params("min", "expected a number");
        assert_eq!(err.to_string(), "invalid parameters for min: expected a number");
    }

    #[test]
    fn test_box_error_from_string() {
        let err: BoxError = "boom".into();
        assert_eq!(err.to_string(), "boom");
    }
}
