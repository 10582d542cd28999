//! Error types for transform compilation and style mutation

use thiserror::Error;

/// Errors raised while compiling a style's transform list
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// `transform` and `transformMatrix` on the same style
    #[error("transformMatrix and transform styles cannot be used on the same style")]
    Conflict,

    /// An operation's value has the wrong type or shape (strict mode only)
    #[error("transform with key of \"{key}\" must be {expected}, got {value}: {operation}")]
    Validation {
        /// Operation name, e.g. `rotate`
        key: String,
        /// Offending value, serialized
        value: String,
        /// What the value should have been
        expected: &'static str,
        /// Whole operation, serialized
        operation: String,
    },

    /// Operation name outside the supported set
    #[error("invalid transform name: {0}")]
    InvalidTransformName(String),

    /// Operation is not a non-empty object
    #[error("transform operation must be an object naming one operation: {0}")]
    InvalidOperation(String),

    /// The `transform` property is not a list
    #[error("transform must be an array of operations: {0}")]
    InvalidTransformList(String),
}

/// Errors raised when mutating a [`Style`](crate::style::Style)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StyleError {
    /// Mutation attempted on a frozen style
    #[error("cannot modify property '{key}' of a frozen style")]
    Frozen { key: String },
}
