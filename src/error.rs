//! Error types for qail-expr.

use thiserror::Error;

use crate::ast::ValueKind;

#[derive(Debug, Error)]
pub enum ExprError {
    /// An operand belongs to the wrong value family.
    #[error("Incompatible operand for {operation}: expected {expected}, found {found}")]
    IncompatibleKind {
        operation: String,
        expected: String,
        found: ValueKind,
    },

    /// LAG/LEAD built without an ORDER BY.
    #[error("Window function {function} requires an ORDER BY clause")]
    MissingOrdering { function: &'static str },

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to parse a DateRepeat token or WKT string.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExprError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create an incompatible-operand error.
    pub fn incompatible(
        operation: impl Into<String>,
        expected: impl Into<String>,
        found: ValueKind,
    ) -> Self {
        Self::IncompatibleKind {
            operation: operation.into(),
            expected: expected.into(),
            found,
        }
    }

    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation(message.into())
    }
}

/// Result type alias for expression operations.
pub type ExprResult<T> = Result<T, ExprError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExprError::parse(5, "unexpected character");
        assert_eq!(
            err.to_string(),
            "Parse error at position 5: unexpected character"
        );
    }

    #[test]
    fn test_incompatible_display() {
        let err = ExprError::incompatible("is_less_than", "ordered value", ValueKind::Point);
        assert_eq!(
            err.to_string(),
            "Incompatible operand for is_less_than: expected ordered value, found POINT"
        );
    }

    #[test]
    fn test_missing_ordering_display() {
        let err = ExprError::MissingOrdering { function: "LAG" };
        assert_eq!(
            err.to_string(),
            "Window function LAG requires an ORDER BY clause"
        );
    }
}
