//! Transpiler traits and utilities.

use crate::transpiler::functions::{Feature, Function, FunctionGroup, FunctionSyntax};

/// SQL reserved words that must be quoted when used as identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "order",
    "group",
    "user",
    "table",
    "select",
    "from",
    "where",
    "join",
    "left",
    "right",
    "inner",
    "outer",
    "on",
    "and",
    "or",
    "not",
    "null",
    "true",
    "false",
    "limit",
    "offset",
    "as",
    "in",
    "is",
    "like",
    "between",
    "having",
    "union",
    "all",
    "distinct",
    "case",
    "when",
    "then",
    "else",
    "end",
    "date",
    "time",
    "timestamp",
    "interval",
    "year",
    "month",
    "day",
    "hour",
    "minute",
    "second",
    "position",
    "default",
    "check",
];

/// Wrap an identifier in double quotes if it's a reserved word or contains
/// special chars. Handles dotted identifiers (e.g., `table.column`) by
/// quoting each part.
pub fn escape_identifier(name: &str) -> String {
    if name.contains('.') {
        return name
            .split('.')
            .map(escape_single_identifier)
            .collect::<Vec<_>>()
            .join(".");
    }
    escape_single_identifier(name)
}

/// Whether an identifier must be quoted: reserved words, special characters
/// or a leading digit.
pub fn needs_quoting(name: &str) -> bool {
    let lower = name.to_lowercase();
    RESERVED_WORDS.contains(&lower.as_str())
        || name.chars().any(|c| !c.is_alphanumeric() && c != '_')
        || name.chars().next().map(|c| c.is_numeric()).unwrap_or(true)
}

/// Escape a single identifier part (no dots).
fn escape_single_identifier(name: &str) -> String {
    if needs_quoting(name) {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

/// Trait for dialect-specific SQL generation.
///
/// The renderer only ever talks to a dialect through this trait.
/// `DialectDescriptor` is the data-driven implementation behind every preset;
/// adapters for other databases can implement it directly.
pub trait SqlGenerator: Send + Sync {
    /// Dialect name, for logs.
    fn name(&self) -> &str;
    /// Quote an identifier (table or column name).
    fn quote_identifier(&self, name: &str) -> String;
    /// Get the boolean literal (TRUE/FALSE vs 1/0).
    fn bool_literal(&self, val: bool) -> String;
    /// The NULL literal.
    fn null_literal(&self) -> String {
        "NULL".to_string()
    }
    /// Generate string concatenation expression (e.g. 'a' || 'b' vs CONCAT('a', 'b')).
    fn string_concat(&self, parts: &[&str]) -> String;
    /// Quote a string literal.
    fn string_literal(&self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }
    /// Whether the dialect has a capability.
    fn supports(&self, feature: Feature) -> bool;
    /// Syntax this dialect registers for a function, if any.
    fn function(&self, function: Function) -> Option<&FunctionSyntax>;
    /// Wrapper applied to the local current date-time when the dialect's
    /// clock reports UTC.
    fn timezone_adjustment(&self) -> Option<&FunctionSyntax> {
        None
    }

    /// Resolve the syntax used for `function`, or `None` when it must be
    /// emulated. Interval and geometry functions are only native when the
    /// matching feature is present.
    fn function_syntax(&self, function: Function) -> Option<FunctionSyntax> {
        let gated = match function.group() {
            FunctionGroup::Interval => !self.supports(Feature::IntervalType),
            FunctionGroup::Geometry => !self.supports(Feature::Geometry),
            FunctionGroup::Primitive | FunctionGroup::Emulatable => false,
        };
        if gated {
            return None;
        }
        self.function(function)
            .cloned()
            .or_else(|| function.default_syntax())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("age"), "age");
        assert_eq!(escape_identifier("order"), "\"order\"");
        assert_eq!(escape_identifier("first name"), "\"first name\"");
        assert_eq!(escape_identifier("users.user"), "users.\"user\"");
        assert_eq!(escape_identifier("2fa"), "\"2fa\"");
    }
}
