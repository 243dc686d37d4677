//! Text operations.

use crate::ast::builders::family::{Boolean, Integer, Number, Text};
use crate::ast::builders::typed::Typed;
use crate::ast::{BinaryOp, Expr, NaryOp, UnaryOp};

impl Typed<Text> {
    /// self || other
    pub fn append(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Concat, other.into())
    }

    pub fn upper(self) -> Self {
        self.unary(UnaryOp::Upper)
    }

    pub fn lower(self) -> Self {
        self.unary(UnaryOp::Lower)
    }

    pub fn trim(self) -> Self {
        self.unary(UnaryOp::Trim)
    }

    pub fn left_trim(self) -> Self {
        self.unary(UnaryOp::LeftTrim)
    }

    pub fn right_trim(self) -> Self {
        self.unary(UnaryOp::RightTrim)
    }

    /// Length in characters.
    pub fn length(self) -> Typed<Integer> {
        self.unary(UnaryOp::Length)
    }

    /// `length` characters starting at the 1-based position `start`.
    pub fn substring(
        self,
        start: impl Into<Typed<Integer>>,
        length: impl Into<Typed<Integer>>,
    ) -> Self {
        Typed::wrap(Expr::make_nary(
            NaryOp::Substring,
            vec![self.into_expr(), start.into().into_expr(), length.into().into_expr()],
        ))
    }

    /// 1-based position of the first occurrence of `needle`, 0 when absent.
    pub fn position_of(self, needle: impl Into<Self>) -> Typed<Integer> {
        self.binary(BinaryOp::Position, needle.into())
    }

    /// The first `n` characters.
    pub fn left(self, n: impl Into<Typed<Integer>>) -> Self {
        self.substring(1, n)
    }

    /// The last `n` characters.
    pub fn right(self, n: impl Into<Typed<Integer>>) -> Self {
        let n = n.into();
        let start = self.clone().length().minus(n.clone()).plus(1);
        n.clone()
            .is_greater_than_or_equal(self.clone().length())
            .if_then_else(self.clone(), self.substring(start, n))
    }

    /// Text before the first `separator`; empty when the separator is absent.
    pub fn substring_before(self, separator: impl Into<Self>) -> Self {
        let at = self.clone().position_of(separator);
        let before = self.substring(1, at.clone().minus(1));
        found_or_empty(at, before)
    }

    /// Text after the first `separator`; empty when the separator is absent.
    pub fn substring_after(self, separator: impl Into<Self>) -> Self {
        let separator = separator.into();
        let at = self.clone().position_of(separator.clone());
        let start = at.clone().plus(separator.length());
        let after = self.clone().substring(start, self.length());
        found_or_empty(at, after)
    }

    /// self LIKE pattern
    pub fn is_like(self, pattern: impl Into<Self>) -> Typed<Boolean> {
        self.binary(BinaryOp::Like, pattern.into())
    }

    /// Case-insensitive LIKE
    pub fn is_like_ignore_case(self, pattern: impl Into<Self>) -> Typed<Boolean> {
        self.binary(BinaryOp::ILike, pattern.into())
    }

    pub fn starts_with(self, prefix: impl Into<Self>) -> Typed<Boolean> {
        self.position_of(prefix).is(1)
    }

    pub fn ends_with(self, suffix: impl Into<Self>) -> Typed<Boolean> {
        let suffix = suffix.into();
        let fits = suffix
            .clone()
            .length()
            .is_less_than_or_equal(self.clone().length());
        let start = self
            .clone()
            .length()
            .minus(suffix.clone().length())
            .plus(1);
        let tail = self.substring(start, suffix.clone().length());
        fits.and(tail.is(suffix))
    }

    pub fn contains(self, needle: impl Into<Self>) -> Typed<Boolean> {
        self.position_of(needle).is_greater_than(0)
    }

    /// Replace every occurrence of `from` with `to`.
    pub fn replace(self, from: impl Into<Self>, to: impl Into<Self>) -> Self {
        Typed::wrap(Expr::make_nary(
            NaryOp::Replace,
            vec![self.into_expr(), from.into().into_expr(), to.into().into_expr()],
        ))
    }

    pub fn to_integer(self) -> Typed<Integer> {
        self.unary(UnaryOp::ToInteger)
    }

    pub fn to_number(self) -> Typed<Number> {
        self.unary(UnaryOp::ToNumber)
    }
}

/// CASE WHEN at > 0 THEN found WHEN at = 0 THEN '' END, NULL stays NULL.
fn found_or_empty(at: Typed<Integer>, found: Typed<Text>) -> Typed<Text> {
    Typed::wrap(Expr::make_case(
        vec![
            (at.clone().is_greater_than(0).into_expr(), found.into_expr()),
            (at.is(0).into_expr(), Expr::text("")),
        ],
        None,
    ))
}

#[cfg(test)]
mod tests {
    use crate::ast::builders::StringExpr;
    use crate::transpiler::{Dialect, ToSql};
    use pretty_assertions::assert_eq;

    fn name() -> StringExpr {
        StringExpr::column("name")
    }

    #[test]
    fn test_concat_styles() {
        let full = name().append(" ").append(StringExpr::column("surname"));
        assert_eq!(full.to_sql(), "name || ' ' || surname");
        assert_eq!(
            full.to_sql_with_dialect(Dialect::MySQL),
            "CONCAT(`name`, ' ', `surname`)"
        );
        assert_eq!(
            full.to_sql_with_dialect(Dialect::SqlServer),
            "[name] + ' ' + [surname]"
        );
    }

    #[test]
    fn test_like_ignore_case() {
        let pattern = name().is_like_ignore_case("a%");
        assert_eq!(pattern.to_sql(), "name ILIKE 'a%'");
        assert_eq!(
            pattern.to_sql_with_dialect(Dialect::MySQL),
            "LOWER(`name`) LIKE LOWER('a%')"
        );
    }

    #[test]
    fn test_substring_dialects() {
        let s = name().substring(2, 3);
        assert_eq!(s.to_sql_with_dialect(Dialect::Ansi), "SUBSTRING(name FROM 2 FOR 3)");
        assert_eq!(s.to_sql_with_dialect(Dialect::SQLite), "SUBSTR(\"name\", 2, 3)");
    }

    #[test]
    fn test_contains_uses_position() {
        assert_eq!(name().contains("x").to_sql(), "STRPOS(name, 'x') > 0");
        assert_eq!(
            name().contains("x").to_sql_with_dialect(Dialect::SqlServer),
            "CHARINDEX('x', [name]) > 0"
        );
    }

    #[test]
    fn test_quote_escaping() {
        assert_eq!(name().is("O'Brien").to_sql(), "name = 'O''Brien'");
    }
}
