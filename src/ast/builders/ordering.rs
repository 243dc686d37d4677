//! Comparisons and range tests for ordered families.

use crate::ast::builders::family::{Boolean, Ordered};
use crate::ast::builders::typed::Typed;
use crate::ast::{AggregateFunc, BinaryOp, Expr, NaryOp, UnaryOp};

impl<K: Ordered> Typed<K> {
    fn compare(self, op: BinaryOp, other: impl Into<Self>) -> Typed<Boolean> {
        self.binary(op, other.into())
    }

    pub fn is_less_than(self, other: impl Into<Self>) -> Typed<Boolean> {
        self.compare(BinaryOp::Lt, other)
    }

    pub fn is_less_than_or_equal(self, other: impl Into<Self>) -> Typed<Boolean> {
        self.compare(BinaryOp::Lte, other)
    }

    pub fn is_greater_than(self, other: impl Into<Self>) -> Typed<Boolean> {
        self.compare(BinaryOp::Gt, other)
    }

    pub fn is_greater_than_or_equal(self, other: impl Into<Self>) -> Typed<Boolean> {
        self.compare(BinaryOp::Gte, other)
    }

    /// Half-open range: `self >= lower AND self < upper`.
    pub fn between(self, lower: impl Into<Self>, upper: impl Into<Self>) -> Typed<Boolean> {
        self.clone()
            .is_greater_than_or_equal(lower)
            .and(self.is_less_than(upper))
    }

    /// `self >= lower AND self <= upper`
    pub fn between_inclusive(
        self,
        lower: impl Into<Self>,
        upper: impl Into<Self>,
    ) -> Typed<Boolean> {
        self.clone()
            .is_greater_than_or_equal(lower)
            .and(self.is_less_than_or_equal(upper))
    }

    /// `self > lower AND self < upper`
    pub fn between_exclusive(
        self,
        lower: impl Into<Self>,
        upper: impl Into<Self>,
    ) -> Typed<Boolean> {
        self.clone()
            .is_greater_than(lower)
            .and(self.is_less_than(upper))
    }

    /// `self < value OR (self = value AND tie_breaker)`, for keyset pagination
    /// over several columns.
    pub fn is_less_than_or(
        self,
        value: impl Into<Self>,
        tie_breaker: Typed<Boolean>,
    ) -> Typed<Boolean> {
        let value = value.into();
        self.clone()
            .is_less_than(value.clone())
            .or(self.is(value).and(tie_breaker))
    }

    /// `self > value OR (self = value AND tie_breaker)`
    pub fn is_greater_than_or(
        self,
        value: impl Into<Self>,
        tie_breaker: Typed<Boolean>,
    ) -> Typed<Boolean> {
        let value = value.into();
        self.clone()
            .is_greater_than(value.clone())
            .or(self.is(value).and(tie_breaker))
    }

    /// MAX(self)
    pub fn max(self) -> Self {
        self.unary(UnaryOp::Aggregate(AggregateFunc::Max))
    }

    /// MIN(self)
    pub fn min(self) -> Self {
        self.unary(UnaryOp::Aggregate(AggregateFunc::Min))
    }
}

fn extreme<K, I, T>(op: NaryOp, values: I) -> Typed<K>
where
    K: Ordered,
    I: IntoIterator<Item = T>,
    T: Into<Typed<K>>,
{
    let mut args: Vec<Expr> = values.into_iter().map(|v| v.into().into_expr()).collect();
    match args.len() {
        0 => Typed::null(),
        1 => Typed::wrap(args.remove(0)),
        _ => Typed::wrap(Expr::make_nary(op, args)),
    }
}

/// Smallest of the values; NULL if any value is NULL.
pub fn least_of<K, I, T>(values: I) -> Typed<K>
where
    K: Ordered,
    I: IntoIterator<Item = T>,
    T: Into<Typed<K>>,
{
    extreme(NaryOp::Least, values)
}

/// Largest of the values; NULL if any value is NULL.
pub fn greatest_of<K, I, T>(values: I) -> Typed<K>
where
    K: Ordered,
    I: IntoIterator<Item = T>,
    T: Into<Typed<K>>,
{
    extreme(NaryOp::Greatest, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{IntegerExpr, StringExpr};
    use crate::transpiler::ToSql;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_between_is_half_open() {
        let sql = IntegerExpr::column("age").between(18, 65).to_sql();
        assert_eq!(sql, "age >= 18 AND age < 65");
    }

    #[test]
    fn test_between_variants() {
        let x = IntegerExpr::column("x");
        assert_eq!(
            x.clone().between_inclusive(1, 9).to_sql(),
            "x >= 1 AND x <= 9"
        );
        assert_eq!(x.between_exclusive(1, 9).to_sql(), "x > 1 AND x < 9");
    }

    #[test]
    fn test_pagination_comparison() {
        let name = StringExpr::column("name");
        let id = IntegerExpr::column("id");
        let sql = name.is_less_than_or("bob", id.is_less_than(42)).to_sql();
        assert_eq!(sql, "name < 'bob' OR name = 'bob' AND id < 42");
    }

    #[test]
    fn test_single_value_extreme_is_the_value() {
        let only: IntegerExpr = least_of([7]);
        assert_eq!(only.to_sql(), "7");
    }
}
