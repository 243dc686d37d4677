//! Arithmetic on Integer and Number expressions.

use crate::ast::builders::family::{Integer, Number, Numeric};
use crate::ast::builders::typed::Typed;
use crate::ast::{AggregateFunc, BinaryOp, UnaryOp, ValueKind};

impl Typed<Integer> {
    pub fn plus(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Add, other.into())
    }

    pub fn minus(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Sub, other.into())
    }
}

impl Typed<Number> {
    pub fn plus(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Add, other.into())
    }

    pub fn minus(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Sub, other.into())
    }
}

impl<K: Numeric> Typed<K> {
    pub fn times(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Mul, other.into())
    }

    /// Exact division. Two integer operands are widened first so the
    /// quotient keeps its fraction.
    pub fn divided_by(self, other: impl Into<Self>) -> Typed<Number> {
        let other = other.into();
        let both_integer =
            self.expr().kind() == ValueKind::Integer && other.expr().kind() == ValueKind::Integer;
        if both_integer {
            self.to_number().binary(BinaryOp::Div, other)
        } else {
            self.binary(BinaryOp::Div, other)
        }
    }

    /// Quotient truncated toward zero.
    pub fn integer_divided_by(self, other: impl Into<Self>) -> Typed<Integer> {
        self.binary(BinaryOp::IntDiv, other.into())
    }

    /// Remainder with the sign of the dividend.
    pub fn modulus(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Rem, other.into())
    }

    pub fn negate(self) -> Self {
        self.unary(UnaryOp::Negate)
    }

    pub fn abs(self) -> Self {
        self.unary(UnaryOp::Abs)
    }

    /// -1, 0 or 1.
    pub fn sign(self) -> Typed<Integer> {
        self.unary(UnaryOp::Sign)
    }

    pub fn sqrt(self) -> Typed<Number> {
        self.unary(UnaryOp::Sqrt)
    }

    pub fn power(self, exponent: impl Into<Typed<Number>>) -> Typed<Number> {
        self.binary(BinaryOp::Power, exponent.into())
    }

    pub fn floor(self) -> Self {
        self.unary(UnaryOp::Floor)
    }

    pub fn ceil(self) -> Self {
        self.unary(UnaryOp::Ceil)
    }

    pub fn round(self) -> Self {
        self.unary(UnaryOp::Round)
    }

    pub fn to_number(self) -> Typed<Number> {
        self.unary(UnaryOp::ToNumber)
    }

    pub fn to_integer(self) -> Typed<Integer> {
        self.unary(UnaryOp::ToInteger)
    }

    /// SUM(self)
    pub fn sum(self) -> Self {
        self.unary(UnaryOp::Aggregate(AggregateFunc::Sum))
    }

    /// AVG(self)
    pub fn average(self) -> Typed<Number> {
        self.unary(UnaryOp::Aggregate(AggregateFunc::Avg))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::builders::{IntegerExpr, NumberExpr};
    use crate::transpiler::{Dialect, ToSql};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arithmetic_rendering() {
        let qty = IntegerExpr::column("qty");
        let sql = qty.clone().plus(1).times(qty).to_sql();
        assert_eq!(sql, "(qty + 1) * qty");
    }

    #[test]
    fn test_integer_division_widens() {
        let sql = IntegerExpr::column("a").divided_by(2).to_sql();
        assert_eq!(sql, "CAST(a AS NUMERIC) / 2");
        let sql = NumberExpr::column("price").divided_by(2.5).to_sql();
        assert_eq!(sql, "price / 2.5");
    }

    #[test]
    fn test_sign_native_and_emulated() {
        let x = NumberExpr::column("x");
        assert_eq!(x.clone().sign().to_sql(), "SIGN(x)");
        assert_eq!(
            x.sign().to_sql_with_dialect(Dialect::Ansi),
            "CASE WHEN x > 0 THEN 1 WHEN x < 0 THEN -1 WHEN x = 0 THEN 0 END"
        );
    }

    #[test]
    fn test_aggregates_are_flagged() {
        let total = NumberExpr::column("amount").sum();
        assert!(total.is_aggregator());
        assert_eq!(total.to_sql(), "SUM(amount)");
        assert!(NumberExpr::column("amount").average().is_aggregator());
    }
}
