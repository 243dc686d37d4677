//! Null propagation.
//!
//! Nullability and static nullness are computed from the children on demand.
//! A composite is nullable when any operand is, unless the operator
//! neutralises NULL (IS NULL, IS NOT NULL, COUNT, a COALESCE with a non-null
//! argument). MAX/MIN/SUM/AVG are always nullable because the input row set
//! may be empty.

use crate::ast::expr::Expr;
use crate::ast::operators::{AggregateFunc, BinaryOp, NaryOp, UnaryOp};
use crate::ast::window::WindowFunction;

pub fn is_nullable(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(v) => v.is_null(),
        Expr::Column(c) => c.nullable,
        Expr::Current(_) => false,
        Expr::Unary { op, operand } => match op {
            UnaryOp::IsNull | UnaryOp::IsNotNull => false,
            UnaryOp::Aggregate(AggregateFunc::Count | AggregateFunc::CountDistinct) => false,
            UnaryOp::Aggregate(_) => true,
            _ => operand.is_nullable(),
        },
        Expr::Binary { left, right, .. } => left.is_nullable() || right.is_nullable(),
        Expr::Nary { op, args } => match op {
            NaryOp::Coalesce => args.iter().all(Expr::is_nullable),
            _ => args.iter().any(Expr::is_nullable),
        },
        Expr::Case {
            branches,
            otherwise,
        } => match otherwise {
            None => true,
            Some(o) => o.is_nullable() || branches.iter().any(|(_, v)| v.is_nullable()),
        },
        Expr::Window(w) => match &w.function {
            WindowFunction::RowNumber | WindowFunction::Rank | WindowFunction::DenseRank => false,
            WindowFunction::Aggregate(e)
            | WindowFunction::FirstValue(e)
            | WindowFunction::LastValue(e) => e.is_nullable(),
            WindowFunction::Lag { value, default, .. }
            | WindowFunction::Lead { value, default, .. } => {
                value.is_nullable() || default.is_nullable()
            }
            // The frame may hold fewer than n rows.
            WindowFunction::NthValue { .. } => true,
        },
    }
}

/// Statically known to evaluate to NULL for every row.
pub fn is_always_null(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(v) => v.is_null(),
        Expr::Column(_) | Expr::Current(_) | Expr::Window(_) => false,
        Expr::Unary { op, operand } => match op {
            UnaryOp::IsNull | UnaryOp::IsNotNull => false,
            UnaryOp::Aggregate(AggregateFunc::Count | AggregateFunc::CountDistinct) => false,
            _ => operand.is_always_null(),
        },
        Expr::Binary { op, left, right } => match op {
            // NULL AND FALSE is FALSE, NULL OR TRUE is TRUE
            BinaryOp::And | BinaryOp::Or => left.is_always_null() && right.is_always_null(),
            _ => left.is_always_null() || right.is_always_null(),
        },
        Expr::Nary { op, args } => match op {
            NaryOp::Coalesce | NaryOp::AllOf | NaryOp::AnyOf => {
                !args.is_empty() && args.iter().all(Expr::is_always_null)
            }
            NaryOp::In | NaryOp::NotIn => args.first().is_some_and(Expr::is_always_null),
            NaryOp::Greatest | NaryOp::Least | NaryOp::Substring | NaryOp::Replace => {
                args.iter().any(Expr::is_always_null)
            }
        },
        Expr::Case {
            branches,
            otherwise,
        } => {
            branches.iter().all(|(_, v)| v.is_always_null())
                && otherwise.as_ref().is_none_or(|o| o.is_always_null())
        }
    }
}

/// Equality or inequality that never compares against a static NULL.
///
/// `x = NULL` becomes `x IS NULL`, `x <> NULL` becomes `x IS NOT NULL`, and
/// when both sides are statically NULL the test is applied to the NULL literal.
pub fn null_safe_compare(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let test = match op {
        BinaryOp::Ne => UnaryOp::IsNotNull,
        _ => UnaryOp::IsNull,
    };
    match (left.is_always_null(), right.is_always_null()) {
        (true, true) => Expr::make_unary(test, Expr::null()),
        (true, false) => Expr::make_unary(test, right),
        (false, true) => Expr::make_unary(test, left),
        (false, false) => Expr::make_binary(op, left, right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::values::ValueKind;
    use crate::ast::Column;

    fn nullable_col() -> Expr {
        Expr::column("a", ValueKind::Integer)
    }

    fn required_col() -> Expr {
        Expr::Column(Column::new("b", ValueKind::Integer).not_null())
    }

    #[test]
    fn test_nullability_propagates() {
        let sum = Expr::make_binary(BinaryOp::Add, required_col(), Expr::int(1));
        assert!(!is_nullable(&sum));
        let sum = Expr::make_binary(BinaryOp::Add, required_col(), nullable_col());
        assert!(is_nullable(&sum));
    }

    #[test]
    fn test_neutralising_operators() {
        assert!(!is_nullable(&Expr::make_unary(UnaryOp::IsNull, nullable_col())));
        let count = Expr::make_unary(UnaryOp::Aggregate(AggregateFunc::Count), nullable_col());
        assert!(!is_nullable(&count));
        let max = Expr::make_unary(UnaryOp::Aggregate(AggregateFunc::Max), required_col());
        assert!(is_nullable(&max));
    }

    #[test]
    fn test_coalesce_nullable_only_if_all_args_are() {
        let c = Expr::make_nary(NaryOp::Coalesce, vec![nullable_col(), Expr::int(0)]);
        assert!(!is_nullable(&c));
        let c = Expr::make_nary(NaryOp::Coalesce, vec![nullable_col(), Expr::null()]);
        assert!(is_nullable(&c));
    }

    #[test]
    fn test_always_null() {
        let e = Expr::make_binary(BinaryOp::Mul, nullable_col(), Expr::null());
        assert!(is_always_null(&e));
        let e = Expr::make_binary(BinaryOp::And, Expr::literal(false), Expr::null());
        assert!(!is_always_null(&e));
        let e = Expr::make_case(vec![(Expr::literal(true), Expr::null())], None);
        assert!(is_always_null(&e));
        assert!(!is_always_null(&nullable_col()));
    }

    #[test]
    fn test_null_safe_compare() {
        assert_eq!(
            null_safe_compare(BinaryOp::Eq, Expr::null(), Expr::null()),
            Expr::make_unary(UnaryOp::IsNull, Expr::null())
        );
        assert_eq!(
            null_safe_compare(BinaryOp::Eq, nullable_col(), required_col()),
            Expr::make_binary(BinaryOp::Eq, nullable_col(), required_col())
        );
    }
}
