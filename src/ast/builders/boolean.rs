//! Boolean connectives and conditional expressions.

use crate::ast::builders::family::{Boolean, Family};
use crate::ast::builders::typed::Typed;
use crate::ast::{BinaryOp, Expr, NaryOp, UnaryOp};

impl Typed<Boolean> {
    pub fn and(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::And, other.into())
    }

    pub fn or(self, other: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Or, other.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        self.unary(UnaryOp::Not)
    }

    /// CASE WHEN self THEN then ELSE otherwise END
    pub fn if_then_else<K: Family>(
        self,
        then: impl Into<Typed<K>>,
        otherwise: impl Into<Typed<K>>,
    ) -> Typed<K> {
        Typed::wrap(Expr::make_case(
            vec![(self.into_expr(), then.into().into_expr())],
            Some(otherwise.into().into_expr()),
        ))
    }
}

/// Conjunction of every condition. An empty list is TRUE.
pub fn all_of<T: Into<Typed<Boolean>>>(conditions: impl IntoIterator<Item = T>) -> Typed<Boolean> {
    Typed::wrap(Expr::make_nary(
        NaryOp::AllOf,
        conditions.into_iter().map(|c| c.into().into_expr()).collect(),
    ))
}

/// Disjunction of every condition. An empty list is FALSE.
pub fn any_of<T: Into<Typed<Boolean>>>(conditions: impl IntoIterator<Item = T>) -> Typed<Boolean> {
    Typed::wrap(Expr::make_nary(
        NaryOp::AnyOf,
        conditions.into_iter().map(|c| c.into().into_expr()).collect(),
    ))
}
