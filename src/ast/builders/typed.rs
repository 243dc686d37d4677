//! Typed expression wrapper.
//!
//! `Typed<K>` carries an `Expr` together with its value family as a phantom
//! type, so family mismatches are compile errors:
//!
//! ```ignore
//! use qail_expr::prelude::*;
//!
//! let age = IntegerExpr::column("age");
//! let adult = age.is_greater_than_or_equal(18);
//! let sql = adult.to_sql();   // "age >= 18"
//! ```

use std::collections::BTreeSet;
use std::marker::PhantomData;

use crate::ast::builders::family::{self, Family};
use crate::ast::nulls;
use crate::ast::{AggregateFunc, BinaryOp, Column, ColumnRef, Expr, NaryOp, UnaryOp};
use crate::error::{ExprError, ExprResult};

/// An expression statically known to belong to family `K`.
#[derive(Debug, Clone, PartialEq)]
pub struct Typed<K: Family> {
    expr: Expr,
    _family: PhantomData<K>,
}

impl<K: Family> Typed<K> {
    /// Wrap without checking; callers guarantee the family.
    pub(crate) fn wrap(expr: Expr) -> Self {
        Self {
            expr,
            _family: PhantomData,
        }
    }

    pub(crate) fn unary<R: Family>(self, op: UnaryOp) -> Typed<R> {
        Typed::wrap(Expr::make_unary(op, self.expr))
    }

    pub(crate) fn binary<B: Family, R: Family>(self, op: BinaryOp, other: Typed<B>) -> Typed<R> {
        Typed::wrap(Expr::make_binary(op, self.expr, other.expr))
    }

    /// Nullable column of this family.
    pub fn column(name: impl Into<String>) -> Self {
        Self::wrap(Expr::Column(Column::new(name, K::KIND)))
    }

    /// Nullable column qualified with its table.
    pub fn column_in(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::wrap(Expr::Column(Column::new(name, K::KIND).in_table(table)))
    }

    /// Column declared NOT NULL.
    pub fn required_column(name: impl Into<String>) -> Self {
        Self::wrap(Expr::Column(Column::new(name, K::KIND).not_null()))
    }

    /// The NULL literal typed as this family.
    pub fn null() -> Self {
        Self::wrap(Expr::null())
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }

    pub fn kind(&self) -> crate::ast::ValueKind {
        K::KIND
    }

    /// Deep copy.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn is_nullable(&self) -> bool {
        self.expr.is_nullable()
    }

    pub fn is_always_null(&self) -> bool {
        self.expr.is_always_null()
    }

    pub fn is_aggregator(&self) -> bool {
        self.expr.is_aggregator()
    }

    pub fn is_purely_functional(&self) -> bool {
        self.expr.is_purely_functional()
    }

    pub fn is_window_function(&self) -> bool {
        self.expr.is_window_function()
    }

    pub fn columns_involved(&self) -> BTreeSet<ColumnRef> {
        self.expr.columns_involved()
    }

    pub fn tables_involved(&self) -> BTreeSet<String> {
        self.expr.tables_involved()
    }

    /// `self = other`, or `IS NULL` when either side is statically NULL.
    pub fn is(self, other: impl Into<Self>) -> Typed<family::Boolean> {
        Typed::wrap(nulls::null_safe_compare(
            BinaryOp::Eq,
            self.expr,
            other.into().expr,
        ))
    }

    /// `self <> other`, or `IS NOT NULL` when either side is statically NULL.
    pub fn is_not(self, other: impl Into<Self>) -> Typed<family::Boolean> {
        Typed::wrap(nulls::null_safe_compare(
            BinaryOp::Ne,
            self.expr,
            other.into().expr,
        ))
    }

    pub fn is_null(self) -> Typed<family::Boolean> {
        self.unary(UnaryOp::IsNull)
    }

    pub fn is_not_null(self) -> Typed<family::Boolean> {
        self.unary(UnaryOp::IsNotNull)
    }

    /// COALESCE(self, fallback)
    pub fn if_null(self, fallback: impl Into<Self>) -> Self {
        Self::wrap(Expr::make_nary(
            NaryOp::Coalesce,
            vec![self.expr, fallback.into().expr],
        ))
    }

    pub fn is_in<T: Into<Self>>(self, values: impl IntoIterator<Item = T>) -> Typed<family::Boolean> {
        self.membership(NaryOp::In, values)
    }

    pub fn is_not_in<T: Into<Self>>(
        self,
        values: impl IntoIterator<Item = T>,
    ) -> Typed<family::Boolean> {
        self.membership(NaryOp::NotIn, values)
    }

    fn membership<T: Into<Self>>(
        self,
        op: NaryOp,
        values: impl IntoIterator<Item = T>,
    ) -> Typed<family::Boolean> {
        let mut args = vec![self.expr];
        args.extend(values.into_iter().map(|v| v.into().expr));
        Typed::wrap(Expr::make_nary(op, args))
    }

    /// Text form of the value.
    pub fn to_text(self) -> Typed<family::Text> {
        self.unary(UnaryOp::ToText)
    }

    /// COUNT(self)
    pub fn count(self) -> Typed<family::Integer> {
        self.unary(UnaryOp::Aggregate(AggregateFunc::Count))
    }

    /// COUNT(DISTINCT self)
    pub fn count_distinct(self) -> Typed<family::Integer> {
        self.unary(UnaryOp::Aggregate(AggregateFunc::CountDistinct))
    }
}

impl<K: Family> From<Typed<K>> for Expr {
    fn from(typed: Typed<K>) -> Self {
        typed.expr
    }
}

impl<K: Family> AsRef<Expr> for Typed<K> {
    fn as_ref(&self) -> &Expr {
        &self.expr
    }
}

impl<K: Family> TryFrom<Expr> for Typed<K> {
    type Error = ExprError;

    fn try_from(expr: Expr) -> ExprResult<Self> {
        let found = expr.kind();
        if K::KIND.accepts(found) {
            Ok(Self::wrap(expr))
        } else {
            Err(ExprError::incompatible("try_from", K::KIND.to_string(), found))
        }
    }
}
