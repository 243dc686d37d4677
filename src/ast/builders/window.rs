//! Window function builders (OVER, LAG/LEAD, ranking).

use std::marker::PhantomData;

use crate::ast::builders::family::{Family, Integer};
use crate::ast::builders::typed::Typed;
use crate::ast::{Expr, FrameBound, OrderTerm, SortOrder, WindowExpr, WindowFrame, WindowFunction};
use crate::error::ExprResult;

impl<K: Family> Typed<K> {
    /// Evaluate this aggregate over a window instead of a group.
    pub fn over(self) -> WindowBuilder<K> {
        WindowBuilder::new(WindowFunction::Aggregate(self.into_expr()))
    }

    /// Value from a preceding row.
    pub fn lag(self) -> OffsetWindowBuilder<K> {
        OffsetWindowBuilder::new(self.into_expr(), false)
    }

    /// Value from a following row.
    pub fn lead(self) -> OffsetWindowBuilder<K> {
        OffsetWindowBuilder::new(self.into_expr(), true)
    }

    pub fn first_value(self) -> WindowBuilder<K> {
        WindowBuilder::new(WindowFunction::FirstValue(self.into_expr()))
    }

    pub fn last_value(self) -> WindowBuilder<K> {
        WindowBuilder::new(WindowFunction::LastValue(self.into_expr()))
    }

    /// Value of the `n`th row of the frame, 1-based.
    pub fn nth_value(self, n: i64) -> WindowBuilder<K> {
        WindowBuilder::new(WindowFunction::NthValue {
            value: self.into_expr(),
            n,
        })
    }
}

/// ROW_NUMBER() OVER (...)
pub fn row_number() -> WindowBuilder<Integer> {
    WindowBuilder::new(WindowFunction::RowNumber)
}

/// RANK() OVER (...)
pub fn rank() -> WindowBuilder<Integer> {
    WindowBuilder::new(WindowFunction::Rank)
}

/// DENSE_RANK() OVER (...)
pub fn dense_rank() -> WindowBuilder<Integer> {
    WindowBuilder::new(WindowFunction::DenseRank)
}

/// Partition and ordering shared by both window builders.
#[derive(Debug, Clone, Default)]
struct WindowSpec {
    partition: Vec<Expr>,
    order: Vec<OrderTerm>,
}

/// Builder for a window, finished by a frame choice.
#[derive(Debug, Clone)]
pub struct WindowBuilder<K: Family> {
    function: WindowFunction,
    spec: WindowSpec,
    _family: PhantomData<K>,
}

impl<K: Family> WindowBuilder<K> {
    fn new(function: WindowFunction) -> Self {
        Self {
            function,
            spec: WindowSpec::default(),
            _family: PhantomData,
        }
    }

    pub fn partition_by(mut self, expr: impl Into<Expr>) -> Self {
        self.spec.partition.push(expr.into());
        self
    }

    pub fn order_by(self, expr: impl Into<Expr>) -> Self {
        self.order_by_with(expr, SortOrder::Asc)
    }

    pub fn order_by_desc(self, expr: impl Into<Expr>) -> Self {
        self.order_by_with(expr, SortOrder::Desc)
    }

    /// Order with explicit direction and nulls placement.
    pub fn order_by_with(mut self, expr: impl Into<Expr>, order: SortOrder) -> Self {
        self.spec.order.push(OrderTerm::new(expr, order));
        self
    }

    fn finish(self, frame: Option<WindowFrame>) -> ExprResult<Typed<K>> {
        let window = WindowExpr::new(self.function, self.spec.partition, self.spec.order, frame)?;
        Ok(Typed::wrap(window.into()))
    }

    /// The dialect's default frame.
    pub fn default_frame(self) -> ExprResult<Typed<K>> {
        self.finish(None)
    }

    /// ROWS BETWEEN start AND end
    pub fn rows(self, start: FrameBound, end: FrameBound) -> ExprResult<Typed<K>> {
        self.finish(Some(WindowFrame::Rows { start, end }))
    }

    /// RANGE BETWEEN start AND end
    pub fn range(self, start: FrameBound, end: FrameBound) -> ExprResult<Typed<K>> {
        self.finish(Some(WindowFrame::Range { start, end }))
    }
}

/// Builder for LAG and LEAD.
#[derive(Debug, Clone)]
pub struct OffsetWindowBuilder<K: Family> {
    value: Expr,
    lead: bool,
    offset: i64,
    default: Expr,
    spec: WindowSpec,
    _family: PhantomData<K>,
}

impl<K: Family> OffsetWindowBuilder<K> {
    fn new(value: Expr, lead: bool) -> Self {
        Self {
            value,
            lead,
            offset: 1,
            default: Expr::null(),
            spec: WindowSpec::default(),
            _family: PhantomData,
        }
    }

    /// Rows to look back (LAG) or ahead (LEAD). Defaults to 1.
    pub fn offset(mut self, n: i64) -> Self {
        self.offset = n;
        self
    }

    /// Value when the offset row does not exist. Defaults to NULL.
    pub fn default_value(mut self, value: impl Into<Typed<K>>) -> Self {
        self.default = value.into().into_expr();
        self
    }

    pub fn partition_by(mut self, expr: impl Into<Expr>) -> Self {
        self.spec.partition.push(expr.into());
        self
    }

    pub fn order_by(self, expr: impl Into<Expr>) -> Self {
        self.order_by_with(expr, SortOrder::Asc)
    }

    pub fn order_by_desc(self, expr: impl Into<Expr>) -> Self {
        self.order_by_with(expr, SortOrder::Desc)
    }

    pub fn order_by_with(mut self, expr: impl Into<Expr>, order: SortOrder) -> Self {
        self.spec.order.push(OrderTerm::new(expr, order));
        self
    }

    /// Fails with `MissingOrdering` when no ordering was given.
    pub fn build(self) -> ExprResult<Typed<K>> {
        let function = if self.lead {
            WindowFunction::Lead {
                value: self.value,
                offset: self.offset,
                default: self.default,
            }
        } else {
            WindowFunction::Lag {
                value: self.value,
                offset: self.offset,
                default: self.default,
            }
        };
        let window = WindowExpr::new(function, self.spec.partition, self.spec.order, None)?;
        Ok(Typed::wrap(window.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{IntegerExpr, NumberExpr, StringExpr};
    use crate::error::ExprError;
    use crate::transpiler::ToSql;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_running_total() {
        let total = NumberExpr::column("amount")
            .sum()
            .over()
            .partition_by(StringExpr::column("account"))
            .order_by(IntegerExpr::column("id"))
            .rows(FrameBound::UnboundedPreceding, FrameBound::CurrentRow)
            .unwrap();
        assert!(total.is_window_function());
        assert!(!total.is_aggregator());
        assert_eq!(
            total.to_sql(),
            "SUM(amount) OVER (PARTITION BY account ORDER BY id ASC ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)"
        );
    }

    #[test]
    fn test_lag_without_order_fails() {
        let err = NumberExpr::column("price").lag().build().unwrap_err();
        assert!(matches!(err, ExprError::MissingOrdering { function: "LAG" }));
    }

    #[test]
    fn test_lead_with_offset_and_default() {
        let next = NumberExpr::column("price")
            .lead()
            .offset(2)
            .default_value(0.0)
            .order_by(IntegerExpr::column("seq"))
            .build()
            .unwrap();
        assert_eq!(next.to_sql(), "LEAD(price, 2, 0) OVER (ORDER BY seq ASC)");
    }

    #[test]
    fn test_over_requires_aggregate() {
        let err = NumberExpr::column("x").over().default_frame().unwrap_err();
        assert!(matches!(err, ExprError::InvalidWindow(_)));
    }

    #[test]
    fn test_over_requires_aggregate_at_the_top() {
        let shifted = NumberExpr::column("x").max().plus(1.0);
        assert!(shifted.is_aggregator());
        let err = shifted.over().default_frame().unwrap_err();
        assert!(matches!(err, ExprError::InvalidWindow(_)));

        let nested = NumberExpr::column("x").sum().max();
        let err = nested.over().default_frame().unwrap_err();
        assert!(matches!(err, ExprError::InvalidWindow(_)));
    }

    #[test]
    fn test_ranking() {
        let r = row_number()
            .order_by_desc(NumberExpr::column("score"))
            .default_frame()
            .unwrap();
        assert_eq!(r.to_sql(), "ROW_NUMBER() OVER (ORDER BY score DESC)");
    }
}
