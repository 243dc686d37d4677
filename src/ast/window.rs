//! Window function nodes: the function, its partition, ordering and frame.

use serde::{Deserialize, Serialize};

use crate::ast::expr::Expr;
use crate::ast::operators::{SortOrder, UnaryOp};
use crate::error::{ExprError, ExprResult};

/// Window frame definition for window functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowFrame {
    /// ROWS BETWEEN start AND end
    Rows { start: FrameBound, end: FrameBound },
    /// RANGE BETWEEN start AND end
    Range { start: FrameBound, end: FrameBound },
}

impl WindowFrame {
    pub fn bounds(&self) -> (FrameBound, FrameBound) {
        match self {
            WindowFrame::Rows { start, end } | WindowFrame::Range { start, end } => (*start, *end),
        }
    }

    fn validate(&self, order_terms: usize) -> ExprResult<()> {
        let (start, end) = self.bounds();
        for bound in [start, end] {
            if let FrameBound::Preceding(n) | FrameBound::Following(n) = bound {
                if n < 0 {
                    return Err(ExprError::InvalidWindow(format!(
                        "frame offset must be non-negative, got {}",
                        n
                    )));
                }
            }
        }
        if start == FrameBound::UnboundedFollowing || end == FrameBound::UnboundedPreceding {
            return Err(ExprError::InvalidWindow(format!(
                "frame cannot run from {} to {}",
                start, end
            )));
        }
        if start.position() > end.position() {
            return Err(ExprError::InvalidWindow(format!(
                "frame start {} follows frame end {}",
                start, end
            )));
        }
        let is_range = matches!(self, WindowFrame::Range { .. });
        if is_range && (start.is_offset() || end.is_offset()) && order_terms != 1 {
            return Err(ExprError::InvalidWindow(
                "RANGE with an offset requires exactly one ORDER BY term".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for WindowFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowFrame::Rows { start, end } => write!(f, "ROWS BETWEEN {} AND {}", start, end),
            WindowFrame::Range { start, end } => write!(f, "RANGE BETWEEN {} AND {}", start, end),
        }
    }
}

/// Window frame boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(i32),
    CurrentRow,
    Following(i32),
    UnboundedFollowing,
}

impl FrameBound {
    /// Position relative to the current row, for ordering bounds.
    fn position(&self) -> i64 {
        match self {
            FrameBound::UnboundedPreceding => i64::MIN,
            FrameBound::Preceding(n) => -(*n as i64),
            FrameBound::CurrentRow => 0,
            FrameBound::Following(n) => *n as i64,
            FrameBound::UnboundedFollowing => i64::MAX,
        }
    }

    fn is_offset(&self) -> bool {
        matches!(self, FrameBound::Preceding(_) | FrameBound::Following(_))
    }
}

impl std::fmt::Display for FrameBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameBound::UnboundedPreceding => write!(f, "UNBOUNDED PRECEDING"),
            FrameBound::Preceding(n) => write!(f, "{} PRECEDING", n),
            FrameBound::CurrentRow => write!(f, "CURRENT ROW"),
            FrameBound::Following(n) => write!(f, "{} FOLLOWING", n),
            FrameBound::UnboundedFollowing => write!(f, "UNBOUNDED FOLLOWING"),
        }
    }
}

/// One ORDER BY term of a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTerm {
    pub expr: Expr,
    pub order: SortOrder,
}

impl OrderTerm {
    pub fn new(expr: impl Into<Expr>, order: SortOrder) -> Self {
        Self {
            expr: expr.into(),
            order,
        }
    }

    pub fn asc(expr: impl Into<Expr>) -> Self {
        Self::new(expr, SortOrder::Asc)
    }

    pub fn desc(expr: impl Into<Expr>) -> Self {
        Self::new(expr, SortOrder::Desc)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WindowFunction {
    /// An aggregate (MAX, SUM, COUNT, ...) evaluated over the window
    Aggregate(Expr),
    Lag {
        value: Expr,
        offset: i64,
        default: Expr,
    },
    Lead {
        value: Expr,
        offset: i64,
        default: Expr,
    },
    FirstValue(Expr),
    LastValue(Expr),
    NthValue {
        value: Expr,
        n: i64,
    },
    RowNumber,
    Rank,
    DenseRank,
}

impl WindowFunction {
    pub fn name(&self) -> &'static str {
        match self {
            WindowFunction::Aggregate(_) => "AGGREGATE",
            WindowFunction::Lag { .. } => "LAG",
            WindowFunction::Lead { .. } => "LEAD",
            WindowFunction::FirstValue(_) => "FIRST_VALUE",
            WindowFunction::LastValue(_) => "LAST_VALUE",
            WindowFunction::NthValue { .. } => "NTH_VALUE",
            WindowFunction::RowNumber => "ROW_NUMBER",
            WindowFunction::Rank => "RANK",
            WindowFunction::DenseRank => "DENSE_RANK",
        }
    }

    /// Whether a frame clause applies. Offset and ranking functions ignore frames.
    pub fn accepts_frame(&self) -> bool {
        matches!(
            self,
            WindowFunction::Aggregate(_)
                | WindowFunction::FirstValue(_)
                | WindowFunction::LastValue(_)
                | WindowFunction::NthValue { .. }
        )
    }

    fn exprs(&self) -> Vec<&Expr> {
        match self {
            WindowFunction::Aggregate(e)
            | WindowFunction::FirstValue(e)
            | WindowFunction::LastValue(e) => vec![e],
            WindowFunction::Lag { value, default, .. }
            | WindowFunction::Lead { value, default, .. } => vec![value, default],
            WindowFunction::NthValue { value, .. } => vec![value],
            WindowFunction::RowNumber | WindowFunction::Rank | WindowFunction::DenseRank => {
                Vec::new()
            }
        }
    }

    fn map_exprs(&self, f: &mut impl FnMut(&Expr) -> Expr) -> WindowFunction {
        match self {
            WindowFunction::Aggregate(e) => WindowFunction::Aggregate(f(e)),
            WindowFunction::FirstValue(e) => WindowFunction::FirstValue(f(e)),
            WindowFunction::LastValue(e) => WindowFunction::LastValue(f(e)),
            WindowFunction::Lag {
                value,
                offset,
                default,
            } => WindowFunction::Lag {
                value: f(value),
                offset: *offset,
                default: f(default),
            },
            WindowFunction::Lead {
                value,
                offset,
                default,
            } => WindowFunction::Lead {
                value: f(value),
                offset: *offset,
                default: f(default),
            },
            WindowFunction::NthValue { value, n } => WindowFunction::NthValue {
                value: f(value),
                n: *n,
            },
            other => other.clone(),
        }
    }
}

/// A window function applied over a partition, ordering and optional frame.
///
/// Only built through [`WindowExpr::new`] (or deserialized through it), so
/// every instance has passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WindowParts")]
pub struct WindowExpr {
    pub(crate) function: WindowFunction,
    pub(crate) partition: Vec<Expr>,
    pub(crate) order: Vec<OrderTerm>,
    pub(crate) frame: Option<WindowFrame>,
}

#[derive(Deserialize)]
struct WindowParts {
    function: WindowFunction,
    partition: Vec<Expr>,
    order: Vec<OrderTerm>,
    frame: Option<WindowFrame>,
}

impl TryFrom<WindowParts> for WindowExpr {
    type Error = ExprError;

    fn try_from(parts: WindowParts) -> ExprResult<Self> {
        WindowExpr::new(parts.function, parts.partition, parts.order, parts.frame)
    }
}

impl WindowExpr {
    /// Validate and build.
    pub fn new(
        function: WindowFunction,
        partition: Vec<Expr>,
        order: Vec<OrderTerm>,
        frame: Option<WindowFrame>,
    ) -> ExprResult<Self> {
        let window = Self {
            function,
            partition,
            order,
            frame,
        };
        window.validate()?;
        Ok(window)
    }

    pub fn function(&self) -> &WindowFunction {
        &self.function
    }

    pub fn partition(&self) -> &[Expr] {
        &self.partition
    }

    pub fn order(&self) -> &[OrderTerm] {
        &self.order
    }

    pub fn frame(&self) -> Option<WindowFrame> {
        self.frame
    }

    pub fn validate(&self) -> ExprResult<()> {
        match &self.function {
            WindowFunction::Aggregate(e) => match e {
                Expr::Unary {
                    op: UnaryOp::Aggregate(_),
                    operand,
                } if !operand.is_aggregator() => {}
                _ => {
                    return Err(ExprError::InvalidWindow(
                        "over() must be applied directly to a single aggregate call".to_string(),
                    ));
                }
            },
            WindowFunction::Lag { offset, .. } | WindowFunction::Lead { offset, .. } => {
                if self.order.is_empty() {
                    return Err(ExprError::MissingOrdering {
                        function: self.function.name(),
                    });
                }
                if *offset < 0 {
                    return Err(ExprError::InvalidWindow(format!(
                        "{} offset must be non-negative, got {}",
                        self.function.name(),
                        offset
                    )));
                }
            }
            WindowFunction::NthValue { n, .. } if *n < 1 => {
                return Err(ExprError::InvalidWindow(format!(
                    "NTH_VALUE position must be at least 1, got {}",
                    n
                )));
            }
            _ => {}
        }
        if let Some(frame) = &self.frame {
            frame.validate(self.order.len())?;
        }
        Ok(())
    }

    pub(crate) fn children(&self) -> Vec<&Expr> {
        let mut out = self.function.exprs();
        out.extend(self.partition.iter());
        out.extend(self.order.iter().map(|t| &t.expr));
        out
    }

    pub(crate) fn map_exprs(&self, f: &mut impl FnMut(&Expr) -> Expr) -> WindowExpr {
        WindowExpr {
            function: self.function.map_exprs(f),
            partition: self.partition.iter().map(|p| f(p)).collect(),
            order: self
                .order
                .iter()
                .map(|t| OrderTerm {
                    expr: f(&t.expr),
                    order: t.order,
                })
                .collect(),
            frame: self.frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AggregateFunc, ValueKind};

    fn salary() -> Expr {
        Expr::column("salary", ValueKind::Number)
    }

    fn sum_salary() -> Expr {
        Expr::make_unary(UnaryOp::Aggregate(AggregateFunc::Sum), salary())
    }

    #[test]
    fn test_frame_display() {
        let frame = WindowFrame::Rows {
            start: FrameBound::Preceding(2),
            end: FrameBound::CurrentRow,
        };
        assert_eq!(frame.to_string(), "ROWS BETWEEN 2 PRECEDING AND CURRENT ROW");
    }

    #[test]
    fn test_frame_start_after_end_rejected() {
        let frame = WindowFrame::Rows {
            start: FrameBound::Following(1),
            end: FrameBound::Preceding(1),
        };
        let err = WindowExpr::new(WindowFunction::Aggregate(sum_salary()), vec![], vec![], Some(frame))
            .unwrap_err();
        assert!(matches!(err, ExprError::InvalidWindow(_)));
    }

    #[test]
    fn test_negative_offset_rejected() {
        let frame = WindowFrame::Rows {
            start: FrameBound::Preceding(-1),
            end: FrameBound::CurrentRow,
        };
        assert!(
            WindowExpr::new(WindowFunction::Aggregate(sum_salary()), vec![], vec![], Some(frame))
                .is_err()
        );
    }

    #[test]
    fn test_range_offset_needs_single_order_term() {
        let frame = WindowFrame::Range {
            start: FrameBound::Preceding(5),
            end: FrameBound::CurrentRow,
        };
        let f = WindowFunction::Aggregate(sum_salary());
        assert!(WindowExpr::new(f.clone(), vec![], vec![], Some(frame)).is_err());
        assert!(WindowExpr::new(f, vec![], vec![OrderTerm::asc(salary())], Some(frame)).is_ok());
    }

    #[test]
    fn test_lag_requires_ordering() {
        let lag = WindowFunction::Lag {
            value: salary(),
            offset: 1,
            default: Expr::null(),
        };
        let err = WindowExpr::new(lag, vec![], vec![], None).unwrap_err();
        assert!(matches!(err, ExprError::MissingOrdering { function: "LAG" }));
    }

    #[test]
    fn test_aggregate_window_requires_aggregator() {
        let err = WindowExpr::new(WindowFunction::Aggregate(salary()), vec![], vec![], None)
            .unwrap_err();
        assert!(matches!(err, ExprError::InvalidWindow(_)));
    }

    #[test]
    fn test_aggregate_window_rejects_wrapped_aggregate() {
        let shifted = Expr::make_binary(crate::ast::BinaryOp::Add, sum_salary(), Expr::int(1));
        let err = WindowExpr::new(WindowFunction::Aggregate(shifted), vec![], vec![], None)
            .unwrap_err();
        assert!(matches!(err, ExprError::InvalidWindow(_)));
    }

    #[test]
    fn test_deserialized_window_is_validated() {
        let lag = WindowFunction::Lag {
            value: salary(),
            offset: 1,
            default: Expr::null(),
        };
        let window = WindowExpr::new(lag, vec![], vec![OrderTerm::asc(salary())], None).unwrap();
        assert_eq!(window.order().len(), 1);
        assert_eq!(window.function().name(), "LAG");

        let mut json = serde_json::to_value(&window).unwrap();
        let back: WindowExpr = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, window);

        json["order"] = serde_json::Value::Array(Vec::new());
        let err = serde_json::from_value::<WindowExpr>(json).unwrap_err();
        assert!(err.to_string().contains("LAG"), "{}", err);
    }

    #[test]
    fn test_nth_value_position() {
        let nth = WindowFunction::NthValue {
            value: salary(),
            n: 0,
        };
        assert!(WindowExpr::new(nth, vec![], vec![], None).is_err());
    }
}
