use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ast::nulls;
use crate::ast::operators::{AggregateFunc, BinaryOp, DatePart, NaryOp, TimeUnit, UnaryOp};
use crate::ast::values::{Value, ValueKind};
use crate::ast::window::{WindowExpr, WindowFunction};
use crate::error::{ExprError, ExprResult};

/// A column reference as seen by the row/column binding interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub name: String,
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.table {
            Some(t) => write!(f, "{}.{}", t, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A typed column leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub table: Option<String>,
    pub name: String,
    pub kind: ValueKind,
    /// Whether the column may hold NULL. Columns are nullable unless declared otherwise.
    pub nullable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            table: None,
            name: name.into(),
            kind,
            nullable: true,
        }
    }

    pub fn in_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn reference(&self) -> ColumnRef {
        ColumnRef {
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }
}

/// Expression node.
///
/// Children are owned exclusively; a tree never shares or back-references a
/// node, so `Clone` is a full deep copy. Nodes are never mutated after
/// construction and every property is derived from the children on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Literal value (including the untyped NULL)
    Literal(Value),
    /// Column reference
    Column(Column),
    /// Current date / date-time / instant, the only source of wall-clock time
    Current(ValueKind),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Nary {
        op: NaryOp,
        args: Vec<Expr>,
    },
    /// CASE WHEN condition THEN value ... ELSE otherwise END
    Case {
        branches: Vec<(Expr, Expr)>,
        otherwise: Option<Box<Expr>>,
    },
    /// Window function call with its OVER clause
    Window(Box<WindowExpr>),
}

impl Expr {
    pub fn null() -> Expr {
        Expr::Literal(Value::Null)
    }

    pub fn literal(value: impl Into<Value>) -> Expr {
        Expr::Literal(value.into())
    }

    pub fn int(n: i64) -> Expr {
        Expr::Literal(Value::Int(n))
    }

    pub fn text(s: impl Into<String>) -> Expr {
        Expr::Literal(Value::String(s.into()))
    }

    /// Nullable column of the given family.
    pub fn column(name: impl Into<String>, kind: ValueKind) -> Expr {
        Expr::Column(Column::new(name, kind))
    }

    /// Deep copy. Identical to `clone()`; the copy shares nothing with `self`.
    pub fn copy(&self) -> Expr {
        self.clone()
    }

    /// Checked unary constructor.
    pub fn unary(op: UnaryOp, operand: Expr) -> ExprResult<Expr> {
        check_unary(op, operand.kind())?;
        Ok(Expr::make_unary(op, operand))
    }

    /// Checked binary constructor. Equality against a statically-null
    /// operand becomes IS NULL / IS NOT NULL.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> ExprResult<Expr> {
        check_binary(op, left.kind(), right.kind())?;
        match op {
            BinaryOp::Eq | BinaryOp::Ne => Ok(nulls::null_safe_compare(op, left, right)),
            _ => Ok(Expr::make_binary(op, left, right)),
        }
    }

    /// Checked n-ary constructor.
    pub fn nary(op: NaryOp, args: Vec<Expr>) -> ExprResult<Expr> {
        let kinds: Vec<ValueKind> = args.iter().map(Expr::kind).collect();
        check_nary(op, &kinds)?;
        Ok(Expr::make_nary(op, args))
    }

    /// Checked CASE constructor: conditions must be boolean and every value
    /// must belong to one family.
    pub fn case(branches: Vec<(Expr, Expr)>, otherwise: Option<Expr>) -> ExprResult<Expr> {
        if branches.is_empty() {
            return Err(ExprError::InvalidArgument(
                "CASE requires at least one WHEN branch".to_string(),
            ));
        }
        let mut family = ValueKind::Null;
        for (cond, value) in &branches {
            expect("case", "boolean condition", cond.kind(), |k| k == ValueKind::Boolean)?;
            family = unify("case", family, value.kind())?;
        }
        if let Some(other) = &otherwise {
            unify("case", family, other.kind())?;
        }
        Ok(Expr::Case {
            branches,
            otherwise: otherwise.map(Box::new),
        })
    }

    pub(crate) fn make_unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub(crate) fn make_binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub(crate) fn make_nary(op: NaryOp, args: Vec<Expr>) -> Expr {
        Expr::Nary { op, args }
    }

    pub(crate) fn make_case(branches: Vec<(Expr, Expr)>, otherwise: Option<Expr>) -> Expr {
        Expr::Case {
            branches,
            otherwise: otherwise.map(Box::new),
        }
    }

    /// The family this expression evaluates to.
    pub fn kind(&self) -> ValueKind {
        match self {
            Expr::Literal(v) => v.kind(),
            Expr::Column(c) => c.kind,
            Expr::Current(kind) => *kind,
            Expr::Unary { op, operand } => unary_kind(*op, operand.kind()),
            Expr::Binary { op, left, right } => binary_kind(*op, left.kind(), right.kind()),
            Expr::Nary { op, args } => match op {
                NaryOp::Coalesce | NaryOp::Greatest | NaryOp::Least => {
                    args.iter().fold(ValueKind::Null, |acc, a| common_kind(acc, a.kind()))
                }
                NaryOp::Substring | NaryOp::Replace => ValueKind::Text,
                NaryOp::AllOf | NaryOp::AnyOf | NaryOp::In | NaryOp::NotIn => ValueKind::Boolean,
            },
            Expr::Case {
                branches,
                otherwise,
            } => branches
                .iter()
                .map(|(_, v)| v)
                .chain(otherwise.iter().map(|o| o.as_ref()))
                .fold(ValueKind::Null, |acc, v| common_kind(acc, v.kind())),
            Expr::Window(w) => w.kind(),
        }
    }

    pub fn is_nullable(&self) -> bool {
        nulls::is_nullable(self)
    }

    pub fn is_always_null(&self) -> bool {
        nulls::is_always_null(self)
    }

    /// True when the tree contains an aggregate that is not wrapped in a window.
    pub fn is_aggregator(&self) -> bool {
        match self {
            Expr::Unary {
                op: UnaryOp::Aggregate(_),
                ..
            } => true,
            Expr::Window(_) => false,
            _ => self.children().iter().any(|c| c.is_aggregator()),
        }
    }

    pub fn is_window_function(&self) -> bool {
        match self {
            Expr::Window(_) => true,
            _ => self.children().iter().any(|c| c.is_window_function()),
        }
    }

    /// Deterministic over its inputs: no column, no clock, no row-set dependency.
    pub fn is_purely_functional(&self) -> bool {
        match self {
            Expr::Literal(_) => true,
            Expr::Column(_) | Expr::Current(_) | Expr::Window(_) => false,
            Expr::Unary {
                op: UnaryOp::Aggregate(_),
                ..
            } => false,
            _ => self.children().iter().all(|c| c.is_purely_functional()),
        }
    }

    /// Direct children, in evaluation order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Literal(_) | Expr::Column(_) | Expr::Current(_) => Vec::new(),
            Expr::Unary { operand, .. } => vec![operand.as_ref()],
            Expr::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expr::Nary { args, .. } => args.iter().collect(),
            Expr::Case {
                branches,
                otherwise,
            } => {
                let mut out: Vec<&Expr> = Vec::with_capacity(branches.len() * 2 + 1);
                for (cond, value) in branches {
                    out.push(cond);
                    out.push(value);
                }
                if let Some(o) = otherwise {
                    out.push(o);
                }
                out
            }
            Expr::Window(w) => w.children(),
        }
    }

    /// Rebuild this node with every direct child passed through `f`.
    pub fn map_children(&self, f: &mut impl FnMut(&Expr) -> Expr) -> Expr {
        match self {
            Expr::Literal(_) | Expr::Column(_) | Expr::Current(_) => self.clone(),
            Expr::Unary { op, operand } => Expr::make_unary(*op, f(operand)),
            Expr::Binary { op, left, right } => Expr::make_binary(*op, f(left), f(right)),
            Expr::Nary { op, args } => Expr::make_nary(*op, args.iter().map(|a| f(a)).collect()),
            Expr::Case {
                branches,
                otherwise,
            } => Expr::make_case(
                branches.iter().map(|(c, v)| (f(c), f(v))).collect(),
                otherwise.as_ref().map(|o| f(o)),
            ),
            Expr::Window(w) => Expr::Window(Box::new(w.map_exprs(f))),
        }
    }

    /// Every column referenced anywhere in the tree.
    pub fn columns_involved(&self) -> BTreeSet<ColumnRef> {
        let mut out = BTreeSet::new();
        self.collect_columns(&mut out);
        out
    }

    /// Every table qualifier referenced anywhere in the tree.
    pub fn tables_involved(&self) -> BTreeSet<String> {
        self.columns_involved()
            .into_iter()
            .filter_map(|c| c.table)
            .collect()
    }

    fn collect_columns(&self, out: &mut BTreeSet<ColumnRef>) {
        if let Expr::Column(c) = self {
            out.insert(c.reference());
        }
        for child in self.children() {
            child.collect_columns(out);
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

impl From<Column> for Expr {
    fn from(column: Column) -> Self {
        Expr::Column(column)
    }
}

impl From<WindowExpr> for Expr {
    fn from(window: WindowExpr) -> Self {
        Expr::Window(Box::new(window))
    }
}

impl WindowExpr {
    pub fn kind(&self) -> ValueKind {
        match &self.function {
            WindowFunction::Aggregate(e)
            | WindowFunction::FirstValue(e)
            | WindowFunction::LastValue(e) => e.kind(),
            WindowFunction::Lag { value, .. }
            | WindowFunction::Lead { value, .. }
            | WindowFunction::NthValue { value, .. } => value.kind(),
            WindowFunction::RowNumber | WindowFunction::Rank | WindowFunction::DenseRank => {
                ValueKind::Integer
            }
        }
    }
}

/// Result family of a unary operator.
fn unary_kind(op: UnaryOp, operand: ValueKind) -> ValueKind {
    match op {
        UnaryOp::Not | UnaryOp::IsNull | UnaryOp::IsNotNull => ValueKind::Boolean,
        UnaryOp::Negate | UnaryOp::Abs | UnaryOp::Floor | UnaryOp::Ceil | UnaryOp::Round => operand,
        UnaryOp::Sqrt => ValueKind::Number,
        UnaryOp::Sign | UnaryOp::Length | UnaryOp::DayOfWeek | UnaryOp::ToInteger => {
            ValueKind::Integer
        }
        UnaryOp::ToNumber | UnaryOp::PointX | UnaryOp::PointY => ValueKind::Number,
        UnaryOp::ToText
        | UnaryOp::Upper
        | UnaryOp::Lower
        | UnaryOp::Trim
        | UnaryOp::LeftTrim
        | UnaryOp::RightTrim
        | UnaryOp::AsText => ValueKind::Text,
        UnaryOp::ToDate => ValueKind::Date,
        UnaryOp::ToDateTime => ValueKind::DateTime,
        UnaryOp::Extract(DatePart::Subsecond) => ValueKind::Number,
        UnaryOp::Extract(_) => ValueKind::Integer,
        UnaryOp::RepeatPart(TimeUnit::Second) => ValueKind::Number,
        UnaryOp::RepeatPart(_) => ValueKind::Integer,
        UnaryOp::BoundingBox => ValueKind::Polygon,
        UnaryOp::Aggregate(AggregateFunc::Count | AggregateFunc::CountDistinct) => {
            ValueKind::Integer
        }
        UnaryOp::Aggregate(AggregateFunc::Avg) => ValueKind::Number,
        UnaryOp::Aggregate(_) => operand,
    }
}

/// Result family of a binary operator.
fn binary_kind(op: BinaryOp, left: ValueKind, right: ValueKind) -> ValueKind {
    match op {
        BinaryOp::Eq
        | BinaryOp::Ne
        | BinaryOp::Lt
        | BinaryOp::Lte
        | BinaryOp::Gt
        | BinaryOp::Gte
        | BinaryOp::And
        | BinaryOp::Or
        | BinaryOp::Like
        | BinaryOp::ILike
        | BinaryOp::GeometryEquals => ValueKind::Boolean,
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            left.promote(right)
        }
        BinaryOp::IntDiv | BinaryOp::Position | BinaryOp::UnitsBetween(_) => ValueKind::Integer,
        BinaryOp::Power | BinaryOp::Distance => ValueKind::Number,
        BinaryOp::Concat => ValueKind::Text,
        BinaryOp::AddUnit(_) | BinaryOp::AddRepeat | BinaryOp::SubtractRepeat => left,
        BinaryOp::RepeatBetween => ValueKind::Duration,
        BinaryOp::MakePoint => ValueKind::Point,
    }
}

/// Shared family of two values in the same slot (COALESCE args, CASE arms).
fn common_kind(acc: ValueKind, next: ValueKind) -> ValueKind {
    match (acc, next) {
        (ValueKind::Null, k) | (k, ValueKind::Null) => k,
        (a, b) if a.is_numeric() && b.is_numeric() => a.promote(b),
        (a, _) => a,
    }
}

fn expect(
    operation: &str,
    expected: &str,
    found: ValueKind,
    accept: impl Fn(ValueKind) -> bool,
) -> ExprResult<()> {
    if found == ValueKind::Null || accept(found) {
        Ok(())
    } else {
        Err(ExprError::incompatible(operation, expected, found))
    }
}

/// Fold `next` into the running family, rejecting a mismatch.
fn unify(operation: &str, family: ValueKind, next: ValueKind) -> ExprResult<ValueKind> {
    if family.accepts(next) || next.accepts(family) {
        Ok(common_kind(family, next))
    } else {
        Err(ExprError::incompatible(operation, family.to_string(), next))
    }
}

fn op_name(op: impl std::fmt::Debug) -> String {
    format!("{:?}", op).to_lowercase()
}

fn check_unary(op: UnaryOp, kind: ValueKind) -> ExprResult<()> {
    let name = op_name(op);
    match op {
        UnaryOp::Not => expect(&name, "boolean", kind, |k| k == ValueKind::Boolean),
        UnaryOp::IsNull | UnaryOp::IsNotNull | UnaryOp::ToText => Ok(()),
        UnaryOp::Negate
        | UnaryOp::Abs
        | UnaryOp::Sqrt
        | UnaryOp::Floor
        | UnaryOp::Ceil
        | UnaryOp::Round
        | UnaryOp::Sign => expect(&name, "numeric value", kind, |k| k.is_numeric()),
        UnaryOp::ToInteger | UnaryOp::ToNumber => expect(&name, "numeric or text value", kind, |k| {
            k.is_numeric() || k == ValueKind::Text || k == ValueKind::Boolean
        }),
        UnaryOp::ToDate | UnaryOp::ToDateTime => {
            expect(&name, "temporal or text value", kind, |k| {
                k.is_temporal() || k == ValueKind::Text
            })
        }
        UnaryOp::Upper
        | UnaryOp::Lower
        | UnaryOp::Trim
        | UnaryOp::LeftTrim
        | UnaryOp::RightTrim
        | UnaryOp::Length => expect(&name, "text", kind, |k| k == ValueKind::Text),
        UnaryOp::Extract(_) | UnaryOp::DayOfWeek => {
            expect(&name, "temporal value", kind, |k| k.is_temporal())
        }
        UnaryOp::RepeatPart(_) => expect(&name, "duration", kind, |k| k == ValueKind::Duration),
        UnaryOp::PointX | UnaryOp::PointY | UnaryOp::BoundingBox => {
            expect(&name, "point", kind, |k| k == ValueKind::Point)
        }
        UnaryOp::AsText => expect(&name, "geometry", kind, |k| k.is_geometry()),
        UnaryOp::Aggregate(AggregateFunc::Count | AggregateFunc::CountDistinct) => Ok(()),
        UnaryOp::Aggregate(AggregateFunc::Sum | AggregateFunc::Avg) => {
            expect(&name, "numeric value", kind, |k| k.is_numeric())
        }
        UnaryOp::Aggregate(AggregateFunc::Min | AggregateFunc::Max) => {
            expect(&name, "ordered value", kind, |k| k.is_ordered())
        }
    }
}

fn check_binary(op: BinaryOp, left: ValueKind, right: ValueKind) -> ExprResult<()> {
    let name = op_name(op);
    let both = |expected: &str, accept: fn(ValueKind) -> bool| -> ExprResult<()> {
        expect(&name, expected, left, accept)?;
        expect(&name, expected, right, accept)
    };
    match op {
        BinaryOp::Eq | BinaryOp::Ne => unify(&name, left, right).map(|_| ()),
        BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte => {
            both("ordered value", |k| k.is_ordered())?;
            unify(&name, left, right).map(|_| ())
        }
        BinaryOp::And | BinaryOp::Or => both("boolean", |k| k == ValueKind::Boolean),
        BinaryOp::Add
        | BinaryOp::Sub
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::IntDiv
        | BinaryOp::Rem
        | BinaryOp::Power
        | BinaryOp::MakePoint => both("numeric value", |k| k.is_numeric()),
        BinaryOp::Concat | BinaryOp::Like | BinaryOp::ILike | BinaryOp::Position => {
            both("text", |k| k == ValueKind::Text)
        }
        BinaryOp::AddUnit(_) => {
            expect(&name, "temporal value", left, |k| k.is_temporal())?;
            expect(&name, "numeric value", right, |k| k.is_numeric())
        }
        BinaryOp::UnitsBetween(_) | BinaryOp::RepeatBetween => {
            both("temporal value", |k| k.is_temporal())?;
            unify(&name, left, right).map(|_| ())
        }
        BinaryOp::AddRepeat | BinaryOp::SubtractRepeat => {
            expect(&name, "temporal value", left, |k| k.is_temporal())?;
            expect(&name, "duration", right, |k| k == ValueKind::Duration)
        }
        BinaryOp::Distance => both("point", |k| k == ValueKind::Point),
        BinaryOp::GeometryEquals => {
            both("geometry", |k| k.is_geometry())?;
            unify(&name, left, right).map(|_| ())
        }
    }
}

fn check_nary(op: NaryOp, kinds: &[ValueKind]) -> ExprResult<()> {
    let name = op_name(op);
    let arity = |min: usize, max: Option<usize>| -> ExprResult<()> {
        let ok = kinds.len() >= min && max.is_none_or(|m| kinds.len() <= m);
        if ok {
            Ok(())
        } else {
            Err(ExprError::InvalidArgument(format!(
                "{} does not take {} arguments",
                name,
                kinds.len()
            )))
        }
    };
    match op {
        NaryOp::Coalesce | NaryOp::In | NaryOp::NotIn => {
            arity(1, None)?;
            kinds
                .iter()
                .try_fold(ValueKind::Null, |acc, k| unify(&name, acc, *k))
                .map(|_| ())
        }
        NaryOp::Greatest | NaryOp::Least => {
            arity(1, None)?;
            for k in kinds {
                expect(&name, "ordered value", *k, |k| k.is_ordered())?;
            }
            kinds
                .iter()
                .try_fold(ValueKind::Null, |acc, k| unify(&name, acc, *k))
                .map(|_| ())
        }
        NaryOp::Substring => {
            arity(3, Some(3))?;
            expect(&name, "text", kinds[0], |k| k == ValueKind::Text)?;
            expect(&name, "integer", kinds[1], |k| k.is_numeric())?;
            expect(&name, "integer", kinds[2], |k| k.is_numeric())
        }
        NaryOp::Replace => {
            arity(3, Some(3))?;
            for k in kinds {
                expect(&name, "text", *k, |k| k == ValueKind::Text)?;
            }
            Ok(())
        }
        NaryOp::AllOf | NaryOp::AnyOf => {
            for k in kinds {
                expect(&name, "boolean", *k, |k| k == ValueKind::Boolean)?;
            }
            Ok(())
        }
    }
}
