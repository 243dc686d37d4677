//! Reference evaluation of expression trees over a single row.
//!
//! Every node is given the meaning its rendered SQL has in a database with
//! SQL's three-valued logic: NULL in, NULL out, except where an operator
//! neutralises NULL. This makes the evaluator the oracle for checking that an
//! emulated tree agrees with the native one.
//!
//! Aggregates and window functions need a row set and are rejected.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::trace;

use crate::ast::builders::Typed;
use crate::ast::builders::family::Family;
use crate::ast::{
    BinaryOp, ColumnRef, DatePart, DateRepeat, Expr, NaryOp, Point, Polygon, TimeUnit, UnaryOp,
    Value, ValueKind,
};
use crate::error::{ExprError, ExprResult};

/// Column values of the row being evaluated and the clock reading used for
/// current date/time leaves.
#[derive(Debug, Clone)]
pub struct EvalContext {
    row: BTreeMap<String, Value>,
    now: DateTime<Utc>,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalContext {
    /// An empty row read at the current time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// An empty row with a fixed clock.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            row: BTreeMap::new(),
            now,
        }
    }

    /// Bind a column. Qualified columns are bound as `table.name`.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.row.insert(column.into(), value.into());
        self
    }

    /// Value bound to a column, trying the qualified name first.
    pub fn get(&self, column: &ColumnRef) -> Option<&Value> {
        self.row
            .get(&column.to_string())
            .or_else(|| self.row.get(&column.name))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

impl Expr {
    /// Evaluate against one row.
    pub fn evaluate(&self, ctx: &EvalContext) -> ExprResult<Value> {
        trace!(columns = ctx.row.len(), "evaluating expression");
        Evaluator { ctx }.eval(self)
    }
}

impl<K: Family> Typed<K> {
    pub fn evaluate(&self, ctx: &EvalContext) -> ExprResult<Value> {
        self.expr().evaluate(ctx)
    }
}

/// SQL comparison of two values. `None` when either is NULL or the values
/// cannot be compared. A boolean against a number compares as 1 or 0, the
/// way a BIT or NUMBER(1) column stores it.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Bool(x), _) if Num::from_value(b).is_some() => {
            compare(&Value::Int(i64::from(*x)), b)
        }
        (_, Value::Bool(y)) if Num::from_value(a).is_some() => {
            compare(a, &Value::Int(i64::from(*y)))
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Repeat(x), Value::Repeat(y)) => (x == y).then_some(Ordering::Equal),
        (Value::Point(x), Value::Point(y)) => (x == y).then_some(Ordering::Equal),
        (Value::Polygon(x), Value::Polygon(y)) => (x == y).then_some(Ordering::Equal),
        _ => {
            if let (Some(x), Some(y)) = (Num::from_value(a), Num::from_value(b)) {
                return x.compare(y);
            }
            if let (Some(x), Some(y)) = (Moment::from_value(a), Moment::from_value(b)) {
                return Some(x.naive().cmp(&y.naive()));
            }
            None
        }
    }
}

fn equals(a: &Value, b: &Value) -> bool {
    compare(a, b) == Some(Ordering::Equal)
}

fn mismatch(operation: impl std::fmt::Debug, expected: &str, found: &Value) -> ExprError {
    ExprError::incompatible(format!("{:?}", operation), expected, found.kind())
}

fn overflow(operation: impl std::fmt::Debug) -> ExprError {
    ExprError::evaluation(format!("{:?} overflowed", operation))
}

fn division_by_zero() -> ExprError {
    ExprError::evaluation("division by zero")
}

/// Numeric operand, keeping integers and exact decimals exact.
#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Exact(Decimal),
    Float(f64),
}

impl Num {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(n) => Some(Num::Int(*n)),
            Value::Decimal(d) => Some(Num::Exact(*d)),
            Value::Float(f) => Some(Num::Float(*f)),
            _ => None,
        }
    }

    fn of(value: &Value, operation: impl std::fmt::Debug) -> ExprResult<Self> {
        Self::from_value(value).ok_or_else(|| mismatch(operation, "numeric value", value))
    }

    fn exact(self) -> Option<Decimal> {
        match self {
            Num::Int(n) => Some(Decimal::from(n)),
            Num::Exact(d) => Some(d),
            Num::Float(_) => None,
        }
    }

    fn float(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Exact(d) => d.to_f64().unwrap_or(f64::NAN),
            Num::Float(f) => f,
        }
    }

    /// Truncated toward zero.
    fn truncated(self) -> Option<i64> {
        match self {
            Num::Int(n) => Some(n),
            Num::Exact(d) => d.trunc().to_i64(),
            Num::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Num::Float(_) => None,
        }
    }

    fn compare(self, other: Num) -> Option<Ordering> {
        match (self, other) {
            (Num::Int(x), Num::Int(y)) => Some(x.cmp(&y)),
            _ => match (self.exact(), other.exact()) {
                (Some(x), Some(y)) => Some(x.cmp(&y)),
                _ => self.float().partial_cmp(&other.float()),
            },
        }
    }

    fn signum(self) -> i64 {
        match self.compare(Num::Int(0)) {
            Some(Ordering::Greater) => 1,
            Some(Ordering::Less) => -1,
            _ => 0,
        }
    }
}

fn float_value(f: f64, operation: impl std::fmt::Debug) -> ExprResult<Value> {
    if f.is_finite() {
        Ok(Value::Float(f))
    } else {
        Err(overflow(operation))
    }
}

fn arithmetic(op: BinaryOp, a: Num, b: Num) -> ExprResult<Value> {
    if let (Num::Int(x), Num::Int(y)) = (a, b) {
        if op != BinaryOp::Div {
            return integer_arithmetic(op, x, y);
        }
    }
    match (a.exact(), b.exact()) {
        (Some(x), Some(y)) => exact_arithmetic(op, x, y),
        _ => float_arithmetic(op, a.float(), b.float()),
    }
}

fn integer_arithmetic(op: BinaryOp, x: i64, y: i64) -> ExprResult<Value> {
    if matches!(op, BinaryOp::IntDiv | BinaryOp::Rem) && y == 0 {
        return Err(division_by_zero());
    }
    let result = match op {
        BinaryOp::Add => x.checked_add(y),
        BinaryOp::Sub => x.checked_sub(y),
        BinaryOp::Mul => x.checked_mul(y),
        BinaryOp::IntDiv => x.checked_div(y),
        BinaryOp::Rem => x.checked_rem(y),
        _ => return Err(ExprError::evaluation(format!("{:?} is not arithmetic", op))),
    };
    result.map(Value::Int).ok_or_else(|| overflow(op))
}

fn exact_arithmetic(op: BinaryOp, x: Decimal, y: Decimal) -> ExprResult<Value> {
    if matches!(op, BinaryOp::Div | BinaryOp::IntDiv | BinaryOp::Rem) && y.is_zero() {
        return Err(division_by_zero());
    }
    let result = match op {
        BinaryOp::Add => x.checked_add(y),
        BinaryOp::Sub => x.checked_sub(y),
        BinaryOp::Mul => x.checked_mul(y),
        BinaryOp::Div => x.checked_div(y),
        BinaryOp::Rem => x.checked_rem(y),
        BinaryOp::IntDiv => {
            return x
                .checked_div(y)
                .and_then(|q| q.trunc().to_i64())
                .map(Value::Int)
                .ok_or_else(|| overflow(op));
        }
        _ => return Err(ExprError::evaluation(format!("{:?} is not arithmetic", op))),
    };
    result
        .map(|d| Value::Decimal(d.normalize()))
        .ok_or_else(|| overflow(op))
}

fn float_arithmetic(op: BinaryOp, x: f64, y: f64) -> ExprResult<Value> {
    if matches!(op, BinaryOp::Div | BinaryOp::IntDiv | BinaryOp::Rem) && y == 0.0 {
        return Err(division_by_zero());
    }
    match op {
        BinaryOp::Add => float_value(x + y, op),
        BinaryOp::Sub => float_value(x - y, op),
        BinaryOp::Mul => float_value(x * y, op),
        BinaryOp::Div => float_value(x / y, op),
        BinaryOp::Rem => float_value(x % y, op),
        BinaryOp::IntDiv => Num::Float(x / y)
            .truncated()
            .map(Value::Int)
            .ok_or_else(|| overflow(op)),
        _ => Err(ExprError::evaluation(format!("{:?} is not arithmetic", op))),
    }
}

/// A Date, local DateTime or UTC Instant, handled through its naive
/// date-time and rebuilt in the same family.
#[derive(Debug, Clone, Copy)]
enum Moment {
    Date(NaiveDate),
    Local(NaiveDateTime),
    Utc(DateTime<Utc>),
}

impl Moment {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Date(d) => Some(Moment::Date(*d)),
            Value::DateTime(dt) => Some(Moment::Local(*dt)),
            Value::Instant(t) => Some(Moment::Utc(*t)),
            _ => None,
        }
    }

    fn of(value: &Value, operation: impl std::fmt::Debug) -> ExprResult<Self> {
        Self::from_value(value).ok_or_else(|| mismatch(operation, "temporal value", value))
    }

    fn naive(self) -> NaiveDateTime {
        match self {
            Moment::Date(d) => d.and_time(NaiveTime::MIN),
            Moment::Local(dt) => dt,
            Moment::Utc(t) => t.naive_utc(),
        }
    }

    fn rebuild(self, dt: NaiveDateTime) -> Value {
        match self {
            Moment::Date(_) => Value::Date(dt.date()),
            Moment::Local(_) => Value::DateTime(dt),
            Moment::Utc(_) => Value::Instant(dt.and_utc()),
        }
    }

    fn is_date(self) -> bool {
        matches!(self, Moment::Date(_))
    }

    fn extract(self, part: DatePart) -> Value {
        let dt = self.naive();
        match part {
            DatePart::Year => Value::Int(dt.year() as i64),
            DatePart::Month => Value::Int(dt.month() as i64),
            DatePart::Day => Value::Int(dt.day() as i64),
            DatePart::Hour => Value::Int(dt.hour() as i64),
            DatePart::Minute => Value::Int(dt.minute() as i64),
            DatePart::Second => Value::Int(dt.second() as i64),
            DatePart::Subsecond => {
                Value::Decimal(Decimal::new(dt.nanosecond() as i64, 9).normalize())
            }
            DatePart::Epoch => Value::Int(dt.and_utc().timestamp()),
        }
    }

    fn epoch(self) -> i64 {
        self.naive().and_utc().timestamp()
    }

    /// Whole seconds since midnight.
    fn time_of_day(self) -> i64 {
        self.naive().num_seconds_from_midnight() as i64
    }

    fn add(self, unit: TimeUnit, amount: Num) -> ExprResult<Value> {
        let op = BinaryOp::AddUnit(unit);
        let dt = self.naive();
        let shifted = match unit {
            TimeUnit::Year | TimeUnit::Month => {
                let n = amount.truncated().ok_or_else(|| overflow(op))?;
                let months = if unit == TimeUnit::Year {
                    n.checked_mul(12).ok_or_else(|| overflow(op))?
                } else {
                    n
                };
                shift_months(dt, months)
            }
            TimeUnit::Day | TimeUnit::Hour | TimeUnit::Minute => {
                let n = amount.truncated().ok_or_else(|| overflow(op))?;
                let delta = match unit {
                    TimeUnit::Day => TimeDelta::try_days(n),
                    TimeUnit::Hour => TimeDelta::try_hours(n),
                    _ => TimeDelta::try_minutes(n),
                };
                delta.and_then(|d| dt.checked_add_signed(d))
            }
            TimeUnit::Second => {
                nanoseconds(amount).and_then(|n| dt.checked_add_signed(TimeDelta::nanoseconds(n)))
            }
        };
        shifted.map(|dt| self.rebuild(dt)).ok_or_else(|| overflow(op))
    }
}

/// Calendar month shift, clamping the day to the end of the target month.
fn shift_months(dt: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        dt.checked_add_months(magnitude)
    } else {
        dt.checked_sub_months(magnitude)
    }
}

fn nanoseconds(seconds: Num) -> Option<i64> {
    match seconds {
        Num::Int(n) => n.checked_mul(1_000_000_000),
        Num::Exact(d) => d
            .checked_mul(Decimal::from(1_000_000_000))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64(),
        Num::Float(f) => {
            let n = (f * 1e9).round();
            n.is_finite().then_some(n as i64)
        }
    }
}

/// Whole `unit`s from `earlier` to `later`, truncated toward zero.
fn units_between(unit: TimeUnit, later: Moment, earlier: Moment) -> ExprResult<Value> {
    let op = BinaryOp::UnitsBetween(unit);
    let seconds = later
        .epoch()
        .checked_sub(earlier.epoch())
        .ok_or_else(|| overflow(op))?;
    let n = match unit {
        TimeUnit::Second => seconds,
        TimeUnit::Minute | TimeUnit::Hour | TimeUnit::Day => {
            seconds / unit.fixed_seconds().unwrap_or(1)
        }
        TimeUnit::Month => months_between(later, earlier),
        TimeUnit::Year => months_between(later, earlier) / 12,
    };
    Ok(Value::Int(n))
}

fn months_between(later: Moment, earlier: Moment) -> i64 {
    let (a, b) = (later.naive(), earlier.naive());
    let raw = (a.year() as i64 - b.year() as i64) * 12 + (a.month() as i64 - b.month() as i64);
    let key = |m: Moment| {
        let day = m.naive().day() as i64;
        if later.is_date() {
            day
        } else {
            day * 86_400 + m.time_of_day()
        }
    };
    let (later_key, earlier_key) = (key(later), key(earlier));
    if raw > 0 && later_key < earlier_key {
        raw - 1
    } else if raw < 0 && later_key > earlier_key {
        raw + 1
    } else {
        raw
    }
}

/// Component-wise difference `later - earlier`.
fn repeat_between(later: Moment, earlier: Moment) -> ExprResult<Value> {
    let (a, b) = (later.naive(), earlier.naive());
    let component = |x: u32, y: u32| x as i32 - y as i32;
    let exact_seconds = |dt: NaiveDateTime| {
        Decimal::from(dt.second()) + Decimal::new(dt.nanosecond() as i64, 9)
    };
    let repeat = DateRepeat::new(
        a.year() - b.year(),
        component(a.month(), b.month()),
        component(a.day(), b.day()),
        component(a.hour(), b.hour()),
        component(a.minute(), b.minute()),
        (exact_seconds(a) - exact_seconds(b)).normalize(),
    );
    Ok(Value::Repeat(repeat))
}

fn add_repeat(moment: Moment, repeat: &DateRepeat, subtract: bool) -> ExprResult<Value> {
    let repeat = if subtract {
        repeat.negated()
    } else {
        repeat.clone()
    };
    let units: &[TimeUnit] = if moment.is_date() {
        &TimeUnit::ALL[..3]
    } else {
        &TimeUnit::ALL
    };
    let mut value = moment.rebuild(moment.naive());
    for unit in units {
        let amount = repeat.component(*unit);
        if amount.is_zero() {
            continue;
        }
        let current = Moment::of(&value, BinaryOp::AddRepeat)?;
        value = current.add(*unit, Num::Exact(amount))?;
    }
    Ok(value)
}

fn repeat_of(value: &Value, operation: impl std::fmt::Debug) -> ExprResult<DateRepeat> {
    match value {
        Value::Repeat(r) => Ok(r.clone()),
        Value::String(s) => DateRepeat::from_str(s),
        other => Err(mismatch(operation, "date repeat", other)),
    }
}

fn point_of(value: &Value, operation: impl std::fmt::Debug) -> ExprResult<Point> {
    match value {
        Value::Point(p) => Ok(*p),
        Value::String(s) => Point::from_str(s),
        other => Err(mismatch(operation, "point", other)),
    }
}

fn text_of(value: &Value) -> String {
    value.to_text().unwrap_or_default()
}

/// SQL LIKE with `%` and `_` wildcards.
fn like(text: &[char], pattern: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('%', rest)) => (0..=text.len()).any(|i| like(&text[i..], rest)),
        Some(('_', rest)) => !text.is_empty() && like(&text[1..], rest),
        Some((c, rest)) => text.first() == Some(c) && like(&text[1..], rest),
    }
}

/// 1-based character position, 0 when absent.
fn position(haystack: &str, needle: &str) -> i64 {
    match haystack.find(needle) {
        Some(byte) => haystack[..byte].chars().count() as i64 + 1,
        None => 0,
    }
}

/// Characters `[start, start + length)` clipped to the string; a negative
/// length yields the empty string.
fn substring(text: &str, start: i64, length: i64) -> String {
    if length < 0 {
        return String::new();
    }
    let end = start.saturating_add(length);
    let from = start.max(1);
    if end <= from {
        return String::new();
    }
    text.chars()
        .skip((from - 1) as usize)
        .take((end - from) as usize)
        .collect()
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_date_time(text).map(|dt| dt.date()))
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn truth(value: &Value, operation: impl std::fmt::Debug) -> ExprResult<Option<bool>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        other => Err(mismatch(operation, "boolean", other)),
    }
}

fn from_truth(t: Option<bool>) -> Value {
    t.map(Value::Bool).unwrap_or(Value::Null)
}

struct Evaluator<'a> {
    ctx: &'a EvalContext,
}

impl Evaluator<'_> {
    fn eval(&self, expr: &Expr) -> ExprResult<Value> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Column(column) => self.ctx.get(&column.reference()).cloned().ok_or_else(|| {
                ExprError::evaluation(format!("no value bound for column {}", column.reference()))
            }),
            Expr::Current(kind) => match kind {
                ValueKind::Date => Ok(Value::Date(self.ctx.now.date_naive())),
                ValueKind::DateTime => Ok(Value::DateTime(self.ctx.now.naive_utc())),
                ValueKind::Instant => Ok(Value::Instant(self.ctx.now)),
                other => Err(ExprError::evaluation(format!(
                    "no current value of kind {}",
                    other
                ))),
            },
            Expr::Unary { op, operand } => self.unary(*op, operand),
            Expr::Binary { op, left, right } => self.binary(*op, left, right),
            Expr::Nary { op, args } => self.nary(*op, args),
            Expr::Case {
                branches,
                otherwise,
            } => {
                for (condition, value) in branches {
                    if truth(&self.eval(condition)?, "CASE")? == Some(true) {
                        return self.eval(value);
                    }
                }
                match otherwise {
                    Some(value) => self.eval(value),
                    None => Ok(Value::Null),
                }
            }
            Expr::Window(window) => Err(ExprError::evaluation(format!(
                "{} needs a row set",
                window.function.name()
            ))),
        }
    }

    fn unary(&self, op: UnaryOp, operand: &Expr) -> ExprResult<Value> {
        if let UnaryOp::Aggregate(f) = op {
            return Err(ExprError::evaluation(format!("{:?} needs a row set", f)));
        }
        let value = self.eval(operand)?;
        match op {
            UnaryOp::IsNull => return Ok(Value::Bool(value.is_null())),
            UnaryOp::IsNotNull => return Ok(Value::Bool(!value.is_null())),
            _ if value.is_null() => return Ok(Value::Null),
            _ => {}
        }
        match op {
            UnaryOp::Not => Ok(from_truth(truth(&value, op)?.map(|b| !b))),
            UnaryOp::Negate => match Num::of(&value, op)? {
                Num::Int(n) => n.checked_neg().map(Value::Int).ok_or_else(|| overflow(op)),
                Num::Exact(d) => Ok(Value::Decimal(-d)),
                Num::Float(f) => Ok(Value::Float(-f)),
            },
            UnaryOp::Abs => match Num::of(&value, op)? {
                Num::Int(n) => n.checked_abs().map(Value::Int).ok_or_else(|| overflow(op)),
                Num::Exact(d) => Ok(Value::Decimal(d.abs())),
                Num::Float(f) => Ok(Value::Float(f.abs())),
            },
            UnaryOp::Floor | UnaryOp::Ceil | UnaryOp::Round => match Num::of(&value, op)? {
                Num::Int(n) => Ok(Value::Int(n)),
                Num::Exact(d) => Ok(Value::Decimal(match op {
                    UnaryOp::Floor => d.floor(),
                    UnaryOp::Ceil => d.ceil(),
                    _ => d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
                })),
                Num::Float(f) => Ok(Value::Float(match op {
                    UnaryOp::Floor => f.floor(),
                    UnaryOp::Ceil => f.ceil(),
                    _ => f.round(),
                })),
            },
            UnaryOp::Sqrt => {
                let x = Num::of(&value, op)?.float();
                if x < 0.0 {
                    return Err(ExprError::evaluation("square root of a negative number"));
                }
                Ok(Value::Float(x.sqrt()))
            }
            UnaryOp::Sign => Ok(Value::Int(Num::of(&value, op)?.signum())),
            UnaryOp::ToText => Ok(Value::String(text_of(&value))),
            UnaryOp::ToInteger => to_integer(&value),
            UnaryOp::ToNumber => to_number(&value),
            UnaryOp::ToDate => match &value {
                Value::String(s) => parse_date(s)
                    .map(Value::Date)
                    .ok_or_else(|| ExprError::evaluation(format!("invalid date '{}'", s))),
                other => Ok(Value::Date(Moment::of(other, op)?.naive().date())),
            },
            UnaryOp::ToDateTime => match &value {
                Value::String(s) => parse_date_time(s)
                    .map(Value::DateTime)
                    .ok_or_else(|| ExprError::evaluation(format!("invalid date-time '{}'", s))),
                other => Ok(Value::DateTime(Moment::of(other, op)?.naive())),
            },
            UnaryOp::Upper => Ok(Value::String(text_of(&value).to_uppercase())),
            UnaryOp::Lower => Ok(Value::String(text_of(&value).to_lowercase())),
            UnaryOp::Trim => Ok(Value::String(text_of(&value).trim_matches(' ').to_string())),
            UnaryOp::LeftTrim => Ok(Value::String(
                text_of(&value).trim_start_matches(' ').to_string(),
            )),
            UnaryOp::RightTrim => Ok(Value::String(
                text_of(&value).trim_end_matches(' ').to_string(),
            )),
            UnaryOp::Length => Ok(Value::Int(text_of(&value).chars().count() as i64)),
            UnaryOp::Extract(part) => Ok(Moment::of(&value, op)?.extract(part)),
            UnaryOp::DayOfWeek => {
                let date = Moment::of(&value, op)?.naive().date();
                Ok(Value::Int(date.weekday().num_days_from_sunday() as i64 + 1))
            }
            UnaryOp::RepeatPart(unit) => {
                let repeat = repeat_of(&value, op)?;
                Ok(match unit {
                    TimeUnit::Second => Value::Decimal(repeat.seconds.normalize()),
                    _ => Value::Int(repeat.component(unit).to_i64().unwrap_or_default()),
                })
            }
            UnaryOp::PointX => Ok(Value::Float(point_of(&value, op)?.x)),
            UnaryOp::PointY => Ok(Value::Float(point_of(&value, op)?.y)),
            UnaryOp::AsText => Ok(Value::String(text_of(&value))),
            UnaryOp::BoundingBox => match &value {
                Value::Polygon(p) => Ok(Value::Polygon(p.bounding_box())),
                Value::String(s) if s.trim_start().starts_with("POLYGON") => {
                    Ok(Value::Polygon(Polygon::from_str(s)?.bounding_box()))
                }
                other => Ok(Value::Polygon(point_of(other, op)?.bounding_box())),
            },
            UnaryOp::IsNull | UnaryOp::IsNotNull | UnaryOp::Aggregate(_) => Ok(Value::Null),
        }
    }

    fn binary(&self, op: BinaryOp, left: &Expr, right: &Expr) -> ExprResult<Value> {
        let a = self.eval(left)?;
        let b = self.eval(right)?;
        match op {
            BinaryOp::And => {
                let (x, y) = (truth(&a, op)?, truth(&b, op)?);
                return Ok(from_truth(match (x, y) {
                    (Some(false), _) | (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                }));
            }
            BinaryOp::Or => {
                let (x, y) = (truth(&a, op)?, truth(&b, op)?);
                return Ok(from_truth(match (x, y) {
                    (Some(true), _) | (_, Some(true)) => Some(true),
                    (Some(false), Some(false)) => Some(false),
                    _ => None,
                }));
            }
            _ if a.is_null() || b.is_null() => return Ok(Value::Null),
            _ => {}
        }
        match op {
            BinaryOp::Eq => Ok(Value::Bool(equals(&a, &b))),
            BinaryOp::Ne => Ok(Value::Bool(!equals(&a, &b))),
            BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte => {
                let ordering = compare(&a, &b).ok_or_else(|| {
                    ExprError::evaluation(format!("cannot order {} and {}", a.kind(), b.kind()))
                })?;
                Ok(Value::Bool(match op {
                    BinaryOp::Lt => ordering == Ordering::Less,
                    BinaryOp::Lte => ordering != Ordering::Greater,
                    BinaryOp::Gt => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                }))
            }
            BinaryOp::Add
            | BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::IntDiv
            | BinaryOp::Rem => arithmetic(op, Num::of(&a, op)?, Num::of(&b, op)?),
            BinaryOp::Power => {
                let (x, y) = (Num::of(&a, op)?.float(), Num::of(&b, op)?.float());
                float_value(x.powf(y), op)
            }
            BinaryOp::Concat => Ok(Value::String(text_of(&a) + &text_of(&b))),
            BinaryOp::Like | BinaryOp::ILike => {
                let (mut text, mut pattern) = (text_of(&a), text_of(&b));
                if op == BinaryOp::ILike {
                    text = text.to_lowercase();
                    pattern = pattern.to_lowercase();
                }
                let text: Vec<char> = text.chars().collect();
                let pattern: Vec<char> = pattern.chars().collect();
                Ok(Value::Bool(like(&text, &pattern)))
            }
            BinaryOp::Position => Ok(Value::Int(position(&text_of(&a), &text_of(&b)))),
            BinaryOp::AddUnit(unit) => Moment::of(&a, op)?.add(unit, Num::of(&b, op)?),
            BinaryOp::UnitsBetween(unit) => {
                units_between(unit, Moment::of(&a, op)?, Moment::of(&b, op)?)
            }
            BinaryOp::RepeatBetween => repeat_between(Moment::of(&a, op)?, Moment::of(&b, op)?),
            BinaryOp::AddRepeat | BinaryOp::SubtractRepeat => add_repeat(
                Moment::of(&a, op)?,
                &repeat_of(&b, op)?,
                op == BinaryOp::SubtractRepeat,
            ),
            BinaryOp::MakePoint => Ok(Value::Point(Point::new(
                Num::of(&a, op)?.float(),
                Num::of(&b, op)?.float(),
            ))),
            BinaryOp::Distance => {
                let (p, q) = (point_of(&a, op)?, point_of(&b, op)?);
                Ok(Value::Float(p.distance_to(&q)))
            }
            BinaryOp::GeometryEquals => Ok(Value::Bool(match (&a, &b) {
                (Value::Point(_), Value::Point(_)) | (Value::Polygon(_), Value::Polygon(_)) => {
                    equals(&a, &b)
                }
                _ => text_of(&a) == text_of(&b),
            })),
            BinaryOp::And | BinaryOp::Or => Ok(Value::Null),
        }
    }

    fn nary(&self, op: NaryOp, args: &[Expr]) -> ExprResult<Value> {
        let values = args
            .iter()
            .map(|a| self.eval(a))
            .collect::<ExprResult<Vec<_>>>()?;
        match op {
            NaryOp::Coalesce => Ok(values
                .into_iter()
                .find(|v| !v.is_null())
                .unwrap_or(Value::Null)),
            NaryOp::AllOf => {
                let mut result = Some(true);
                for v in &values {
                    match truth(v, op)? {
                        Some(false) => return Ok(Value::Bool(false)),
                        None => result = None,
                        Some(true) => {}
                    }
                }
                Ok(from_truth(result))
            }
            NaryOp::AnyOf => {
                let mut result = Some(false);
                for v in &values {
                    match truth(v, op)? {
                        Some(true) => return Ok(Value::Bool(true)),
                        None => result = None,
                        Some(false) => {}
                    }
                }
                Ok(from_truth(result))
            }
            NaryOp::In | NaryOp::NotIn => {
                let Some((subject, list)) = values.split_first() else {
                    return Ok(Value::Bool(op == NaryOp::NotIn));
                };
                if list.is_empty() {
                    return Ok(Value::Bool(op == NaryOp::NotIn));
                }
                if subject.is_null() {
                    return Ok(Value::Null);
                }
                let found = list.iter().any(|v| equals(subject, v));
                let saw_null = list.iter().any(Value::is_null);
                let member = if found {
                    Some(true)
                } else if saw_null {
                    None
                } else {
                    Some(false)
                };
                Ok(from_truth(if op == NaryOp::NotIn {
                    member.map(|m| !m)
                } else {
                    member
                }))
            }
            _ if values.iter().any(Value::is_null) => Ok(Value::Null),
            NaryOp::Greatest | NaryOp::Least => {
                let mut best: Option<Value> = None;
                for v in values {
                    best = Some(match best {
                        None => v,
                        Some(current) => {
                            let ordering = compare(&v, &current).ok_or_else(|| {
                                ExprError::evaluation(format!(
                                    "cannot order {} and {}",
                                    v.kind(),
                                    current.kind()
                                ))
                            })?;
                            let replace = if op == NaryOp::Greatest {
                                ordering == Ordering::Greater
                            } else {
                                ordering == Ordering::Less
                            };
                            if replace { v } else { current }
                        }
                    });
                }
                Ok(best.unwrap_or(Value::Null))
            }
            NaryOp::Substring => match values.as_slice() {
                [text, start, length] => {
                    let start = Num::of(start, op)?.truncated().ok_or_else(|| overflow(op))?;
                    let length = Num::of(length, op)?.truncated().ok_or_else(|| overflow(op))?;
                    Ok(Value::String(substring(&text_of(text), start, length)))
                }
                _ => Err(ExprError::evaluation("SUBSTRING takes three arguments")),
            },
            NaryOp::Replace => match values.as_slice() {
                [text, from, to] => {
                    let (text, from) = (text_of(text), text_of(from));
                    if from.is_empty() {
                        Ok(Value::String(text))
                    } else {
                        Ok(Value::String(text.replace(&from, &text_of(to))))
                    }
                }
                _ => Err(ExprError::evaluation("REPLACE takes three arguments")),
            },
        }
    }
}

fn to_integer(value: &Value) -> ExprResult<Value> {
    let invalid = || ExprError::evaluation(format!("invalid integer {}", value));
    match value {
        Value::Bool(b) => Ok(Value::Int(*b as i64)),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<i64>() {
                return Ok(Value::Int(n));
            }
            Decimal::from_str(s)
                .ok()
                .and_then(|d| d.trunc().to_i64())
                .map(Value::Int)
                .ok_or_else(invalid)
        }
        other => Num::of(other, UnaryOp::ToInteger)?
            .truncated()
            .map(Value::Int)
            .ok_or_else(invalid),
    }
}

fn to_number(value: &Value) -> ExprResult<Value> {
    match value {
        Value::Bool(b) => Ok(Value::Decimal(Decimal::from(*b as i64))),
        Value::Int(n) => Ok(Value::Decimal(Decimal::from(*n))),
        Value::Decimal(_) | Value::Float(_) => Ok(value.clone()),
        Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .map(|d| Value::Decimal(d.normalize()))
                .or_else(|_| s.parse::<f64>().map(Value::Float))
                .map_err(|_| ExprError::evaluation(format!("invalid number '{}'", s)))
        }
        other => Err(mismatch(UnaryOp::ToNumber, "numeric text", other)),
    }
}
