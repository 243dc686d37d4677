//! Capability emulation.
//!
//! `lower` rewrites a tree so that every node left in it has native syntax
//! in the target dialect. A rewrite only produces nodes whose functions are
//! primitives or are themselves lowered again, so lowering terminates.
//!
//! Emulations preserve NULL propagation: each one yields NULL exactly when
//! the native function would.

use tracing::trace;

use crate::ast::repeat::{REPEAT_PREFIX, repeat_markers};
use crate::ast::spatial::{WKT_X_DELIMITERS, WKT_Y_DELIMITERS};
use crate::ast::{
    BinaryOp, DatePart, DateRepeat, Expr, NaryOp, OrderTerm, TimeUnit, UnaryOp, Value, ValueKind,
};
use crate::transpiler::functions::{Feature, Function, FunctionSyntax};
use crate::transpiler::traits::SqlGenerator;

/// How a dialect provides a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Native(FunctionSyntax),
    /// Decomposed into primitives the dialect does have.
    Emulated,
}

pub fn strategy(generator: &dyn SqlGenerator, function: Function) -> Strategy {
    match generator.function_syntax(function) {
        Some(syntax) => Strategy::Native(syntax),
        None => Strategy::Emulated,
    }
}

fn is_native(generator: &dyn SqlGenerator, function: Function) -> bool {
    matches!(strategy(generator, function), Strategy::Native(_))
}

/// Rewrite `expr` into nodes the dialect renders natively.
pub fn lower(expr: &Expr, generator: &dyn SqlGenerator) -> Expr {
    if expr.is_always_null()
        && !matches!(expr, Expr::Literal(_))
        && !expr.is_aggregator()
        && !expr.is_window_function()
    {
        trace!(dialect = generator.name(), "folding statically null expression");
        return Expr::null();
    }
    if let Some(rewritten) = rewrite(expr, generator) {
        return lower(&rewritten, generator);
    }
    match expr.map_children(&mut |child| lower(child, generator)) {
        Expr::Window(mut window) if !generator.supports(Feature::NullsOrdering) => {
            window.order = without_nulls_placement(&window.order, generator);
            Expr::Window(window)
        }
        other => other,
    }
}

/// Lower ORDER BY terms, expanding NULLS FIRST/LAST into a leading sort key
/// when the dialect has no native placement.
pub fn lower_order(terms: &[OrderTerm], generator: &dyn SqlGenerator) -> Vec<OrderTerm> {
    let lowered: Vec<OrderTerm> = terms
        .iter()
        .map(|t| OrderTerm::new(lower(&t.expr, generator), t.order))
        .collect();
    if generator.supports(Feature::NullsOrdering) {
        lowered
    } else {
        without_nulls_placement(&lowered, generator)
    }
}

fn without_nulls_placement(terms: &[OrderTerm], generator: &dyn SqlGenerator) -> Vec<OrderTerm> {
    let mut out = Vec::with_capacity(terms.len());
    for term in terms {
        match term.order.nulls_first() {
            Some(first) => {
                trace!(dialect = generator.name(), "emulating NULLS FIRST/LAST");
                let (null_key, value_key) = if first { (0, 1) } else { (1, 0) };
                let key = Expr::make_case(
                    vec![(un(UnaryOp::IsNull, term.expr.clone()), Expr::int(null_key))],
                    Some(Expr::int(value_key)),
                );
                out.push(OrderTerm::asc(key));
                out.push(OrderTerm::new(term.expr.clone(), term.order.direction_only()));
            }
            None => out.push(term.clone()),
        }
    }
    out
}

fn rewrite(expr: &Expr, generator: &dyn SqlGenerator) -> Option<Expr> {
    let rewritten = match expr {
        Expr::Unary { op, operand } => rewrite_unary(*op, operand, generator),
        Expr::Binary { op, left, right } => rewrite_binary(*op, left, right, generator),
        Expr::Nary {
            op: op @ (NaryOp::Greatest | NaryOp::Least),
            args,
        } => {
            let greatest = *op == NaryOp::Greatest;
            let function = if greatest {
                Function::Greatest
            } else {
                Function::Least
            };
            if is_native(generator, function) {
                None
            } else {
                extreme(args, greatest)
            }
        }
        _ => None,
    };
    if rewritten.is_some() {
        trace!(dialect = generator.name(), node = %node_name(expr), "emulating");
    }
    rewritten
}

fn node_name(expr: &Expr) -> String {
    match expr {
        Expr::Unary { op, .. } => format!("{:?}", op),
        Expr::Binary { op, .. } => format!("{:?}", op),
        Expr::Nary { op, .. } => format!("{:?}", op),
        _ => "expr".to_string(),
    }
}

fn rewrite_unary(op: UnaryOp, operand: &Expr, generator: &dyn SqlGenerator) -> Option<Expr> {
    let geometry = generator.supports(Feature::Geometry);
    match op {
        UnaryOp::Sign if !is_native(generator, Function::Sign) => Some(sign(operand)),
        UnaryOp::DayOfWeek if !is_native(generator, Function::DayOfWeek) => {
            Some(day_of_week(operand))
        }
        UnaryOp::RepeatPart(unit) if !is_native(generator, Function::interval_part(unit)) => {
            Some(match operand {
                Expr::Literal(Value::Repeat(repeat)) => component(repeat, unit),
                _ => repeat_part(operand, unit),
            })
        }
        UnaryOp::PointX if !geometry => Some(coordinate(operand, WKT_X_DELIMITERS)),
        UnaryOp::PointY if !geometry => Some(coordinate(operand, WKT_Y_DELIMITERS)),
        UnaryOp::BoundingBox if !geometry => Some(point_envelope(operand)),
        // WKT is already the text form
        UnaryOp::AsText if !geometry => Some(operand.clone()),
        _ => None,
    }
}

fn rewrite_binary(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    generator: &dyn SqlGenerator,
) -> Option<Expr> {
    let geometry = generator.supports(Feature::Geometry);
    match op {
        BinaryOp::ILike if !generator.supports(Feature::CaseInsensitiveLike) => Some(bin(
            BinaryOp::Like,
            un(UnaryOp::Lower, left.clone()),
            un(UnaryOp::Lower, right.clone()),
        )),
        BinaryOp::Eq | BinaryOp::Ne => match operand_kind(left, right) {
            ValueKind::Boolean
                if !generator.supports(Feature::BooleanValues)
                    && (is_boolean_condition(left) || is_boolean_condition(right)) =>
            {
                Some(bin(op, boolean_value(left), boolean_value(right)))
            }
            ValueKind::Point | ValueKind::Polygon if geometry => {
                let equal = bin(BinaryOp::GeometryEquals, left.clone(), right.clone());
                Some(if op == BinaryOp::Ne {
                    un(UnaryOp::Not, equal)
                } else {
                    equal
                })
            }
            ValueKind::Point => Some(point_equality(op, left, right)),
            _ => None,
        },
        BinaryOp::GeometryEquals if !geometry => match operand_kind(left, right) {
            ValueKind::Point => Some(point_equality(BinaryOp::Eq, left, right)),
            _ => Some(bin(BinaryOp::Eq, left.clone(), right.clone())),
        },
        BinaryOp::MakePoint if !geometry => Some(concat_all(vec![
            Expr::text("POINT("),
            un(UnaryOp::ToText, left.clone()),
            Expr::text(" "),
            un(UnaryOp::ToText, right.clone()),
            Expr::text(")"),
        ])),
        BinaryOp::Distance if !geometry => Some(distance(left, right)),
        BinaryOp::UnitsBetween(unit) if !is_native(generator, Function::units_between(unit)) => {
            Some(units_between(unit, left, right))
        }
        BinaryOp::RepeatBetween if !is_native(generator, Function::IntervalBetween) => {
            Some(repeat_between(left, right))
        }
        BinaryOp::AddRepeat | BinaryOp::SubtractRepeat => {
            let subtract = op == BinaryOp::SubtractRepeat;
            let function = if subtract {
                Function::IntervalSubtract
            } else {
                Function::IntervalAdd
            };
            if left.kind() == ValueKind::Date || !is_native(generator, function) {
                Some(add_repeat(left, right, subtract))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::make_binary(op, left, right)
}

fn un(op: UnaryOp, operand: Expr) -> Expr {
    Expr::make_unary(op, operand)
}

fn extract(part: DatePart, value: &Expr) -> Expr {
    un(UnaryOp::Extract(part), value.clone())
}

fn scaled(value: Expr, factor: i64) -> Expr {
    bin(BinaryOp::Mul, value, Expr::int(factor))
}

/// Left-nested `||` chain; the renderer flattens it.
fn concat_all(parts: Vec<Expr>) -> Expr {
    let mut parts = parts.into_iter();
    let first = parts.next().unwrap_or_else(|| Expr::text(""));
    parts.fold(first, |acc, part| bin(BinaryOp::Concat, acc, part))
}

fn operand_kind(left: &Expr, right: &Expr) -> ValueKind {
    match left.kind() {
        ValueKind::Null => right.kind(),
        kind => kind,
    }
}

fn sign(x: &Expr) -> Expr {
    Expr::make_case(
        vec![
            (bin(BinaryOp::Gt, x.clone(), Expr::int(0)), Expr::int(1)),
            (bin(BinaryOp::Lt, x.clone(), Expr::int(0)), Expr::int(-1)),
            (bin(BinaryOp::Eq, x.clone(), Expr::int(0)), Expr::int(0)),
        ],
        None,
    )
}

/// Seconds since midnight, whole seconds only.
fn time_of_day(value: &Expr) -> Expr {
    bin(
        BinaryOp::Add,
        bin(
            BinaryOp::Add,
            scaled(extract(DatePart::Hour, value), 3600),
            scaled(extract(DatePart::Minute, value), 60),
        ),
        extract(DatePart::Second, value),
    )
}

/// 1 (Sunday) through 7 (Saturday) from days since 1970-01-01, a Thursday.
fn day_of_week(value: &Expr) -> Expr {
    let epoch = extract(DatePart::Epoch, value);
    let midnight = if value.kind() == ValueKind::Date {
        epoch
    } else {
        bin(BinaryOp::Sub, epoch, time_of_day(value))
    };
    let days = bin(BinaryOp::IntDiv, midnight, Expr::int(86_400));
    let shifted = bin(
        BinaryOp::Add,
        bin(BinaryOp::Rem, days, Expr::int(7)),
        Expr::int(11),
    );
    bin(
        BinaryOp::Add,
        bin(BinaryOp::Rem, shifted, Expr::int(7)),
        Expr::int(1),
    )
}

fn units_between(unit: TimeUnit, later: &Expr, earlier: &Expr) -> Expr {
    let seconds = || {
        bin(
            BinaryOp::Sub,
            extract(DatePart::Epoch, later),
            extract(DatePart::Epoch, earlier),
        )
    };
    match unit {
        TimeUnit::Second => seconds(),
        TimeUnit::Minute | TimeUnit::Hour | TimeUnit::Day => bin(
            BinaryOp::IntDiv,
            seconds(),
            Expr::int(unit.fixed_seconds().unwrap_or(1)),
        ),
        TimeUnit::Month => months_between(later, earlier),
        TimeUnit::Year => bin(
            BinaryOp::IntDiv,
            months_between(later, earlier),
            Expr::int(12),
        ),
    }
}

/// Calendar months between two values, minus one when the day and time of
/// the later value have not yet reached those of the earlier one.
fn months_between(later: &Expr, earlier: &Expr) -> Expr {
    let raw = bin(
        BinaryOp::Add,
        scaled(
            bin(
                BinaryOp::Sub,
                extract(DatePart::Year, later),
                extract(DatePart::Year, earlier),
            ),
            12,
        ),
        bin(
            BinaryOp::Sub,
            extract(DatePart::Month, later),
            extract(DatePart::Month, earlier),
        ),
    );
    let date_only = later.kind() == ValueKind::Date;
    let key = |value: &Expr| {
        if date_only {
            extract(DatePart::Day, value)
        } else {
            bin(
                BinaryOp::Add,
                scaled(extract(DatePart::Day, value), 86_400),
                time_of_day(value),
            )
        }
    };
    let (later_key, earlier_key) = (key(later), key(earlier));
    Expr::make_case(
        vec![
            (
                bin(
                    BinaryOp::And,
                    bin(BinaryOp::Gt, raw.clone(), Expr::int(0)),
                    bin(BinaryOp::Lt, later_key.clone(), earlier_key.clone()),
                ),
                bin(BinaryOp::Sub, raw.clone(), Expr::int(1)),
            ),
            (
                bin(
                    BinaryOp::And,
                    bin(BinaryOp::Lt, raw.clone(), Expr::int(0)),
                    bin(BinaryOp::Gt, later_key, earlier_key),
                ),
                bin(BinaryOp::Add, raw.clone(), Expr::int(1)),
            ),
        ],
        Some(raw),
    )
}

const CALENDAR_UNITS: [TimeUnit; 3] = [TimeUnit::Year, TimeUnit::Month, TimeUnit::Day];

fn units_for(value: &Expr) -> &'static [TimeUnit] {
    if value.kind() == ValueKind::Date {
        &CALENDAR_UNITS
    } else {
        &TimeUnit::ALL
    }
}

/// Component-wise difference as a DateRepeat token string.
fn repeat_between(later: &Expr, earlier: &Expr) -> Expr {
    let date_only = later.kind() == ValueKind::Date;
    let mut parts = vec![Expr::text(REPEAT_PREFIX)];
    for unit in units_for(later) {
        let delta = match unit {
            TimeUnit::Second => {
                let exact = |v: &Expr| {
                    bin(
                        BinaryOp::Add,
                        extract(DatePart::Second, v),
                        extract(DatePart::Subsecond, v),
                    )
                };
                bin(BinaryOp::Sub, exact(later), exact(earlier))
            }
            _ => bin(
                BinaryOp::Sub,
                extract(unit.part(), later),
                extract(unit.part(), earlier),
            ),
        };
        let (_, close) = repeat_markers(*unit);
        let close = if date_only && *unit == TimeUnit::Day {
            "D0h0n0s"
        } else {
            close
        };
        parts.push(un(UnaryOp::ToText, delta));
        parts.push(Expr::text(close));
    }
    let token = concat_all(parts);
    if later.is_nullable() || earlier.is_nullable() {
        let either_null = bin(
            BinaryOp::Or,
            un(UnaryOp::IsNull, later.clone()),
            un(UnaryOp::IsNull, earlier.clone()),
        );
        Expr::make_case(vec![(either_null, Expr::null())], Some(token))
    } else {
        token
    }
}

/// Component of a literal repeat.
fn component(repeat: &DateRepeat, unit: TimeUnit) -> Expr {
    match unit {
        TimeUnit::Year => Expr::int(repeat.years as i64),
        TimeUnit::Month => Expr::int(repeat.months as i64),
        TimeUnit::Day => Expr::int(repeat.days as i64),
        TimeUnit::Hour => Expr::int(repeat.hours as i64),
        TimeUnit::Minute => Expr::int(repeat.minutes as i64),
        TimeUnit::Second => Expr::Literal(Value::Decimal(repeat.seconds)),
    }
}

/// Text strictly between the first `open` and the first `close` marker.
fn between_markers(text: &Expr, open: &str, close: &str) -> Expr {
    let open_at = bin(BinaryOp::Position, text.clone(), Expr::text(open));
    let close_at = bin(BinaryOp::Position, text.clone(), Expr::text(close));
    let start = bin(BinaryOp::Add, open_at.clone(), Expr::int(1));
    let length = bin(
        BinaryOp::Sub,
        bin(BinaryOp::Sub, close_at, open_at),
        Expr::int(1),
    );
    Expr::make_nary(NaryOp::Substring, vec![text.clone(), start, length])
}

/// Component of a repeat carried as a token string.
fn repeat_part(token: &Expr, unit: TimeUnit) -> Expr {
    let (open, close) = repeat_markers(unit);
    let cast = if unit == TimeUnit::Second {
        UnaryOp::ToNumber
    } else {
        UnaryOp::ToInteger
    };
    un(cast, between_markers(token, open, close))
}

/// Repeat addition as chained unit additions, largest unit first. Dates only
/// take the calendar components.
fn add_repeat(value: &Expr, repeat: &Expr, subtract: bool) -> Expr {
    let units = units_for(value);
    match repeat {
        Expr::Literal(Value::Repeat(r)) => {
            let r = if subtract { r.negated() } else { r.clone() };
            units
                .iter()
                .filter(|unit| !r.component(**unit).is_zero())
                .fold(value.clone(), |acc, unit| {
                    bin(BinaryOp::AddUnit(*unit), acc, component(&r, *unit))
                })
        }
        _ => units.iter().fold(value.clone(), |acc, unit| {
            let part = un(UnaryOp::RepeatPart(*unit), repeat.clone());
            let amount = if subtract {
                un(UnaryOp::Negate, part)
            } else {
                part
            };
            bin(BinaryOp::AddUnit(*unit), acc, amount)
        }),
    }
}

/// NULL guard, then one branch per argument that beats every other one.
/// Only leaf arguments are repeated, so the tree grows with the square of
/// the argument count.
fn extreme(args: &[Expr], greatest: bool) -> Option<Expr> {
    let beats = if greatest { BinaryOp::Gte } else { BinaryOp::Lte };
    let (last, rest) = args.split_last()?;
    if rest.is_empty() {
        return Some(last.clone());
    }
    let any_null = args
        .iter()
        .map(|arg| un(UnaryOp::IsNull, arg.clone()))
        .reduce(|acc, next| bin(BinaryOp::Or, acc, next))?;
    let mut branches = vec![(any_null, Expr::null())];
    for (i, candidate) in rest.iter().enumerate() {
        let wins = args
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, other)| bin(beats, candidate.clone(), other.clone()))
            .reduce(|acc, next| bin(BinaryOp::And, acc, next))?;
        branches.push((wins, candidate.clone()));
    }
    Some(Expr::make_case(branches, Some(last.clone())))
}

/// Integer 1/0 stand-in for a boolean operand. Stored values already are
/// 1/0 where booleans are not values; predicates go through CASE and NULL
/// stays NULL.
fn boolean_value(value: &Expr) -> Expr {
    match value {
        Expr::Literal(Value::Bool(b)) => Expr::int(*b as i64),
        _ if !is_predicate(value) => value.clone(),
        _ => Expr::make_case(
            vec![
                (value.clone(), Expr::int(1)),
                (un(UnaryOp::Not, value.clone()), Expr::int(0)),
            ],
            None,
        ),
    }
}

/// TRUE/FALSE or a predicate: operands that are not a 1/0 value as written.
fn is_boolean_condition(expr: &Expr) -> bool {
    matches!(expr, Expr::Literal(Value::Bool(_))) || is_predicate(expr)
}

/// Whether the node is a condition rather than a stored value.
fn is_predicate(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(_) | Expr::Column(_) | Expr::Current(_) | Expr::Window(_) => false,
        Expr::Case { .. } => false,
        Expr::Nary { op, .. } => !matches!(op, NaryOp::Coalesce | NaryOp::Greatest | NaryOp::Least),
        Expr::Unary { op, .. } => !matches!(op, UnaryOp::Aggregate(_)),
        Expr::Binary { .. } => true,
    }
}

fn point_equality(op: BinaryOp, left: &Expr, right: &Expr) -> Expr {
    let axis = |axis: UnaryOp| bin(op, un(axis, left.clone()), un(axis, right.clone()));
    let joiner = if op == BinaryOp::Ne {
        BinaryOp::Or
    } else {
        BinaryOp::And
    };
    bin(joiner, axis(UnaryOp::PointX), axis(UnaryOp::PointY))
}

fn coordinate(point: &Expr, (open, close): (&str, &str)) -> Expr {
    un(UnaryOp::ToNumber, between_markers(point, open, close))
}

fn distance(a: &Expr, b: &Expr) -> Expr {
    let squared = |axis: UnaryOp| {
        let delta = bin(BinaryOp::Sub, un(axis, b.clone()), un(axis, a.clone()));
        bin(BinaryOp::Mul, delta.clone(), delta)
    };
    un(
        UnaryOp::Sqrt,
        bin(
            BinaryOp::Add,
            squared(UnaryOp::PointX),
            squared(UnaryOp::PointY),
        ),
    )
}

/// Envelope of a point: the point repeated around a closed ring.
fn point_envelope(point: &Expr) -> Expr {
    let corner = between_markers(point, "(", ")");
    let mut parts = vec![Expr::text("POLYGON((")];
    for i in 0..5 {
        if i > 0 {
            parts.push(Expr::text(", "));
        }
        parts.push(corner.clone());
    }
    parts.push(Expr::text("))"));
    concat_all(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpiler::Dialect;

    #[test]
    fn test_strategy() {
        let pg = Dialect::Postgres.generator();
        assert_eq!(
            strategy(pg, Function::Sign),
            Strategy::Native(FunctionSyntax::name("SIGN"))
        );
        assert_eq!(strategy(pg, Function::Greatest), Strategy::Emulated);
        assert_eq!(
            strategy(Dialect::Ansi.generator(), Function::IntervalAdd),
            Strategy::Emulated
        );
    }

    #[test]
    fn test_lowering_is_idempotent() {
        let ansi = Dialect::Ansi.generator();
        let x = Expr::column("x", ValueKind::Number);
        let e = un(UnaryOp::Sign, x);
        let once = lower(&e, ansi);
        assert_eq!(lower(&once, ansi), once);
    }

    #[test]
    fn test_null_operands_fold() {
        let ansi = Dialect::Ansi.generator();
        let e = bin(BinaryOp::Add, Expr::column("x", ValueKind::Integer), Expr::null());
        assert_eq!(lower(&e, ansi), Expr::null());
        let count = un(
            UnaryOp::Aggregate(crate::ast::AggregateFunc::Count),
            Expr::null(),
        );
        assert_eq!(lower(&count, ansi), count);
    }

    #[test]
    fn test_literal_repeat_addition_skips_zero_components() {
        let ansi = Dialect::Ansi.generator();
        let d = Expr::column("d", ValueKind::DateTime);
        let r = Expr::Literal(Value::Repeat(DateRepeat::new(
            0,
            1,
            0,
            2,
            0,
            rust_decimal::Decimal::ZERO,
        )));
        let lowered = lower(&bin(BinaryOp::AddRepeat, d.clone(), r), ansi);
        let expected = bin(
            BinaryOp::AddUnit(TimeUnit::Hour),
            bin(BinaryOp::AddUnit(TimeUnit::Month), d, Expr::int(1)),
            Expr::int(2),
        );
        assert_eq!(lowered, expected);
    }
}
