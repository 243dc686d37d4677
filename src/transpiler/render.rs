//! Precedence-aware SQL printing of lowered expression trees.

use crate::ast::{
    AggregateFunc, BinaryOp, Expr, NaryOp, OrderTerm, UnaryOp, Value, ValueKind, WindowExpr,
    WindowFunction,
};
use crate::transpiler::emulate::{lower, lower_order};
use crate::transpiler::functions::{Feature, Function, FunctionSyntax};
use crate::transpiler::traits::SqlGenerator;

// Binding strength, loosest first.
const OR: u8 = 1;
const AND: u8 = 2;
const NOT: u8 = 3;
const COMPARISON: u8 = 4;
const ADDITIVE: u8 = 5;
const MULTIPLICATIVE: u8 = 6;
const PREFIX: u8 = 7;
const ATOM: u8 = 9;

/// Render an expression for `generator`, emulating whatever it lacks.
pub fn render(expr: &Expr, generator: &dyn SqlGenerator) -> String {
    let lowered = lower(expr, generator);
    Renderer { generator }.node(&lowered).sql
}

/// Render ORDER BY terms joined with commas.
pub fn render_order(terms: &[OrderTerm], generator: &dyn SqlGenerator) -> String {
    let renderer = Renderer { generator };
    renderer.order_terms(&lower_order(terms, generator))
}

/// Rendered SQL and how tightly its outermost operator binds.
struct Fragment {
    sql: String,
    precedence: u8,
}

impl Fragment {
    fn new(sql: String, precedence: u8) -> Self {
        Self { sql, precedence }
    }

    fn atom(sql: String) -> Self {
        Self::new(sql, ATOM)
    }

    fn parenthesized(self) -> String {
        format!("({})", self.sql)
    }

    /// Parenthesize when binding looser than `min`.
    fn at_least(self, min: u8) -> String {
        if self.precedence < min {
            self.parenthesized()
        } else {
            self.sql
        }
    }

    /// Parenthesize unless binding strictly tighter than `min`.
    fn above(self, min: u8) -> String {
        if self.precedence <= min {
            self.parenthesized()
        } else {
            self.sql
        }
    }
}

struct Renderer<'a> {
    generator: &'a dyn SqlGenerator,
}

impl Renderer<'_> {
    fn node(&self, expr: &Expr) -> Fragment {
        match expr {
            Expr::Literal(value) => self.literal(value),
            Expr::Column(column) => {
                let name = self.generator.quote_identifier(&column.name);
                match &column.table {
                    Some(table) => Fragment::atom(format!(
                        "{}.{}",
                        self.generator.quote_identifier(table),
                        name
                    )),
                    None => Fragment::atom(name),
                }
            }
            Expr::Current(kind) => self.current(*kind),
            Expr::Unary { op, operand } => self.unary(*op, operand),
            Expr::Binary { op, left, right } => {
                let rendered = self.binary(*op, left, right);
                let widens = matches!(
                    op,
                    BinaryOp::AddUnit(_) | BinaryOp::AddRepeat | BinaryOp::SubtractRepeat
                ) && left.kind() == ValueKind::Date
                    && self.generator.supports(Feature::DateArithmeticWidens);
                if widens {
                    self.apply(Function::ToDate, vec![rendered])
                } else {
                    rendered
                }
            }
            Expr::Nary { op, args } => self.nary(*op, args),
            Expr::Case {
                branches,
                otherwise,
            } => {
                let mut sql = String::from("CASE");
                for (cond, value) in branches {
                    sql.push_str(" WHEN ");
                    sql.push_str(&self.node(cond).sql);
                    sql.push_str(" THEN ");
                    sql.push_str(&self.node(value).sql);
                }
                if let Some(other) = otherwise {
                    sql.push_str(" ELSE ");
                    sql.push_str(&self.node(other).sql);
                }
                sql.push_str(" END");
                Fragment::atom(sql)
            }
            Expr::Window(window) => self.window(window),
        }
    }

    /// Render a function call with already-rendered arguments.
    fn apply(&self, function: Function, args: Vec<Fragment>) -> Fragment {
        let syntax = self
            .generator
            .function_syntax(function)
            .unwrap_or_else(|| FunctionSyntax::name(function.name().to_uppercase()));
        let args: Vec<String> = if syntax.is_template() {
            args.into_iter().map(|a| a.at_least(ATOM)).collect()
        } else {
            args.into_iter().map(|a| a.sql).collect()
        };
        Fragment::atom(syntax.apply(&args))
    }

    fn call(&self, function: Function, args: &[&Expr]) -> Fragment {
        let args = args.iter().map(|a| self.node(a)).collect();
        self.apply(function, args)
    }

    fn literal(&self, value: &Value) -> Fragment {
        let quoted = |s: String| Fragment::atom(self.generator.string_literal(&s));
        match value {
            Value::Null => Fragment::atom(self.generator.null_literal()),
            Value::Bool(b) => Fragment::atom(self.generator.bool_literal(*b)),
            Value::Int(n) => signed(n.to_string(), *n < 0),
            Value::Float(n) => signed(n.to_string(), *n < 0.0),
            Value::Decimal(d) => signed(d.to_string(), d.is_sign_negative() && !d.is_zero()),
            Value::String(s) => quoted(s.clone()),
            Value::Date(d) => {
                let text = quoted(d.format("%Y-%m-%d").to_string());
                self.apply(Function::DateLiteral, vec![text])
            }
            Value::DateTime(dt) => {
                let text = quoted(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string());
                self.apply(Function::DateTimeLiteral, vec![text])
            }
            Value::Instant(dt) => {
                let text = quoted(dt.format("%Y-%m-%d %H:%M:%S%.f+00:00").to_string());
                self.apply(Function::InstantLiteral, vec![text])
            }
            Value::Repeat(r) => {
                if self.generator.supports(Feature::IntervalType) {
                    self.apply(Function::IntervalLiteral, vec![quoted(r.to_interval_text())])
                } else {
                    quoted(r.to_string())
                }
            }
            Value::Point(_) | Value::Polygon(_) => {
                let wkt = value.to_text().unwrap_or_default();
                if self.generator.supports(Feature::Geometry) {
                    self.apply(Function::GeometryFromText, vec![quoted(wkt)])
                } else {
                    quoted(wkt)
                }
            }
        }
    }

    fn current(&self, kind: ValueKind) -> Fragment {
        match kind {
            ValueKind::Date => self.apply(Function::CurrentDate, Vec::new()),
            ValueKind::DateTime => {
                let now = self.apply(Function::CurrentDateTime, Vec::new());
                let adjustment = self
                    .generator
                    .timezone_adjustment()
                    .filter(|_| self.generator.supports(Feature::TimezoneAdjustedNow));
                match adjustment {
                    Some(wrapper) => Fragment::atom(wrapper.apply(&[now.sql])),
                    None => now,
                }
            }
            _ => self.apply(Function::CurrentInstant, Vec::new()),
        }
    }

    fn unary(&self, op: UnaryOp, operand: &Expr) -> Fragment {
        let function = match op {
            UnaryOp::Not => {
                let inner = self.node(operand).at_least(NOT);
                return Fragment::new(format!("NOT {}", inner), NOT);
            }
            UnaryOp::Negate => {
                let inner = self.node(operand).above(PREFIX);
                return Fragment::new(format!("-{}", inner), PREFIX);
            }
            UnaryOp::IsNull | UnaryOp::IsNotNull => {
                let inner = self.node(operand).above(COMPARISON);
                let test = if op == UnaryOp::IsNull {
                    "IS NULL"
                } else {
                    "IS NOT NULL"
                };
                return Fragment::new(format!("{} {}", inner, test), COMPARISON);
            }
            UnaryOp::Aggregate(AggregateFunc::CountDistinct) => {
                let inner = self.node(operand).sql;
                let distinct = Fragment::atom(format!("DISTINCT {}", inner));
                return self.apply(Function::Count, vec![distinct]);
            }
            UnaryOp::Aggregate(f) => aggregate_function(f),
            UnaryOp::Abs => Function::Abs,
            UnaryOp::Sqrt => Function::Sqrt,
            UnaryOp::Floor => Function::Floor,
            UnaryOp::Ceil => Function::Ceil,
            UnaryOp::Round => Function::Round,
            UnaryOp::Sign => Function::Sign,
            UnaryOp::ToText => Function::ToText,
            UnaryOp::ToInteger => Function::ToInteger,
            UnaryOp::ToNumber => Function::ToNumber,
            UnaryOp::ToDate => Function::ToDate,
            UnaryOp::ToDateTime => Function::ToDateTime,
            UnaryOp::Upper => Function::Upper,
            UnaryOp::Lower => Function::Lower,
            UnaryOp::Trim => Function::Trim,
            UnaryOp::LeftTrim => Function::LeftTrim,
            UnaryOp::RightTrim => Function::RightTrim,
            UnaryOp::Length => Function::Length,
            UnaryOp::Extract(part) => Function::extract(part),
            UnaryOp::DayOfWeek => Function::DayOfWeek,
            UnaryOp::RepeatPart(unit) => Function::interval_part(unit),
            UnaryOp::PointX => Function::PointX,
            UnaryOp::PointY => Function::PointY,
            UnaryOp::AsText => Function::GeometryAsText,
            UnaryOp::BoundingBox => Function::BoundingBox,
        };
        self.call(function, &[operand])
    }

    fn binary(&self, op: BinaryOp, left: &Expr, right: &Expr) -> Fragment {
        let function = match op {
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Lte
            | BinaryOp::Gt
            | BinaryOp::Gte
            | BinaryOp::And
            | BinaryOp::Or
            | BinaryOp::Add
            | BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Like
            | BinaryOp::ILike => return self.infix(op, left, right),
            BinaryOp::Concat => return self.concat(left, right),
            BinaryOp::IntDiv => Function::IntegerDivide,
            BinaryOp::Rem => Function::Modulus,
            BinaryOp::Power => Function::Power,
            BinaryOp::Position => Function::Position,
            BinaryOp::AddUnit(unit) => Function::add_unit(unit),
            BinaryOp::UnitsBetween(unit) => Function::units_between(unit),
            BinaryOp::RepeatBetween => Function::IntervalBetween,
            BinaryOp::AddRepeat => Function::IntervalAdd,
            BinaryOp::SubtractRepeat => Function::IntervalSubtract,
            BinaryOp::MakePoint => Function::MakePoint,
            BinaryOp::Distance => Function::Distance,
            BinaryOp::GeometryEquals => Function::GeometryEquals,
        };
        self.call(function, &[left, right])
    }

    fn infix(&self, op: BinaryOp, left: &Expr, right: &Expr) -> Fragment {
        let symbol = op.sql_symbol().unwrap_or_default();
        let precedence = infix_precedence(op);
        let comparison = precedence == COMPARISON;
        let left = self.node(left);
        let left = if comparison {
            left.above(precedence)
        } else {
            left.at_least(precedence)
        };
        let right = self.node(right);
        let right = if op.is_logical() {
            right.at_least(precedence)
        } else {
            right.above(precedence)
        };
        Fragment::new(format!("{} {} {}", left, symbol, right), precedence)
    }

    fn concat(&self, left: &Expr, right: &Expr) -> Fragment {
        let mut parts = Vec::new();
        collect_concat(left, &mut parts);
        collect_concat(right, &mut parts);
        let rendered: Vec<String> = parts
            .into_iter()
            .map(|p| self.node(p).at_least(ATOM))
            .collect();
        let refs: Vec<&str> = rendered.iter().map(String::as_str).collect();
        Fragment::new(self.generator.string_concat(&refs), ADDITIVE)
    }

    fn nary(&self, op: NaryOp, args: &[Expr]) -> Fragment {
        match op {
            NaryOp::Coalesce => self.call(Function::Coalesce, &args.iter().collect::<Vec<_>>()),
            NaryOp::Greatest => self.call(Function::Greatest, &args.iter().collect::<Vec<_>>()),
            NaryOp::Least => self.call(Function::Least, &args.iter().collect::<Vec<_>>()),
            NaryOp::Substring => self.call(Function::Substring, &args.iter().collect::<Vec<_>>()),
            NaryOp::Replace => self.call(Function::Replace, &args.iter().collect::<Vec<_>>()),
            NaryOp::AllOf => self.junction(args, "AND", AND, "1 = 1"),
            NaryOp::AnyOf => self.junction(args, "OR", OR, "1 = 0"),
            NaryOp::In | NaryOp::NotIn => {
                let negated = op == NaryOp::NotIn;
                let Some((subject, list)) = args.split_first() else {
                    return Fragment::new("1 = 0".to_string(), COMPARISON);
                };
                if list.is_empty() {
                    let sql = if negated { "1 = 1" } else { "1 = 0" };
                    return Fragment::new(sql.to_string(), COMPARISON);
                }
                let subject = self.node(subject).above(COMPARISON);
                let items: Vec<String> = list.iter().map(|a| self.node(a).sql).collect();
                let keyword = if negated { "NOT IN" } else { "IN" };
                Fragment::new(
                    format!("{} {} ({})", subject, keyword, items.join(", ")),
                    COMPARISON,
                )
            }
        }
    }

    fn junction(&self, args: &[Expr], keyword: &str, precedence: u8, empty: &str) -> Fragment {
        match args {
            [] => Fragment::new(empty.to_string(), COMPARISON),
            [only] => self.node(only),
            _ => {
                let parts: Vec<String> = args
                    .iter()
                    .map(|a| self.node(a).at_least(precedence))
                    .collect();
                Fragment::new(parts.join(&format!(" {} ", keyword)), precedence)
            }
        }
    }

    fn window(&self, window: &WindowExpr) -> Fragment {
        let call = match &window.function {
            WindowFunction::Aggregate(e) => self.node(e),
            WindowFunction::Lag {
                value,
                offset,
                default,
            }
            | WindowFunction::Lead {
                value,
                offset,
                default,
            } => {
                let function = if matches!(window.function, WindowFunction::Lag { .. }) {
                    Function::Lag
                } else {
                    Function::Lead
                };
                let mut args = vec![self.node(value)];
                let has_default = !default.is_always_null();
                if *offset != 1 || has_default {
                    args.push(Fragment::atom(offset.to_string()));
                }
                if has_default {
                    args.push(self.node(default));
                }
                self.apply(function, args)
            }
            WindowFunction::FirstValue(e) => self.call(Function::FirstValue, &[e]),
            WindowFunction::LastValue(e) => self.call(Function::LastValue, &[e]),
            WindowFunction::NthValue { value, n } => {
                let args = vec![self.node(value), Fragment::atom(n.to_string())];
                self.apply(Function::NthValue, args)
            }
            WindowFunction::RowNumber => self.apply(Function::RowNumber, Vec::new()),
            WindowFunction::Rank => self.apply(Function::Rank, Vec::new()),
            WindowFunction::DenseRank => self.apply(Function::DenseRank, Vec::new()),
        };

        let mut clauses = Vec::new();
        if !window.partition.is_empty() {
            let parts: Vec<String> = window.partition.iter().map(|p| self.node(p).sql).collect();
            clauses.push(format!("PARTITION BY {}", parts.join(", ")));
        }
        if !window.order.is_empty() {
            clauses.push(format!("ORDER BY {}", self.order_terms(&window.order)));
        }
        if let Some(frame) = window.frame.filter(|_| window.function.accepts_frame()) {
            clauses.push(frame.to_string());
        }
        Fragment::atom(format!("{} OVER ({})", call.sql, clauses.join(" ")))
    }

    fn order_terms(&self, terms: &[OrderTerm]) -> String {
        terms
            .iter()
            .map(|t| format!("{} {}", self.node(&t.expr).sql, t.order.sql_keyword()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn signed(sql: String, negative: bool) -> Fragment {
    Fragment::new(sql, if negative { PREFIX } else { ATOM })
}

fn infix_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => OR,
        BinaryOp::And => AND,
        BinaryOp::Add | BinaryOp::Sub => ADDITIVE,
        BinaryOp::Mul | BinaryOp::Div => MULTIPLICATIVE,
        _ => COMPARISON,
    }
}

fn aggregate_function(f: AggregateFunc) -> Function {
    match f {
        AggregateFunc::Count | AggregateFunc::CountDistinct => Function::Count,
        AggregateFunc::Sum => Function::Sum,
        AggregateFunc::Avg => Function::Avg,
        AggregateFunc::Min => Function::Min,
        AggregateFunc::Max => Function::Max,
    }
}

/// Flatten nested concatenations into one operand list.
fn collect_concat<'e>(expr: &'e Expr, out: &mut Vec<&'e Expr>) {
    match expr {
        Expr::Binary {
            op: BinaryOp::Concat,
            left,
            right,
        } => {
            collect_concat(left, out);
            collect_concat(right, out);
        }
        other => out.push(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Column, DatePart};
    use crate::transpiler::Dialect;
    use pretty_assertions::assert_eq;

    fn col(name: &str, kind: ValueKind) -> Expr {
        Expr::column(name, kind)
    }

    #[test]
    fn test_minimal_parentheses() {
        let pg = Dialect::Postgres.generator();
        let a = col("a", ValueKind::Integer);
        let b = col("b", ValueKind::Integer);
        let c = col("c", ValueKind::Integer);
        let e = Expr::make_binary(
            BinaryOp::Sub,
            a.clone(),
            Expr::make_binary(BinaryOp::Sub, b.clone(), c.clone()),
        );
        assert_eq!(render(&e, pg), "a - (b - c)");
        let e = Expr::make_binary(
            BinaryOp::Sub,
            Expr::make_binary(BinaryOp::Sub, a.clone(), b.clone()),
            c.clone(),
        );
        assert_eq!(render(&e, pg), "a - b - c");
        let e = Expr::make_binary(
            BinaryOp::Add,
            a.clone(),
            Expr::make_binary(BinaryOp::Mul, b, c),
        );
        assert_eq!(render(&e, pg), "a + b * c");
        let e = Expr::make_unary(UnaryOp::Negate, Expr::int(-1));
        assert_eq!(render(&e, pg), "-(-1)");
    }

    #[test]
    fn test_qualified_column() {
        let e = Expr::Column(Column::new("order", ValueKind::Integer).in_table("users"));
        assert_eq!(render(&e, Dialect::Postgres.generator()), "users.\"order\"");
        assert_eq!(render(&e, Dialect::MySQL.generator()), "`users`.`order`");
    }

    #[test]
    fn test_in_list() {
        let e = Expr::make_nary(
            NaryOp::In,
            vec![col("x", ValueKind::Integer), Expr::int(1), Expr::int(2)],
        );
        assert_eq!(render(&e, Dialect::Postgres.generator()), "x IN (1, 2)");
        let e = Expr::make_nary(NaryOp::NotIn, vec![col("x", ValueKind::Integer)]);
        assert_eq!(render(&e, Dialect::Postgres.generator()), "1 = 1");
    }

    #[test]
    fn test_count_distinct() {
        let e = Expr::make_unary(
            UnaryOp::Aggregate(AggregateFunc::CountDistinct),
            col("email", ValueKind::Text),
        );
        assert_eq!(render(&e, Dialect::Postgres.generator()), "COUNT(DISTINCT email)");
    }

    #[test]
    fn test_extract_on_datetime() {
        let e = Expr::make_unary(
            UnaryOp::Extract(DatePart::Hour),
            col("ts", ValueKind::DateTime),
        );
        assert_eq!(render(&e, Dialect::SqlServer.generator()), "DATEPART(hour, [ts])");
    }
}
