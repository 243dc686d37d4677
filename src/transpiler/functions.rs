//! Logical functions, dialect features and function syntax.
//!
//! A `Function` names an operation independently of any dialect. Each
//! dialect maps the functions it implements to a `FunctionSyntax`; anything
//! it does not map falls back to the ANSI default, or is emulated when no
//! default exists.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ast::{DatePart, TimeUnit};
use crate::error::{ExprError, ExprResult};

/// Dialect capabilities that change how expressions are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Native interval type; DateRepeat values stay intervals.
    IntervalType,
    /// Native geometry type and ST_* style functions.
    Geometry,
    /// ILIKE operator.
    CaseInsensitiveLike,
    /// NULLS FIRST / NULLS LAST in ORDER BY.
    NullsOrdering,
    /// Boolean expressions are values that can be compared.
    BooleanValues,
    /// The clock reports UTC; the local current date-time needs the
    /// dialect's timezone adjustment.
    TimezoneAdjustedNow,
    /// Adding units to a DATE yields a timestamp that must be cast back.
    DateArithmeticWidens,
}

/// How a function is resolved when a dialect does not register it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionGroup {
    /// An ANSI default exists.
    Primitive,
    /// No default; decomposed into primitives when absent.
    Emulatable,
    /// Native only with `Feature::IntervalType`.
    Interval,
    /// Native only with `Feature::Geometry`.
    Geometry,
}

/// Dialect-independent function identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Function {
    // Aggregates and windows
    Max,
    Min,
    Sum,
    Avg,
    Count,
    Lag,
    Lead,
    FirstValue,
    LastValue,
    NthValue,
    RowNumber,
    Rank,
    DenseRank,
    // Scalars
    Coalesce,
    Abs,
    Sqrt,
    Power,
    Floor,
    Ceil,
    Round,
    IntegerDivide,
    Modulus,
    Upper,
    Lower,
    Trim,
    LeftTrim,
    RightTrim,
    Length,
    Substring,
    Position,
    Replace,
    // Casts
    ToText,
    ToInteger,
    ToNumber,
    ToDate,
    ToDateTime,
    // Temporal
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Subsecond,
    Epoch,
    AddYears,
    AddMonths,
    AddDays,
    AddHours,
    AddMinutes,
    AddSeconds,
    CurrentDate,
    CurrentDateTime,
    CurrentInstant,
    DateLiteral,
    DateTimeLiteral,
    InstantLiteral,
    // Emulatable
    Greatest,
    Least,
    Sign,
    DayOfWeek,
    YearsBetween,
    MonthsBetween,
    DaysBetween,
    HoursBetween,
    MinutesBetween,
    SecondsBetween,
    // Interval
    IntervalLiteral,
    IntervalBetween,
    IntervalAdd,
    IntervalSubtract,
    IntervalYears,
    IntervalMonths,
    IntervalDays,
    IntervalHours,
    IntervalMinutes,
    IntervalSeconds,
    // Geometry
    GeometryFromText,
    MakePoint,
    PointX,
    PointY,
    GeometryEquals,
    Distance,
    BoundingBox,
    GeometryAsText,
}

impl Function {
    pub const ALL: [Function; 84] = [
        Function::Max,
        Function::Min,
        Function::Sum,
        Function::Avg,
        Function::Count,
        Function::Lag,
        Function::Lead,
        Function::FirstValue,
        Function::LastValue,
        Function::NthValue,
        Function::RowNumber,
        Function::Rank,
        Function::DenseRank,
        Function::Coalesce,
        Function::Abs,
        Function::Sqrt,
        Function::Power,
        Function::Floor,
        Function::Ceil,
        Function::Round,
        Function::IntegerDivide,
        Function::Modulus,
        Function::Upper,
        Function::Lower,
        Function::Trim,
        Function::LeftTrim,
        Function::RightTrim,
        Function::Length,
        Function::Substring,
        Function::Position,
        Function::Replace,
        Function::ToText,
        Function::ToInteger,
        Function::ToNumber,
        Function::ToDate,
        Function::ToDateTime,
        Function::Year,
        Function::Month,
        Function::Day,
        Function::Hour,
        Function::Minute,
        Function::Second,
        Function::Subsecond,
        Function::Epoch,
        Function::AddYears,
        Function::AddMonths,
        Function::AddDays,
        Function::AddHours,
        Function::AddMinutes,
        Function::AddSeconds,
        Function::CurrentDate,
        Function::CurrentDateTime,
        Function::CurrentInstant,
        Function::DateLiteral,
        Function::DateTimeLiteral,
        Function::InstantLiteral,
        Function::Greatest,
        Function::Least,
        Function::Sign,
        Function::DayOfWeek,
        Function::YearsBetween,
        Function::MonthsBetween,
        Function::DaysBetween,
        Function::HoursBetween,
        Function::MinutesBetween,
        Function::SecondsBetween,
        Function::IntervalLiteral,
        Function::IntervalBetween,
        Function::IntervalAdd,
        Function::IntervalSubtract,
        Function::IntervalYears,
        Function::IntervalMonths,
        Function::IntervalDays,
        Function::IntervalHours,
        Function::IntervalMinutes,
        Function::IntervalSeconds,
        Function::GeometryFromText,
        Function::MakePoint,
        Function::PointX,
        Function::PointY,
        Function::GeometryEquals,
        Function::Distance,
        Function::BoundingBox,
        Function::GeometryAsText,
    ];

    /// Configuration key, e.g. `add_days`.
    pub fn name(&self) -> &'static str {
        match self {
            Function::Max => "max",
            Function::Min => "min",
            Function::Sum => "sum",
            Function::Avg => "avg",
            Function::Count => "count",
            Function::Lag => "lag",
            Function::Lead => "lead",
            Function::FirstValue => "first_value",
            Function::LastValue => "last_value",
            Function::NthValue => "nth_value",
            Function::RowNumber => "row_number",
            Function::Rank => "rank",
            Function::DenseRank => "dense_rank",
            Function::Coalesce => "coalesce",
            Function::Abs => "abs",
            Function::Sqrt => "sqrt",
            Function::Power => "power",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
            Function::Round => "round",
            Function::IntegerDivide => "integer_divide",
            Function::Modulus => "modulus",
            Function::Upper => "upper",
            Function::Lower => "lower",
            Function::Trim => "trim",
            Function::LeftTrim => "left_trim",
            Function::RightTrim => "right_trim",
            Function::Length => "length",
            Function::Substring => "substring",
            Function::Position => "position",
            Function::Replace => "replace",
            Function::ToText => "to_text",
            Function::ToInteger => "to_integer",
            Function::ToNumber => "to_number",
            Function::ToDate => "to_date",
            Function::ToDateTime => "to_date_time",
            Function::Year => "year",
            Function::Month => "month",
            Function::Day => "day",
            Function::Hour => "hour",
            Function::Minute => "minute",
            Function::Second => "second",
            Function::Subsecond => "subsecond",
            Function::Epoch => "epoch",
            Function::AddYears => "add_years",
            Function::AddMonths => "add_months",
            Function::AddDays => "add_days",
            Function::AddHours => "add_hours",
            Function::AddMinutes => "add_minutes",
            Function::AddSeconds => "add_seconds",
            Function::CurrentDate => "current_date",
            Function::CurrentDateTime => "current_date_time",
            Function::CurrentInstant => "current_instant",
            Function::DateLiteral => "date_literal",
            Function::DateTimeLiteral => "date_time_literal",
            Function::InstantLiteral => "instant_literal",
            Function::Greatest => "greatest",
            Function::Least => "least",
            Function::Sign => "sign",
            Function::DayOfWeek => "day_of_week",
            Function::YearsBetween => "years_between",
            Function::MonthsBetween => "months_between",
            Function::DaysBetween => "days_between",
            Function::HoursBetween => "hours_between",
            Function::MinutesBetween => "minutes_between",
            Function::SecondsBetween => "seconds_between",
            Function::IntervalLiteral => "interval_literal",
            Function::IntervalBetween => "interval_between",
            Function::IntervalAdd => "interval_add",
            Function::IntervalSubtract => "interval_subtract",
            Function::IntervalYears => "interval_years",
            Function::IntervalMonths => "interval_months",
            Function::IntervalDays => "interval_days",
            Function::IntervalHours => "interval_hours",
            Function::IntervalMinutes => "interval_minutes",
            Function::IntervalSeconds => "interval_seconds",
            Function::GeometryFromText => "geometry_from_text",
            Function::MakePoint => "make_point",
            Function::PointX => "point_x",
            Function::PointY => "point_y",
            Function::GeometryEquals => "geometry_equals",
            Function::Distance => "distance",
            Function::BoundingBox => "bounding_box",
            Function::GeometryAsText => "geometry_as_text",
        }
    }

    pub fn group(&self) -> FunctionGroup {
        match self {
            Function::Greatest
            | Function::Least
            | Function::Sign
            | Function::DayOfWeek
            | Function::YearsBetween
            | Function::MonthsBetween
            | Function::DaysBetween
            | Function::HoursBetween
            | Function::MinutesBetween
            | Function::SecondsBetween => FunctionGroup::Emulatable,
            Function::IntervalLiteral
            | Function::IntervalBetween
            | Function::IntervalAdd
            | Function::IntervalSubtract
            | Function::IntervalYears
            | Function::IntervalMonths
            | Function::IntervalDays
            | Function::IntervalHours
            | Function::IntervalMinutes
            | Function::IntervalSeconds => FunctionGroup::Interval,
            Function::GeometryFromText
            | Function::MakePoint
            | Function::PointX
            | Function::PointY
            | Function::GeometryEquals
            | Function::Distance
            | Function::BoundingBox
            | Function::GeometryAsText => FunctionGroup::Geometry,
            _ => FunctionGroup::Primitive,
        }
    }

    /// ANSI syntax for primitives; `None` for every other group.
    pub fn default_syntax(&self) -> Option<FunctionSyntax> {
        let syntax = match self {
            Function::Max => FunctionSyntax::name("MAX"),
            Function::Min => FunctionSyntax::name("MIN"),
            Function::Sum => FunctionSyntax::name("SUM"),
            Function::Avg => FunctionSyntax::name("AVG"),
            Function::Count => FunctionSyntax::name("COUNT"),
            Function::Lag => FunctionSyntax::name("LAG"),
            Function::Lead => FunctionSyntax::name("LEAD"),
            Function::FirstValue => FunctionSyntax::name("FIRST_VALUE"),
            Function::LastValue => FunctionSyntax::name("LAST_VALUE"),
            Function::NthValue => FunctionSyntax::name("NTH_VALUE"),
            Function::RowNumber => FunctionSyntax::name("ROW_NUMBER"),
            Function::Rank => FunctionSyntax::name("RANK"),
            Function::DenseRank => FunctionSyntax::name("DENSE_RANK"),
            Function::Coalesce => FunctionSyntax::name("COALESCE"),
            Function::Abs => FunctionSyntax::name("ABS"),
            Function::Sqrt => FunctionSyntax::name("SQRT"),
            Function::Power => FunctionSyntax::name("POWER"),
            Function::Floor => FunctionSyntax::name("FLOOR"),
            Function::Ceil => FunctionSyntax::name("CEILING"),
            Function::Round => FunctionSyntax::name("ROUND"),
            Function::IntegerDivide => FunctionSyntax::template("({0} / {1})"),
            Function::Modulus => FunctionSyntax::name("MOD"),
            Function::Upper => FunctionSyntax::name("UPPER"),
            Function::Lower => FunctionSyntax::name("LOWER"),
            Function::Trim => FunctionSyntax::name("TRIM"),
            Function::LeftTrim => FunctionSyntax::template("TRIM(LEADING FROM {0})"),
            Function::RightTrim => FunctionSyntax::template("TRIM(TRAILING FROM {0})"),
            Function::Length => FunctionSyntax::name("CHAR_LENGTH"),
            Function::Substring => FunctionSyntax::template("SUBSTRING({0} FROM {1} FOR {2})"),
            Function::Position => FunctionSyntax::template("POSITION({1} IN {0})"),
            Function::Replace => FunctionSyntax::name("REPLACE"),
            Function::ToText => FunctionSyntax::template("CAST({0} AS VARCHAR(255))"),
            Function::ToInteger => FunctionSyntax::template("CAST({0} AS INTEGER)"),
            Function::ToNumber => FunctionSyntax::template("CAST({0} AS DOUBLE PRECISION)"),
            Function::ToDate => FunctionSyntax::template("CAST({0} AS DATE)"),
            Function::ToDateTime => FunctionSyntax::template("CAST({0} AS TIMESTAMP)"),
            Function::Year => FunctionSyntax::template("EXTRACT(YEAR FROM {0})"),
            Function::Month => FunctionSyntax::template("EXTRACT(MONTH FROM {0})"),
            Function::Day => FunctionSyntax::template("EXTRACT(DAY FROM {0})"),
            Function::Hour => FunctionSyntax::template("EXTRACT(HOUR FROM {0})"),
            Function::Minute => FunctionSyntax::template("EXTRACT(MINUTE FROM {0})"),
            Function::Second => FunctionSyntax::template("FLOOR(EXTRACT(SECOND FROM {0}))"),
            Function::Subsecond => FunctionSyntax::template(
                "(EXTRACT(SECOND FROM {0}) - FLOOR(EXTRACT(SECOND FROM {0})))",
            ),
            Function::Epoch => {
                FunctionSyntax::template("CAST(FLOOR(EXTRACT(EPOCH FROM {0})) AS BIGINT)")
            }
            Function::AddYears => FunctionSyntax::template("({0} + {1} * INTERVAL '1' YEAR)"),
            Function::AddMonths => FunctionSyntax::template("({0} + {1} * INTERVAL '1' MONTH)"),
            Function::AddDays => FunctionSyntax::template("({0} + {1} * INTERVAL '1' DAY)"),
            Function::AddHours => FunctionSyntax::template("({0} + {1} * INTERVAL '1' HOUR)"),
            Function::AddMinutes => FunctionSyntax::template("({0} + {1} * INTERVAL '1' MINUTE)"),
            Function::AddSeconds => FunctionSyntax::template("({0} + {1} * INTERVAL '1' SECOND)"),
            Function::CurrentDate => FunctionSyntax::template("CURRENT_DATE"),
            Function::CurrentDateTime => FunctionSyntax::template("LOCALTIMESTAMP"),
            Function::CurrentInstant => FunctionSyntax::template("CURRENT_TIMESTAMP"),
            Function::DateLiteral => FunctionSyntax::template("DATE {0}"),
            Function::DateTimeLiteral => FunctionSyntax::template("TIMESTAMP {0}"),
            Function::InstantLiteral => FunctionSyntax::template("TIMESTAMP WITH TIME ZONE {0}"),
            _ => return None,
        };
        Some(syntax)
    }

    /// Extraction function for a date part.
    pub fn extract(part: DatePart) -> Function {
        match part {
            DatePart::Year => Function::Year,
            DatePart::Month => Function::Month,
            DatePart::Day => Function::Day,
            DatePart::Hour => Function::Hour,
            DatePart::Minute => Function::Minute,
            DatePart::Second => Function::Second,
            DatePart::Subsecond => Function::Subsecond,
            DatePart::Epoch => Function::Epoch,
        }
    }

    pub fn add_unit(unit: TimeUnit) -> Function {
        match unit {
            TimeUnit::Year => Function::AddYears,
            TimeUnit::Month => Function::AddMonths,
            TimeUnit::Day => Function::AddDays,
            TimeUnit::Hour => Function::AddHours,
            TimeUnit::Minute => Function::AddMinutes,
            TimeUnit::Second => Function::AddSeconds,
        }
    }

    pub fn units_between(unit: TimeUnit) -> Function {
        match unit {
            TimeUnit::Year => Function::YearsBetween,
            TimeUnit::Month => Function::MonthsBetween,
            TimeUnit::Day => Function::DaysBetween,
            TimeUnit::Hour => Function::HoursBetween,
            TimeUnit::Minute => Function::MinutesBetween,
            TimeUnit::Second => Function::SecondsBetween,
        }
    }

    /// Interval component accessor for a unit.
    pub fn interval_part(unit: TimeUnit) -> Function {
        match unit {
            TimeUnit::Year => Function::IntervalYears,
            TimeUnit::Month => Function::IntervalMonths,
            TimeUnit::Day => Function::IntervalDays,
            TimeUnit::Hour => Function::IntervalHours,
            TimeUnit::Minute => Function::IntervalMinutes,
            TimeUnit::Second => Function::IntervalSeconds,
        }
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Function {
    type Err = ExprError;

    fn from_str(s: &str) -> ExprResult<Self> {
        let key = s.trim().to_lowercase();
        Function::ALL
            .iter()
            .find(|f| f.name() == key)
            .copied()
            .ok_or_else(|| ExprError::Config(format!("unknown function '{}'", s)))
    }
}

/// How a dialect spells a function.
///
/// In TOML a bare string is a function name and a table with `template` is a
/// positional template:
///
/// ```toml
/// greatest = "GREATEST"
/// add_days = { template = "DATEADD(day, {1}, {0})" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FunctionSyntax {
    /// `NAME(arg0, arg1, ...)`
    Name(String),
    /// Text with `{n}` replaced by the n-th argument.
    Template { template: String },
}

impl FunctionSyntax {
    pub fn name(name: impl Into<String>) -> Self {
        FunctionSyntax::Name(name.into())
    }

    pub fn template(template: impl Into<String>) -> Self {
        FunctionSyntax::Template {
            template: template.into(),
        }
    }

    pub fn is_template(&self) -> bool {
        matches!(self, FunctionSyntax::Template { .. })
    }

    /// Render with already-rendered arguments.
    pub fn apply(&self, args: &[String]) -> String {
        match self {
            FunctionSyntax::Name(name) => format!("{}({})", name, args.join(", ")),
            FunctionSyntax::Template { template } => fill_template(template, args),
        }
    }
}

/// Single pass over the template so argument text is never rescanned.
fn fill_template(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len() + args.iter().map(String::len).sum::<usize>());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.chars().take_while(|c| c.is_ascii_digit()).count();
        let index = if digits > 0 && after[digits..].starts_with('}') {
            after[..digits].parse::<usize>().ok()
        } else {
            None
        };
        match index.and_then(|i| args.get(i)) {
            Some(arg) => {
                out.push_str(arg);
                rest = &after[digits + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
