use crate::transpiler::dialect::{DialectDescriptor, QuoteStyle};
use crate::transpiler::functions::{Feature, Function};

/// SQLite stores dates as text and reports `CURRENT_TIMESTAMP` in UTC, so
/// the local current date-time goes through the timezone adjustment.
pub fn descriptor() -> DialectDescriptor {
    DialectDescriptor::new("sqlite")
        .with_quote(QuoteStyle::Double, true)
        .with_numeric_booleans()
        .with_features([Feature::BooleanValues, Feature::DateArithmeticWidens])
        .with_timezone_adjustment("datetime({0}, 'localtime')")
        // Numeric
        .with_template(Function::Modulus, "({0} % {1})")
        .with_template(
            Function::Floor,
            "(CAST({0} AS INTEGER) - ({0} < CAST({0} AS INTEGER)))",
        )
        .with_template(
            Function::Ceil,
            "(CAST({0} AS INTEGER) + ({0} > CAST({0} AS INTEGER)))",
        )
        .with_function(Function::Greatest, "MAX")
        .with_function(Function::Least, "MIN")
        // Text
        .with_function(Function::Length, "LENGTH")
        .with_function(Function::LeftTrim, "LTRIM")
        .with_function(Function::RightTrim, "RTRIM")
        .with_function(Function::Substring, "SUBSTR")
        .with_function(Function::Position, "INSTR")
        .with_template(Function::ToText, "CAST({0} AS TEXT)")
        .with_template(Function::ToNumber, "CAST({0} AS REAL)")
        .with_template(Function::ToDate, "date({0})")
        .with_template(Function::ToDateTime, "datetime({0})")
        // Temporal
        .with_template(Function::Year, "CAST(strftime('%Y', {0}) AS INTEGER)")
        .with_template(Function::Month, "CAST(strftime('%m', {0}) AS INTEGER)")
        .with_template(Function::Day, "CAST(strftime('%d', {0}) AS INTEGER)")
        .with_template(Function::Hour, "CAST(strftime('%H', {0}) AS INTEGER)")
        .with_template(Function::Minute, "CAST(strftime('%M', {0}) AS INTEGER)")
        .with_template(Function::Second, "CAST(strftime('%S', {0}) AS INTEGER)")
        .with_template(Function::Subsecond, "(strftime('%f', {0}) - strftime('%S', {0}))")
        .with_template(Function::Epoch, "CAST(strftime('%s', {0}) AS INTEGER)")
        .with_template(Function::AddYears, "datetime({0}, printf('%+d years', {1}))")
        .with_template(Function::AddMonths, "datetime({0}, printf('%+d months', {1}))")
        .with_template(Function::AddDays, "datetime({0}, printf('%+d days', {1}))")
        .with_template(Function::AddHours, "datetime({0}, printf('%+d hours', {1}))")
        .with_template(Function::AddMinutes, "datetime({0}, printf('%+d minutes', {1}))")
        .with_template(Function::AddSeconds, "datetime({0}, printf('%+f seconds', {1}))")
        .with_template(Function::DayOfWeek, "(CAST(strftime('%w', {0}) AS INTEGER) + 1)")
        .with_template(Function::CurrentDate, "date('now', 'localtime')")
        .with_template(Function::CurrentDateTime, "CURRENT_TIMESTAMP")
        .with_template(Function::DateLiteral, "{0}")
        .with_template(Function::DateTimeLiteral, "{0}")
        .with_template(Function::InstantLiteral, "{0}")
}
