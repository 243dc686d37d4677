use crate::transpiler::dialect::{ConcatStyle, DialectDescriptor, QuoteStyle};
use crate::transpiler::functions::{Feature, Function};

pub fn descriptor() -> DialectDescriptor {
    DialectDescriptor::new("bigquery")
        .with_quote(QuoteStyle::Backtick, true)
        .with_concat(ConcatStyle::Function)
        .with_features([Feature::BooleanValues, Feature::DateArithmeticWidens])
        // Numeric
        .with_function(Function::IntegerDivide, "DIV")
        .with_function(Function::Ceil, "CEIL")
        .with_function(Function::Sign, "SIGN")
        .with_function(Function::Greatest, "GREATEST")
        .with_function(Function::Least, "LEAST")
        // Text
        .with_function(Function::Length, "LENGTH")
        .with_function(Function::LeftTrim, "LTRIM")
        .with_function(Function::RightTrim, "RTRIM")
        .with_function(Function::Substring, "SUBSTR")
        .with_function(Function::Position, "STRPOS")
        .with_template(Function::ToText, "CAST({0} AS STRING)")
        .with_template(Function::ToInteger, "CAST({0} AS INT64)")
        .with_template(Function::ToNumber, "CAST({0} AS FLOAT64)")
        .with_template(Function::ToDateTime, "CAST({0} AS DATETIME)")
        // Temporal
        .with_template(Function::Subsecond, "(EXTRACT(MICROSECOND FROM {0}) / 1000000)")
        .with_template(Function::Epoch, "UNIX_SECONDS(TIMESTAMP({0}))")
        .with_template(Function::DayOfWeek, "EXTRACT(DAYOFWEEK FROM {0})")
        .with_template(Function::AddYears, "DATETIME_ADD({0}, INTERVAL {1} YEAR)")
        .with_template(Function::AddMonths, "DATETIME_ADD({0}, INTERVAL {1} MONTH)")
        .with_template(Function::AddDays, "DATETIME_ADD({0}, INTERVAL {1} DAY)")
        .with_template(Function::AddHours, "DATETIME_ADD({0}, INTERVAL {1} HOUR)")
        .with_template(Function::AddMinutes, "DATETIME_ADD({0}, INTERVAL {1} MINUTE)")
        .with_template(Function::AddSeconds, "DATETIME_ADD({0}, INTERVAL {1} SECOND)")
        .with_template(Function::CurrentDateTime, "CURRENT_DATETIME()")
        .with_template(Function::DateTimeLiteral, "DATETIME {0}")
        .with_template(Function::InstantLiteral, "TIMESTAMP {0}")
}
