use crate::transpiler::dialect::{DialectDescriptor, QuoteStyle};
use crate::transpiler::functions::{Feature, Function};

pub fn descriptor() -> DialectDescriptor {
    DialectDescriptor::new("snowflake")
        .with_quote(QuoteStyle::Double, true)
        .with_features([
            Feature::BooleanValues,
            Feature::NullsOrdering,
            Feature::CaseInsensitiveLike,
        ])
        // Numeric
        .with_template(Function::IntegerDivide, "TRUNC({0} / {1})")
        .with_function(Function::Ceil, "CEIL")
        .with_function(Function::Sign, "SIGN")
        .with_function(Function::Greatest, "GREATEST")
        .with_function(Function::Least, "LEAST")
        // Text
        .with_function(Function::Length, "LENGTH")
        .with_function(Function::LeftTrim, "LTRIM")
        .with_function(Function::RightTrim, "RTRIM")
        .with_template(Function::ToText, "CAST({0} AS VARCHAR)")
        .with_template(Function::ToNumber, "CAST({0} AS DOUBLE)")
        // Temporal
        .with_template(Function::Epoch, "DATE_PART(epoch_second, {0})")
        .with_template(Function::DayOfWeek, "(DAYOFWEEKISO({0}) % 7 + 1)")
        .with_template(Function::AddYears, "DATEADD(year, {1}, {0})")
        .with_template(Function::AddMonths, "DATEADD(month, {1}, {0})")
        .with_template(Function::AddDays, "DATEADD(day, {1}, {0})")
        .with_template(Function::AddHours, "DATEADD(hour, {1}, {0})")
        .with_template(Function::AddMinutes, "DATEADD(minute, {1}, {0})")
        .with_template(Function::AddSeconds, "DATEADD(second, {1}, {0})")
        .with_template(Function::CurrentInstant, "SYSDATE()")
        .with_template(Function::InstantLiteral, "TO_TIMESTAMP_TZ({0})")
}
