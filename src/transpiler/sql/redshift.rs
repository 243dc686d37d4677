use crate::transpiler::dialect::{DialectDescriptor, QuoteStyle};
use crate::transpiler::functions::{Feature, Function};

pub fn descriptor() -> DialectDescriptor {
    DialectDescriptor::new("redshift")
        .with_quote(QuoteStyle::Double, true)
        .with_features([
            Feature::BooleanValues,
            Feature::CaseInsensitiveLike,
            Feature::NullsOrdering,
        ])
        // Numeric
        .with_function(Function::Ceil, "CEIL")
        .with_function(Function::Sign, "SIGN")
        // Text
        .with_function(Function::Length, "LEN")
        .with_function(Function::LeftTrim, "LTRIM")
        .with_function(Function::RightTrim, "RTRIM")
        .with_function(Function::Position, "STRPOS")
        .with_template(Function::ToText, "CAST({0} AS VARCHAR)")
        // Temporal
        .with_template(Function::Year, "DATE_PART(year, {0})")
        .with_template(Function::Month, "DATE_PART(month, {0})")
        .with_template(Function::Day, "DATE_PART(day, {0})")
        .with_template(Function::Hour, "DATE_PART(hour, {0})")
        .with_template(Function::Minute, "DATE_PART(minute, {0})")
        .with_template(Function::Epoch, "CAST(FLOOR(DATE_PART(epoch, {0})) AS BIGINT)")
        .with_template(Function::DayOfWeek, "(DATE_PART(dow, {0}) + 1)")
        .with_template(Function::AddYears, "DATEADD(year, {1}, {0})")
        .with_template(Function::AddMonths, "DATEADD(month, {1}, {0})")
        .with_template(Function::AddDays, "DATEADD(day, {1}, {0})")
        .with_template(Function::AddHours, "DATEADD(hour, {1}, {0})")
        .with_template(Function::AddMinutes, "DATEADD(minute, {1}, {0})")
        .with_template(Function::AddSeconds, "DATEADD(second, {1}, {0})")
        .with_template(Function::CurrentDateTime, "GETDATE()")
        .with_template(Function::CurrentInstant, "SYSDATE")
}
