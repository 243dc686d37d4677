use crate::transpiler::dialect::DialectDescriptor;
use crate::transpiler::functions::{Feature, Function};

pub fn descriptor() -> DialectDescriptor {
    DialectDescriptor::new("duckdb")
        .with_features([
            Feature::IntervalType,
            Feature::CaseInsensitiveLike,
            Feature::NullsOrdering,
            Feature::BooleanValues,
            Feature::DateArithmeticWidens,
        ])
        // Numeric
        .with_template(Function::IntegerDivide, "({0} // {1})")
        .with_function(Function::Ceil, "CEIL")
        .with_function(Function::Sign, "SIGN")
        // Text
        .with_function(Function::Length, "LENGTH")
        .with_function(Function::LeftTrim, "LTRIM")
        .with_function(Function::RightTrim, "RTRIM")
        .with_function(Function::Position, "STRPOS")
        .with_template(Function::ToText, "CAST({0} AS VARCHAR)")
        .with_template(Function::ToNumber, "CAST({0} AS DOUBLE)")
        // Temporal
        .with_template(Function::Epoch, "FLOOR(EPOCH({0}))")
        .with_template(Function::DayOfWeek, "(DAYOFWEEK({0}) + 1)")
        .with_template(Function::AddYears, "({0} + {1} * INTERVAL 1 YEAR)")
        .with_template(Function::AddMonths, "({0} + {1} * INTERVAL 1 MONTH)")
        .with_template(Function::AddDays, "({0} + {1} * INTERVAL 1 DAY)")
        .with_template(Function::AddHours, "({0} + {1} * INTERVAL 1 HOUR)")
        .with_template(Function::AddMinutes, "({0} + {1} * INTERVAL 1 MINUTE)")
        .with_template(Function::AddSeconds, "({0} + {1} * INTERVAL 1 SECOND)")
        .with_template(Function::InstantLiteral, "TIMESTAMPTZ {0}")
        // Interval
        .with_template(Function::IntervalLiteral, "INTERVAL {0}")
        .with_template(Function::IntervalBetween, "AGE({0}, {1})")
        .with_template(Function::IntervalAdd, "({0} + {1})")
        .with_template(Function::IntervalSubtract, "({0} - {1})")
        .with_template(Function::IntervalYears, "DATE_PART('year', {0})")
        .with_template(Function::IntervalMonths, "DATE_PART('month', {0})")
        .with_template(Function::IntervalDays, "DATE_PART('day', {0})")
        .with_template(Function::IntervalHours, "DATE_PART('hour', {0})")
        .with_template(Function::IntervalMinutes, "DATE_PART('minute', {0})")
        .with_template(
            Function::IntervalSeconds,
            "(DATE_PART('microseconds', {0}) / 1000000.0)",
        )
}
