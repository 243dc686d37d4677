use crate::transpiler::dialect::DialectDescriptor;
use crate::transpiler::functions::{Feature, Function};

pub fn descriptor() -> DialectDescriptor {
    DialectDescriptor::new("postgres")
        .with_features([
            Feature::IntervalType,
            Feature::Geometry,
            Feature::CaseInsensitiveLike,
            Feature::NullsOrdering,
            Feature::BooleanValues,
            Feature::DateArithmeticWidens,
        ])
        // Numeric
        .with_function(Function::IntegerDivide, "DIV")
        .with_function(Function::Ceil, "CEIL")
        .with_function(Function::Sign, "SIGN")
        // Text
        .with_function(Function::Length, "LENGTH")
        .with_function(Function::LeftTrim, "LTRIM")
        .with_function(Function::RightTrim, "RTRIM")
        .with_function(Function::Position, "STRPOS")
        .with_template(Function::ToText, "CAST({0} AS TEXT)")
        .with_template(Function::ToNumber, "CAST({0} AS NUMERIC)")
        // Temporal
        .with_template(Function::AddYears, "({0} + {1} * INTERVAL '1 year')")
        .with_template(Function::AddMonths, "({0} + {1} * INTERVAL '1 month')")
        .with_template(Function::AddDays, "({0} + {1} * INTERVAL '1 day')")
        .with_template(Function::AddHours, "({0} + {1} * INTERVAL '1 hour')")
        .with_template(Function::AddMinutes, "({0} + {1} * INTERVAL '1 minute')")
        .with_template(Function::AddSeconds, "({0} + {1} * INTERVAL '1 second')")
        .with_template(Function::DayOfWeek, "CAST(EXTRACT(DOW FROM {0}) + 1 AS INTEGER)")
        .with_template(Function::InstantLiteral, "TIMESTAMPTZ {0}")
        // Interval
        .with_template(Function::IntervalLiteral, "INTERVAL {0}")
        .with_template(Function::IntervalBetween, "AGE({0}, {1})")
        .with_template(Function::IntervalAdd, "({0} + {1})")
        .with_template(Function::IntervalSubtract, "({0} - {1})")
        .with_template(Function::IntervalYears, "EXTRACT(YEAR FROM {0})")
        .with_template(Function::IntervalMonths, "EXTRACT(MONTH FROM {0})")
        .with_template(Function::IntervalDays, "EXTRACT(DAY FROM {0})")
        .with_template(Function::IntervalHours, "EXTRACT(HOUR FROM {0})")
        .with_template(Function::IntervalMinutes, "EXTRACT(MINUTE FROM {0})")
        .with_template(Function::IntervalSeconds, "EXTRACT(SECOND FROM {0})")
        // PostGIS
        .with_function(Function::GeometryFromText, "ST_GeomFromText")
        .with_function(Function::MakePoint, "ST_MakePoint")
        .with_function(Function::PointX, "ST_X")
        .with_function(Function::PointY, "ST_Y")
        .with_function(Function::GeometryEquals, "ST_Equals")
        .with_function(Function::Distance, "ST_Distance")
        .with_function(Function::BoundingBox, "ST_Envelope")
        .with_function(Function::GeometryAsText, "ST_AsText")
}
