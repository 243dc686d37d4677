use crate::transpiler::dialect::{ConcatStyle, DialectDescriptor, QuoteStyle};
use crate::transpiler::functions::{Feature, Function};

pub fn descriptor() -> DialectDescriptor {
    DialectDescriptor::new("mysql")
        .with_quote(QuoteStyle::Backtick, true)
        .with_numeric_booleans()
        .with_concat(ConcatStyle::Function)
        .with_features([Feature::Geometry, Feature::BooleanValues])
        // Numeric
        .with_template(Function::IntegerDivide, "({0} DIV {1})")
        .with_function(Function::Ceil, "CEIL")
        .with_function(Function::Sign, "SIGN")
        .with_function(Function::Greatest, "GREATEST")
        .with_function(Function::Least, "LEAST")
        // Text
        .with_function(Function::LeftTrim, "LTRIM")
        .with_function(Function::RightTrim, "RTRIM")
        .with_function(Function::Substring, "SUBSTRING")
        .with_template(Function::Position, "LOCATE({1}, {0})")
        .with_template(Function::ToText, "CAST({0} AS CHAR)")
        .with_template(Function::ToInteger, "CAST({0} AS SIGNED)")
        .with_template(Function::ToNumber, "CAST({0} AS DOUBLE)")
        .with_template(Function::ToDateTime, "CAST({0} AS DATETIME)")
        // Temporal
        .with_function(Function::Year, "YEAR")
        .with_function(Function::Month, "MONTH")
        .with_function(Function::Day, "DAYOFMONTH")
        .with_function(Function::Hour, "HOUR")
        .with_function(Function::Minute, "MINUTE")
        .with_function(Function::Second, "SECOND")
        .with_template(Function::Subsecond, "(MICROSECOND({0}) / 1000000)")
        .with_template(Function::Epoch, "FLOOR(UNIX_TIMESTAMP({0}))")
        .with_template(Function::AddYears, "DATE_ADD({0}, INTERVAL {1} YEAR)")
        .with_template(Function::AddMonths, "DATE_ADD({0}, INTERVAL {1} MONTH)")
        .with_template(Function::AddDays, "DATE_ADD({0}, INTERVAL {1} DAY)")
        .with_template(Function::AddHours, "DATE_ADD({0}, INTERVAL {1} HOUR)")
        .with_template(Function::AddMinutes, "DATE_ADD({0}, INTERVAL {1} MINUTE)")
        .with_template(Function::AddSeconds, "DATE_ADD({0}, INTERVAL {1} SECOND)")
        .with_function(Function::DayOfWeek, "DAYOFWEEK")
        .with_template(Function::YearsBetween, "TIMESTAMPDIFF(YEAR, {1}, {0})")
        .with_template(Function::MonthsBetween, "TIMESTAMPDIFF(MONTH, {1}, {0})")
        .with_template(Function::DaysBetween, "TIMESTAMPDIFF(DAY, {1}, {0})")
        .with_template(Function::HoursBetween, "TIMESTAMPDIFF(HOUR, {1}, {0})")
        .with_template(Function::MinutesBetween, "TIMESTAMPDIFF(MINUTE, {1}, {0})")
        .with_template(Function::SecondsBetween, "TIMESTAMPDIFF(SECOND, {1}, {0})")
        .with_template(Function::CurrentInstant, "UTC_TIMESTAMP()")
        .with_template(Function::InstantLiteral, "TIMESTAMP {0}")
        // Spatial
        .with_function(Function::GeometryFromText, "ST_GeomFromText")
        .with_function(Function::MakePoint, "POINT")
        .with_function(Function::PointX, "ST_X")
        .with_function(Function::PointY, "ST_Y")
        .with_function(Function::GeometryEquals, "ST_Equals")
        .with_function(Function::Distance, "ST_Distance")
        .with_function(Function::BoundingBox, "ST_Envelope")
        .with_function(Function::GeometryAsText, "ST_AsText")
}
