use crate::transpiler::dialect::{ConcatStyle, DialectDescriptor, QuoteStyle};
use crate::transpiler::functions::{Feature, Function};

/// T-SQL. Predicates are not values, so boolean comparisons are emulated;
/// DATEDIFF counts boundaries crossed, so unit differences are emulated too.
pub fn descriptor() -> DialectDescriptor {
    DialectDescriptor::new("sqlserver")
        .with_quote(QuoteStyle::Bracket, true)
        .with_numeric_booleans()
        .with_concat(ConcatStyle::Plus)
        .with_features([Feature::Geometry])
        // Numeric
        .with_template(Function::Modulus, "({0} % {1})")
        .with_function(Function::Sign, "SIGN")
        // Text
        .with_template(Function::Trim, "LTRIM(RTRIM({0}))")
        .with_function(Function::LeftTrim, "LTRIM")
        .with_function(Function::RightTrim, "RTRIM")
        .with_function(Function::Length, "LEN")
        .with_function(Function::Substring, "SUBSTRING")
        .with_template(Function::Position, "CHARINDEX({1}, {0})")
        .with_template(Function::ToText, "CAST({0} AS NVARCHAR(MAX))")
        .with_template(Function::ToInteger, "CAST({0} AS INT)")
        .with_template(Function::ToNumber, "CAST({0} AS FLOAT)")
        .with_template(Function::ToDateTime, "CAST({0} AS DATETIME2)")
        // Temporal
        .with_template(Function::Year, "DATEPART(year, {0})")
        .with_template(Function::Month, "DATEPART(month, {0})")
        .with_template(Function::Day, "DATEPART(day, {0})")
        .with_template(Function::Hour, "DATEPART(hour, {0})")
        .with_template(Function::Minute, "DATEPART(minute, {0})")
        .with_template(Function::Second, "DATEPART(second, {0})")
        .with_template(Function::Subsecond, "(DATEPART(nanosecond, {0}) / 1000000000.0)")
        .with_template(Function::Epoch, "DATEDIFF_BIG(second, '1970-01-01', {0})")
        .with_template(Function::AddYears, "DATEADD(year, {1}, {0})")
        .with_template(Function::AddMonths, "DATEADD(month, {1}, {0})")
        .with_template(Function::AddDays, "DATEADD(day, {1}, {0})")
        .with_template(Function::AddHours, "DATEADD(hour, {1}, {0})")
        .with_template(Function::AddMinutes, "DATEADD(minute, {1}, {0})")
        .with_template(Function::AddSeconds, "DATEADD(second, {1}, {0})")
        .with_template(Function::CurrentDate, "CAST(SYSDATETIME() AS DATE)")
        .with_template(Function::CurrentDateTime, "SYSDATETIME()")
        .with_template(Function::CurrentInstant, "SYSUTCDATETIME()")
        .with_template(Function::DateLiteral, "CAST({0} AS DATE)")
        .with_template(Function::DateTimeLiteral, "CAST({0} AS DATETIME2)")
        .with_template(Function::InstantLiteral, "CAST({0} AS DATETIMEOFFSET)")
        // Spatial
        .with_template(Function::GeometryFromText, "geometry::STGeomFromText({0}, 0)")
        .with_template(Function::MakePoint, "geometry::Point({0}, {1}, 0)")
        .with_template(Function::PointX, "{0}.STX")
        .with_template(Function::PointY, "{0}.STY")
        .with_template(Function::GeometryEquals, "{0}.STEquals({1})")
        .with_template(Function::Distance, "{0}.STDistance({1})")
        .with_template(Function::BoundingBox, "{0}.STEnvelope()")
        .with_template(Function::GeometryAsText, "{0}.STAsText()")
}
