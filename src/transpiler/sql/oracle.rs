use crate::transpiler::dialect::{DialectDescriptor, QuoteStyle};
use crate::transpiler::functions::{Feature, Function};

pub fn descriptor() -> DialectDescriptor {
    DialectDescriptor::new("oracle")
        .with_quote(QuoteStyle::Double, true)
        .with_numeric_booleans()
        .with_features([Feature::NullsOrdering])
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
        .with_function(Function::Substring, "SUBSTR")
        .with_function(Function::Position, "INSTR")
        .with_template(Function::ToText, "TO_CHAR({0})")
        .with_template(Function::ToInteger, "CAST({0} AS NUMBER(19))")
        .with_template(Function::ToNumber, "CAST({0} AS BINARY_DOUBLE)")
        // Temporal
        .with_template(
            Function::Epoch,
            "FLOOR((CAST({0} AS DATE) - DATE '1970-01-01') * 86400)",
        )
        .with_template(Function::AddYears, "ADD_MONTHS({0}, {1} * 12)")
        .with_template(Function::AddMonths, "ADD_MONTHS({0}, {1})")
        .with_template(Function::AddDays, "({0} + {1})")
        .with_template(Function::AddHours, "({0} + NUMTODSINTERVAL({1}, 'HOUR'))")
        .with_template(Function::AddMinutes, "({0} + NUMTODSINTERVAL({1}, 'MINUTE'))")
        .with_template(Function::AddSeconds, "({0} + NUMTODSINTERVAL({1}, 'SECOND'))")
        .with_template(Function::CurrentDate, "TRUNC(SYSDATE)")
        .with_template(Function::CurrentInstant, "SYS_EXTRACT_UTC(SYSTIMESTAMP)")
        .with_template(Function::InstantLiteral, "TIMESTAMP {0}")
}
