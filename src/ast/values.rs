use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ast::repeat::DateRepeat;
use crate::ast::spatial::{Point, Polygon};

/// The value family an expression evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Untyped NULL; compatible with every family.
    Null,
    Boolean,
    Integer,
    Number,
    Text,
    /// Calendar date without time of day
    Date,
    /// Local date and time without zone
    DateTime,
    /// Absolute point in time (UTC)
    Instant,
    /// DateRepeat (years/months/days/hours/minutes/seconds)
    Duration,
    Point,
    Polygon,
}

impl ValueKind {
    /// Integer and Number.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Number)
    }

    /// Date, DateTime and Instant.
    pub fn is_temporal(&self) -> bool {
        matches!(self, ValueKind::Date | ValueKind::DateTime | ValueKind::Instant)
    }

    pub fn is_geometry(&self) -> bool {
        matches!(self, ValueKind::Point | ValueKind::Polygon)
    }

    /// Families that support <, <=, >, >=.
    pub fn is_ordered(&self) -> bool {
        self.is_numeric() || self.is_temporal() || matches!(self, ValueKind::Text)
    }

    /// True when a value of `other` may stand where `self` is expected.
    /// NULL fits everywhere and integers widen to numbers.
    pub fn accepts(&self, other: ValueKind) -> bool {
        other == ValueKind::Null
            || *self == ValueKind::Null
            || *self == other
            || (*self == ValueKind::Number && other == ValueKind::Integer)
    }

    /// Result family of arithmetic between two numeric kinds.
    pub fn promote(self, other: ValueKind) -> ValueKind {
        match (self, other) {
            (ValueKind::Integer, ValueKind::Integer) => ValueKind::Integer,
            (ValueKind::Null, k) | (k, ValueKind::Null) => k,
            _ => ValueKind::Number,
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Null => write!(f, "NULL"),
            ValueKind::Boolean => write!(f, "BOOLEAN"),
            ValueKind::Integer => write!(f, "INTEGER"),
            ValueKind::Number => write!(f, "NUMBER"),
            ValueKind::Text => write!(f, "TEXT"),
            ValueKind::Date => write!(f, "DATE"),
            ValueKind::DateTime => write!(f, "DATETIME"),
            ValueKind::Instant => write!(f, "INSTANT"),
            ValueKind::Duration => write!(f, "DURATION"),
            ValueKind::Point => write!(f, "POINT"),
            ValueKind::Polygon => write!(f, "POLYGON"),
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// Exact decimal
    Decimal(Decimal),
    /// String
    String(String),
    /// Calendar date
    Date(NaiveDate),
    /// Local date-time
    DateTime(NaiveDateTime),
    /// UTC instant
    Instant(DateTime<Utc>),
    /// Date repeat (duration)
    Repeat(DateRepeat),
    /// Spatial point
    Point(Point),
    /// Spatial polygon
    Polygon(Polygon),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Int(_) => ValueKind::Integer,
            Value::Float(_) | Value::Decimal(_) => ValueKind::Number,
            Value::String(_) => ValueKind::Text,
            Value::Date(_) => ValueKind::Date,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Instant(_) => ValueKind::Instant,
            Value::Repeat(_) => ValueKind::Duration,
            Value::Point(_) => ValueKind::Point,
            Value::Polygon(_) => ValueKind::Polygon,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text form of the value as a database would produce when casting to a
    /// character type. NULL has no text form.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::Float(n) => Some(n.to_string()),
            Value::Decimal(d) => Some(d.normalize().to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Value::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            Value::Instant(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            Value::Repeat(r) => Some(r.to_string()),
            Value::Point(p) => Some(p.to_string()),
            Value::Polygon(p) => Some(p.to_string()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "'{}'", s),
            Value::Date(d) => write!(f, "'{}'", d),
            Value::DateTime(dt) => write!(f, "'{}'", dt),
            Value::Instant(dt) => write!(f, "'{}'", dt),
            Value::Repeat(r) => write!(f, "'{}'", r),
            Value::Point(p) => write!(f, "'{}'", p),
            Value::Polygon(p) => write!(f, "'{}'", p),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::Instant(dt)
    }
}

impl From<DateRepeat> for Value {
    fn from(r: DateRepeat) -> Self {
        Value::Repeat(r)
    }
}

impl From<Point> for Value {
    fn from(p: Point) -> Self {
        Value::Point(p)
    }
}

impl From<Polygon> for Value {
    fn from(p: Polygon) -> Self {
        Value::Polygon(p)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_accepts() {
        assert!(ValueKind::Number.accepts(ValueKind::Integer));
        assert!(!ValueKind::Integer.accepts(ValueKind::Number));
        assert!(ValueKind::Date.accepts(ValueKind::Null));
        assert!(!ValueKind::Date.accepts(ValueKind::Instant));
    }

    #[test]
    fn test_option_ingestion() {
        let none: Option<i64> = None;
        assert_eq!(Value::from(none), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::String("a".to_string()));
    }

    #[test]
    fn test_text_forms() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(Value::Date(d).to_text().as_deref(), Some("2024-03-09"));
        assert_eq!(Value::Float(1.5).to_text().as_deref(), Some("1.5"));
        assert_eq!(Value::Null.to_text(), None);
    }
}
