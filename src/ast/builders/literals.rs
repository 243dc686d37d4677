//! Literal ingestion: native Rust values into typed leaf expressions.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use crate::ast::builders::family::{self, Family};
use crate::ast::builders::typed::Typed;
use crate::ast::{DateRepeat, Expr, Point, Polygon, Value};

fn lit<K: Family>(value: impl Into<Value>) -> Typed<K> {
    Typed::wrap(Expr::Literal(value.into()))
}

impl From<bool> for Typed<family::Boolean> {
    fn from(b: bool) -> Self {
        lit(b)
    }
}

impl From<i32> for Typed<family::Integer> {
    fn from(n: i32) -> Self {
        lit(n)
    }
}

impl From<i64> for Typed<family::Integer> {
    fn from(n: i64) -> Self {
        lit(n)
    }
}

impl From<i32> for Typed<family::Number> {
    fn from(n: i32) -> Self {
        lit(n)
    }
}

impl From<i64> for Typed<family::Number> {
    fn from(n: i64) -> Self {
        lit(n)
    }
}

impl From<f64> for Typed<family::Number> {
    fn from(n: f64) -> Self {
        lit(n)
    }
}

impl From<Decimal> for Typed<family::Number> {
    fn from(d: Decimal) -> Self {
        lit(d)
    }
}

/// Integers widen to numbers.
impl From<Typed<family::Integer>> for Typed<family::Number> {
    fn from(n: Typed<family::Integer>) -> Self {
        Typed::wrap(n.into_expr())
    }
}

impl From<&str> for Typed<family::Text> {
    fn from(s: &str) -> Self {
        lit(s)
    }
}

impl From<String> for Typed<family::Text> {
    fn from(s: String) -> Self {
        lit(s)
    }
}

impl From<NaiveDate> for Typed<family::Date> {
    fn from(d: NaiveDate) -> Self {
        lit(d)
    }
}

impl From<NaiveDateTime> for Typed<family::DateTime> {
    fn from(dt: NaiveDateTime) -> Self {
        lit(dt)
    }
}

impl From<chrono::DateTime<Utc>> for Typed<family::Instant> {
    fn from(dt: chrono::DateTime<Utc>) -> Self {
        lit(dt)
    }
}

impl From<DateRepeat> for Typed<family::Duration> {
    fn from(r: DateRepeat) -> Self {
        lit(r)
    }
}

impl From<Point> for Typed<family::Point> {
    fn from(p: Point) -> Self {
        lit(p)
    }
}

impl From<Polygon> for Typed<family::Polygon> {
    fn from(p: Polygon) -> Self {
        lit(p)
    }
}

/// `None` becomes the typed NULL literal.
impl<K: Family, T: Into<Typed<K>>> From<Option<T>> for Typed<K> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Typed::null(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{IntegerExpr, NumberExpr, StringExpr};
    use crate::ast::ValueKind;

    #[test]
    fn test_literal_kinds() {
        let n: IntegerExpr = 5.into();
        assert_eq!(n.expr(), &Expr::int(5));
        let s: StringExpr = "abc".into();
        assert_eq!(s.expr().kind(), ValueKind::Text);
    }

    #[test]
    fn test_none_is_typed_null() {
        let n: NumberExpr = Option::<f64>::None.into();
        assert!(n.is_always_null());
        assert_eq!(n.kind(), ValueKind::Number);
    }

    #[test]
    fn test_integer_widens_to_number() {
        let n: NumberExpr = IntegerExpr::column("qty").into();
        assert_eq!(n.expr().kind(), ValueKind::Integer);
        assert_eq!(n.kind(), ValueKind::Number);
    }
}
