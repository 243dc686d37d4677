//! DateRepeat components.

use crate::ast::builders::family::{Duration, Integer, Number};
use crate::ast::builders::typed::Typed;
use crate::ast::{TimeUnit, UnaryOp};

impl Typed<Duration> {
    pub fn years(self) -> Typed<Integer> {
        self.unary(UnaryOp::RepeatPart(TimeUnit::Year))
    }

    pub fn months(self) -> Typed<Integer> {
        self.unary(UnaryOp::RepeatPart(TimeUnit::Month))
    }

    pub fn days(self) -> Typed<Integer> {
        self.unary(UnaryOp::RepeatPart(TimeUnit::Day))
    }

    pub fn hours(self) -> Typed<Integer> {
        self.unary(UnaryOp::RepeatPart(TimeUnit::Hour))
    }

    pub fn minutes(self) -> Typed<Integer> {
        self.unary(UnaryOp::RepeatPart(TimeUnit::Minute))
    }

    /// Seconds including the fraction.
    pub fn seconds(self) -> Typed<Number> {
        self.unary(UnaryOp::RepeatPart(TimeUnit::Second))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::builders::{DateTimeExpr, DurationExpr};
    use crate::ast::DateRepeat;
    use crate::transpiler::{Dialect, ToSql};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_native_component() {
        let d = DurationExpr::column("span");
        assert_eq!(d.days().to_sql(), "EXTRACT(DAY FROM span)");
    }

    #[test]
    fn test_component_from_token_string() {
        let sql = DurationExpr::column("span")
            .months()
            .to_sql_with_dialect(Dialect::Ansi);
        assert_eq!(
            sql,
            "CAST(SUBSTRING(span FROM (POSITION('Y' IN span) + 1) FOR (POSITION('M' IN span) - POSITION('Y' IN span) - 1)) AS INTEGER)"
        );
    }

    #[test]
    fn test_repeat_between_is_nullable_guarded() {
        let a = DateTimeExpr::column("a");
        let b = DateTimeExpr::required_column("b");
        let sql = a.get_date_repeat_from(b).to_sql_with_dialect(Dialect::Ansi);
        assert!(sql.starts_with("CASE WHEN a IS NULL OR b IS NULL THEN NULL ELSE 'P' || "));
        assert!(sql.ends_with(" || 's' END"));
    }

    #[test]
    fn test_literal_repeat_component() {
        let d: DurationExpr = DateRepeat::years(2).into();
        assert_eq!(
            d.years().to_sql(),
            "EXTRACT(YEAR FROM INTERVAL '2 years 0 months 0 days 0 hours 0 minutes 0 seconds')"
        );
    }
}
