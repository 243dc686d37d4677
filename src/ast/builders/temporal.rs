//! Date, DateTime and Instant operations.
//!
//! Calendar anchors are composed from extraction and unit addition only, so
//! every dialect that can add units and extract parts gets them for free.

use crate::ast::builders::family::{self, Duration, Integer, Number, Temporal};
use crate::ast::builders::typed::Typed;
use crate::ast::{BinaryOp, DatePart, Expr, TimeUnit, UnaryOp, ValueKind};

impl<K: Temporal> Typed<K> {
    fn extract<R: family::Family>(self, part: DatePart) -> Typed<R> {
        self.unary(UnaryOp::Extract(part))
    }

    fn add_unit<N: family::Family>(self, unit: TimeUnit, amount: Typed<N>) -> Self {
        self.binary(BinaryOp::AddUnit(unit), amount)
    }

    fn units_from(self, unit: TimeUnit, other: impl Into<Self>) -> Typed<Integer> {
        self.binary(BinaryOp::UnitsBetween(unit), other.into())
    }

    pub fn year(self) -> Typed<Integer> {
        self.extract(DatePart::Year)
    }

    pub fn month(self) -> Typed<Integer> {
        self.extract(DatePart::Month)
    }

    pub fn day(self) -> Typed<Integer> {
        self.extract(DatePart::Day)
    }

    pub fn hour(self) -> Typed<Integer> {
        self.extract(DatePart::Hour)
    }

    pub fn minute(self) -> Typed<Integer> {
        self.extract(DatePart::Minute)
    }

    /// Whole seconds, 0..59.
    pub fn second(self) -> Typed<Integer> {
        self.extract(DatePart::Second)
    }

    /// Fraction of the current second.
    pub fn subsecond(self) -> Typed<Number> {
        self.extract(DatePart::Subsecond)
    }

    /// 1 (Sunday) to 7 (Saturday).
    pub fn day_of_week(self) -> Typed<Integer> {
        self.unary(UnaryOp::DayOfWeek)
    }

    pub fn add_years(self, n: impl Into<Typed<Integer>>) -> Self {
        self.add_unit(TimeUnit::Year, n.into())
    }

    pub fn add_months(self, n: impl Into<Typed<Integer>>) -> Self {
        self.add_unit(TimeUnit::Month, n.into())
    }

    pub fn add_weeks(self, n: impl Into<Typed<Integer>>) -> Self {
        self.add_days(n.into().times(7))
    }

    pub fn add_days(self, n: impl Into<Typed<Integer>>) -> Self {
        self.add_unit(TimeUnit::Day, n.into())
    }

    pub fn add_hours(self, n: impl Into<Typed<Integer>>) -> Self {
        self.add_unit(TimeUnit::Hour, n.into())
    }

    pub fn add_minutes(self, n: impl Into<Typed<Integer>>) -> Self {
        self.add_unit(TimeUnit::Minute, n.into())
    }

    /// Seconds may carry a fraction.
    pub fn add_seconds(self, n: impl Into<Typed<Number>>) -> Self {
        self.add_unit(TimeUnit::Second, n.into())
    }

    pub fn set_year(self, year: impl Into<Typed<Integer>>) -> Self {
        let delta = year.into().minus(self.clone().year());
        self.add_years(delta)
    }

    pub fn set_month(self, month: impl Into<Typed<Integer>>) -> Self {
        let delta = month.into().minus(self.clone().month());
        self.add_months(delta)
    }

    pub fn set_day(self, day: impl Into<Typed<Integer>>) -> Self {
        let delta = day.into().minus(self.clone().day());
        self.add_days(delta)
    }

    pub fn set_hour(self, hour: impl Into<Typed<Integer>>) -> Self {
        let delta = hour.into().minus(self.clone().hour());
        self.add_hours(delta)
    }

    pub fn set_minute(self, minute: impl Into<Typed<Integer>>) -> Self {
        let delta = minute.into().minus(self.clone().minute());
        self.add_minutes(delta)
    }

    pub fn set_second(self, second: impl Into<Typed<Integer>>) -> Self {
        let delta = second.into().minus(self.clone().second());
        self.add_seconds(delta)
    }

    /// Whole years elapsed from `other` to `self`.
    pub fn years_from(self, other: impl Into<Self>) -> Typed<Integer> {
        self.units_from(TimeUnit::Year, other)
    }

    pub fn months_from(self, other: impl Into<Self>) -> Typed<Integer> {
        self.units_from(TimeUnit::Month, other)
    }

    pub fn weeks_from(self, other: impl Into<Self>) -> Typed<Integer> {
        self.days_from(other).integer_divided_by(7)
    }

    pub fn days_from(self, other: impl Into<Self>) -> Typed<Integer> {
        self.units_from(TimeUnit::Day, other)
    }

    pub fn hours_from(self, other: impl Into<Self>) -> Typed<Integer> {
        self.units_from(TimeUnit::Hour, other)
    }

    pub fn minutes_from(self, other: impl Into<Self>) -> Typed<Integer> {
        self.units_from(TimeUnit::Minute, other)
    }

    pub fn seconds_from(self, other: impl Into<Self>) -> Typed<Integer> {
        self.units_from(TimeUnit::Second, other)
    }

    /// Day 1 of the same month, time of day kept.
    pub fn first_of_month(self) -> Self {
        let back = Typed::<Integer>::from(1).minus(self.clone().day());
        self.add_days(back)
    }

    /// Midnight of the same day. Dates are returned unchanged.
    pub fn at_start_of_day(self) -> Self {
        if !K::HAS_TIME {
            return self;
        }
        let hours = self.clone().hour().negate();
        let minutes = self.clone().minute().negate();
        let seconds = self
            .clone()
            .second()
            .to_number()
            .plus(self.clone().subsecond())
            .negate();
        self.add_hours(hours).add_minutes(minutes).add_seconds(seconds)
    }

    /// Day 1 of the month at midnight.
    pub fn at_start_of_month(self) -> Self {
        self.first_of_month().at_start_of_day()
    }

    /// Last day of the month, time of day kept.
    pub fn end_of_month(self) -> Self {
        self.first_of_month().add_months(1).add_days(-1)
    }

    /// January 1st at midnight.
    pub fn at_start_of_year(self) -> Self {
        let back = Typed::<Integer>::from(1).minus(self.clone().month());
        self.first_of_month().add_months(back).at_start_of_day()
    }

    /// December 31st, at 23:59:59 for time-bearing families.
    pub fn at_end_of_year(self) -> Self {
        let last_day = self.at_start_of_year().add_years(1).add_days(-1);
        if K::HAS_TIME {
            last_day.add_hours(23).add_minutes(59).add_seconds(59)
        } else {
            last_day
        }
    }

    /// Component-wise difference `self - other` as a DateRepeat.
    pub fn get_date_repeat_from(self, other: impl Into<Self>) -> Typed<Duration> {
        self.binary(BinaryOp::RepeatBetween, other.into())
    }

    /// Add a DateRepeat: years, months, days, hours, minutes, seconds in turn.
    pub fn plus(self, repeat: impl Into<Typed<Duration>>) -> Self {
        self.binary(BinaryOp::AddRepeat, repeat.into())
    }

    /// Subtract a DateRepeat, component by component.
    pub fn minus(self, repeat: impl Into<Typed<Duration>>) -> Self {
        self.binary(BinaryOp::SubtractRepeat, repeat.into())
    }

    pub fn to_date(self) -> Typed<family::Date> {
        self.unary(UnaryOp::ToDate)
    }
}

/// The current date.
pub fn current_date() -> Typed<family::Date> {
    Typed::wrap(Expr::Current(ValueKind::Date))
}

/// The current local date and time.
pub fn current_date_time() -> Typed<family::DateTime> {
    Typed::wrap(Expr::Current(ValueKind::DateTime))
}

/// The current instant in UTC.
pub fn current_instant() -> Typed<family::Instant> {
    Typed::wrap(Expr::Current(ValueKind::Instant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{DateExpr, DateTimeExpr};
    use crate::ast::DateRepeat;
    use crate::transpiler::{Dialect, ToSql};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_days_per_dialect() {
        let ts = DateTimeExpr::column("ts").add_days(3);
        assert_eq!(ts.to_sql(), "(ts + 3 * INTERVAL '1 day')");
        assert_eq!(
            ts.to_sql_with_dialect(Dialect::MySQL),
            "DATE_ADD(`ts`, INTERVAL 3 DAY)"
        );
        assert_eq!(
            ts.to_sql_with_dialect(Dialect::SqlServer),
            "DATEADD(day, 3, [ts])"
        );
    }

    #[test]
    fn test_date_arithmetic_stays_a_date() {
        let d = DateExpr::column("d").add_months(1);
        assert_eq!(d.to_sql(), "CAST((d + 1 * INTERVAL '1 month') AS DATE)");
    }

    #[test]
    fn test_extraction() {
        let d = DateExpr::column("d");
        assert_eq!(d.clone().year().to_sql(), "EXTRACT(YEAR FROM d)");
        assert_eq!(
            d.clone().day_of_week().to_sql(),
            "CAST(EXTRACT(DOW FROM d) + 1 AS INTEGER)"
        );
        assert_eq!(
            d.month().to_sql_with_dialect(Dialect::SQLite),
            "CAST(strftime('%m', \"d\") AS INTEGER)"
        );
    }

    #[test]
    fn test_differences() {
        let a = DateTimeExpr::column("a");
        let b = DateTimeExpr::column("b");
        assert_eq!(
            a.clone().years_from(b.clone()).to_sql_with_dialect(Dialect::MySQL),
            "TIMESTAMPDIFF(YEAR, `b`, `a`)"
        );
        assert_eq!(
            a.seconds_from(b).to_sql_with_dialect(Dialect::Ansi),
            "CAST(FLOOR(EXTRACT(EPOCH FROM a)) AS BIGINT) - CAST(FLOOR(EXTRACT(EPOCH FROM b)) AS BIGINT)"
        );
    }

    #[test]
    fn test_current_leaves_are_not_pure() {
        assert!(!current_date().is_purely_functional());
        assert_eq!(current_date().to_sql(), "CURRENT_DATE");
        assert_eq!(current_instant().to_sql(), "CURRENT_TIMESTAMP");
    }

    #[test]
    fn test_repeat_from_null_is_null() {
        let repeat = DateExpr::column("d").get_date_repeat_from(DateExpr::null());
        assert!(repeat.is_always_null());
        assert_eq!(repeat.to_sql_with_dialect(Dialect::Ansi), "NULL");
    }

    #[test]
    fn test_plus_literal_repeat_on_postgres() {
        let ts = DateTimeExpr::column("ts").plus(DateRepeat::days(2));
        assert_eq!(
            ts.to_sql(),
            "(ts + INTERVAL '0 years 0 months 2 days 0 hours 0 minutes 0 seconds')"
        );
    }
}
