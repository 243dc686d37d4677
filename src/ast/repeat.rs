//! DateRepeat: a calendar-aware duration made of six signed components.
//!
//! Dialects without an interval type carry a DateRepeat as a token string:
//!
//! ```text
//! P{years}Y{months}M{days}D{hours}h{minutes}n{seconds}s
//! ```
//!
//! e.g. `P1Y-2M3D0h0n1.5s`. The marker characters are shared with the SQL
//! emulation that slices components back out of the string, so the Rust
//! parser and the generated SQL agree on one format.

use std::str::FromStr;

use nom::{
    IResult, Parser,
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, recognize},
    sequence::terminated,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ast::TimeUnit;
use crate::error::{ExprError, ExprResult};

/// Leading token of every DateRepeat string.
pub const REPEAT_PREFIX: &str = "P";

/// Opening and closing markers around the component for `unit`.
pub fn repeat_markers(unit: TimeUnit) -> (&'static str, &'static str) {
    match unit {
        TimeUnit::Year => ("P", "Y"),
        TimeUnit::Month => ("Y", "M"),
        TimeUnit::Day => ("M", "D"),
        TimeUnit::Hour => ("D", "h"),
        TimeUnit::Minute => ("h", "n"),
        TimeUnit::Second => ("n", "s"),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRepeat {
    pub years: i32,
    pub months: i32,
    pub days: i32,
    pub hours: i32,
    pub minutes: i32,
    /// Seconds including the fractional part.
    pub seconds: Decimal,
}

impl DateRepeat {
    pub fn new(years: i32, months: i32, days: i32, hours: i32, minutes: i32, seconds: Decimal) -> Self {
        Self {
            years,
            months,
            days,
            hours,
            minutes,
            seconds,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn years(n: i32) -> Self {
        Self { years: n, ..Self::default() }
    }

    pub fn months(n: i32) -> Self {
        Self { months: n, ..Self::default() }
    }

    pub fn days(n: i32) -> Self {
        Self { days: n, ..Self::default() }
    }

    pub fn hours(n: i32) -> Self {
        Self { hours: n, ..Self::default() }
    }

    pub fn minutes(n: i32) -> Self {
        Self { minutes: n, ..Self::default() }
    }

    pub fn seconds(n: Decimal) -> Self {
        Self { seconds: n, ..Self::default() }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Every component negated.
    pub fn negated(&self) -> Self {
        Self {
            years: -self.years,
            months: -self.months,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
        }
    }

    /// Component for `unit` as a decimal.
    pub fn component(&self, unit: TimeUnit) -> Decimal {
        match unit {
            TimeUnit::Year => Decimal::from(self.years),
            TimeUnit::Month => Decimal::from(self.months),
            TimeUnit::Day => Decimal::from(self.days),
            TimeUnit::Hour => Decimal::from(self.hours),
            TimeUnit::Minute => Decimal::from(self.minutes),
            TimeUnit::Second => self.seconds,
        }
    }

    /// Interval text understood by dialects with a native interval type,
    /// e.g. `1 years 2 months 3 days 4 hours 5 minutes 6.5 seconds`.
    pub fn to_interval_text(&self) -> String {
        format!(
            "{} years {} months {} days {} hours {} minutes {} seconds",
            self.years,
            self.months,
            self.days,
            self.hours,
            self.minutes,
            self.seconds.normalize()
        )
    }
}

impl std::fmt::Display for DateRepeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}Y{}M{}D{}h{}n{}s",
            REPEAT_PREFIX,
            self.years,
            self.months,
            self.days,
            self.hours,
            self.minutes,
            self.seconds.normalize()
        )
    }
}

impl FromStr for DateRepeat {
    type Err = ExprError;

    fn from_str(s: &str) -> ExprResult<Self> {
        match all_consuming(parse_repeat).parse(s.trim()) {
            Ok((_, repeat)) => Ok(repeat),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ExprError::parse(
                s.trim().len() - e.input.len(),
                format!("invalid date repeat '{}'", s),
            )),
            Err(nom::Err::Incomplete(_)) => {
                Err(ExprError::parse(s.len(), "incomplete date repeat"))
            }
        }
    }
}

fn signed_int(input: &str) -> IResult<&str, i32> {
    map_res(recognize((opt(char('-')), digit1)), |s: &str| s.parse::<i32>()).parse(input)
}

fn signed_decimal(input: &str) -> IResult<&str, Decimal> {
    map_res(
        recognize((opt(char('-')), digit1, opt((char('.'), digit1)))),
        Decimal::from_str,
    )
    .parse(input)
}

/// Parse a DateRepeat token: P1Y2M3D4h5n6.5s
fn parse_repeat(input: &str) -> IResult<&str, DateRepeat> {
    let (input, _) = tag(REPEAT_PREFIX).parse(input)?;
    let (input, years) = terminated(signed_int, char('Y')).parse(input)?;
    let (input, months) = terminated(signed_int, char('M')).parse(input)?;
    let (input, days) = terminated(signed_int, char('D')).parse(input)?;
    let (input, hours) = terminated(signed_int, char('h')).parse(input)?;
    let (input, minutes) = terminated(signed_int, char('n')).parse(input)?;
    let (input, seconds) = terminated(signed_decimal, char('s')).parse(input)?;

    Ok((
        input,
        DateRepeat {
            years,
            months,
            days,
            hours,
            minutes,
            seconds,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        let r = DateRepeat::new(1, -2, 3, 0, 0, Decimal::new(15, 1));
        assert_eq!(r.to_string(), "P1Y-2M3D0h0n1.5s");
    }

    #[test]
    fn test_parse_token() {
        let r: DateRepeat = "P-1Y0M14D23h59n0.250s".parse().unwrap();
        assert_eq!(r.years, -1);
        assert_eq!(r.days, 14);
        assert_eq!(r.hours, 23);
        assert_eq!(r.minutes, 59);
        assert_eq!(r.seconds, Decimal::new(25, 2));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = "P1Y2M".parse::<DateRepeat>().unwrap_err();
        assert!(matches!(err, ExprError::Parse { .. }));
        assert!("1Y2M3D4h5n6s".parse::<DateRepeat>().is_err());
    }

    #[test]
    fn test_markers_bracket_components() {
        let r = DateRepeat::new(7, 8, 9, 10, 11, Decimal::new(12, 0));
        let text = r.to_string();
        for unit in TimeUnit::ALL {
            let (open, close) = repeat_markers(unit);
            let start = text.find(open).unwrap() + 1;
            let end = text.find(close).unwrap();
            let piece: Decimal = text[start..end].parse().unwrap();
            assert_eq!(piece, r.component(unit));
        }
    }

    #[test]
    fn test_interval_text() {
        let r = DateRepeat::days(3);
        assert_eq!(
            r.to_interval_text(),
            "0 years 0 months 3 days 0 hours 0 minutes 0 seconds"
        );
    }
}
