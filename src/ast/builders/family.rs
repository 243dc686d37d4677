//! Marker types for the value families.
//!
//! Each marker fixes the `ValueKind` a `Typed` expression carries, and the
//! capability traits (`Ordered`, `Numeric`, `Temporal`, `Geometry`) decide
//! which operations the family exposes.

use crate::ast::ValueKind;

/// A value family.
pub trait Family: Copy + std::fmt::Debug + PartialEq + Send + Sync + 'static {
    const KIND: ValueKind;
}

/// Families with a total order (<, <=, >, >=, BETWEEN, MIN/MAX).
pub trait Ordered: Family {}

/// Integer and Number.
pub trait Numeric: Ordered {}

/// Date, DateTime and Instant.
pub trait Temporal: Ordered {
    /// False for calendar dates without a time of day.
    const HAS_TIME: bool;
}

/// Point and Polygon.
pub trait Geometry: Family {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boolean;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instant;

/// DateRepeat values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polygon;

impl Family for Boolean {
    const KIND: ValueKind = ValueKind::Boolean;
}

impl Family for Integer {
    const KIND: ValueKind = ValueKind::Integer;
}

impl Family for Number {
    const KIND: ValueKind = ValueKind::Number;
}

impl Family for Text {
    const KIND: ValueKind = ValueKind::Text;
}

impl Family for Date {
    const KIND: ValueKind = ValueKind::Date;
}

impl Family for DateTime {
    const KIND: ValueKind = ValueKind::DateTime;
}

impl Family for Instant {
    const KIND: ValueKind = ValueKind::Instant;
}

impl Family for Duration {
    const KIND: ValueKind = ValueKind::Duration;
}

impl Family for Point {
    const KIND: ValueKind = ValueKind::Point;
}

impl Family for Polygon {
    const KIND: ValueKind = ValueKind::Polygon;
}

impl Ordered for Integer {}
impl Ordered for Number {}
impl Ordered for Text {}
impl Ordered for Date {}
impl Ordered for DateTime {}
impl Ordered for Instant {}

impl Numeric for Integer {}
impl Numeric for Number {}

impl Temporal for Date {
    const HAS_TIME: bool = false;
}

impl Temporal for DateTime {
    const HAS_TIME: bool = true;
}

impl Temporal for Instant {
    const HAS_TIME: bool = true;
}

impl Geometry for Point {}
impl Geometry for Polygon {}
