//! Typed expression builders.
//!
//! Each value family gets a `Typed<K>` alias and the operations that make
//! sense for it, so `age.is_greater_than("x")` does not compile.
//!
//! # Modules
//!
//! - `family` - Marker types and capability traits
//! - `typed` - The `Typed<K>` wrapper and family-independent operations
//! - `literals` - Conversions from Rust values
//! - `ordering` - Comparisons, BETWEEN, LEAST/GREATEST, MIN/MAX
//! - `numeric` - Arithmetic and numeric aggregates
//! - `boolean` - AND/OR/NOT and conditional values
//! - `string` - Text functions and pattern matching
//! - `temporal` - Date/time extraction, arithmetic and calendar anchors
//! - `duration` - DateRepeat components
//! - `spatial` - Points and polygons
//! - `case_when` - CASE WHEN expressions
//! - `window` - OVER clauses, LAG/LEAD and ranking
//!
//! # Example
//! ```ignore
//! use qail_expr::prelude::*;
//!
//! let due = DateExpr::column("due_date");
//! let overdue = due.is_less_than(current_date());
//! assert_eq!(overdue.to_sql(), "due_date < CURRENT_DATE");
//! ```

pub mod boolean;
pub mod case_when;
pub mod duration;
pub mod family;
pub mod literals;
pub mod numeric;
pub mod ordering;
pub mod spatial;
pub mod string;
pub mod temporal;
pub mod typed;
pub mod window;

pub use boolean::{all_of, any_of};
pub use case_when::{case_when, CaseBuilder};
pub use ordering::{greatest_of, least_of};
pub use spatial::point;
pub use temporal::{current_date, current_date_time, current_instant};
pub use typed::Typed;
pub use window::{dense_rank, rank, row_number, OffsetWindowBuilder, WindowBuilder};

pub type BooleanExpr = Typed<family::Boolean>;
pub type IntegerExpr = Typed<family::Integer>;
pub type NumberExpr = Typed<family::Number>;
pub type StringExpr = Typed<family::Text>;
pub type DateExpr = Typed<family::Date>;
pub type DateTimeExpr = Typed<family::DateTime>;
pub type InstantExpr = Typed<family::Instant>;
pub type DurationExpr = Typed<family::Duration>;
pub type PointExpr = Typed<family::Point>;
pub type PolygonExpr = Typed<family::Polygon>;
