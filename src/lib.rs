//! # qail-expr — Typed SQL Expressions
//!
//! > **Compose once. Render for any dialect.**
//!
//! Expressions are built through typed builders, checked for null and purity
//! propagation as they are composed, and rendered to the SQL of a target
//! dialect. Functions a dialect lacks are emulated from primitives it has.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use qail_expr::prelude::*;
//!
//! let adult = IntegerExpr::column("age").is_greater_than_or_equal(18);
//! adult.to_sql();                                  // "age >= 18"
//! adult.to_sql_with_dialect(Dialect::SqlServer);   // "[age] >= 18"
//!
//! let ctx = EvalContext::new().with("age", 21);
//! adult.evaluate(&ctx)?;                           // Value::Bool(true)
//! ```
//!
//! ## Families
//!
//! | Builder         | Values                          |
//! |-----------------|---------------------------------|
//! | `BooleanExpr`   | three-valued logic              |
//! | `IntegerExpr`   | whole numbers                   |
//! | `NumberExpr`    | exact or floating numbers       |
//! | `StringExpr`    | text                            |
//! | `DateExpr`      | calendar dates                  |
//! | `DateTimeExpr`  | local date-times                |
//! | `InstantExpr`   | UTC instants                    |
//! | `DurationExpr`  | date repeats (`P1Y2M3D0h0n0s`)  |
//! | `PointExpr`     | points                          |
//! | `PolygonExpr`   | polygons                        |

pub mod ast;
pub mod error;
pub mod eval;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::{
        Column, ColumnRef, DateRepeat, Expr, FrameBound, OrderTerm, Point, Polygon, SortOrder,
        TimeUnit, Value, ValueKind, WindowFrame,
    };
    pub use crate::error::*;
    pub use crate::eval::EvalContext;
    pub use crate::transpiler::{Dialect, DialectDescriptor, SqlGenerator, ToSql};
}
