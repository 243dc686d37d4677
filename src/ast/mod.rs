pub mod builders;
pub mod expr;
pub mod nulls;
pub mod operators;
pub mod repeat;
pub mod spatial;
pub mod values;
pub mod window;

pub use self::expr::{Column, ColumnRef, Expr};
pub use self::operators::{AggregateFunc, BinaryOp, DatePart, NaryOp, SortOrder, TimeUnit, UnaryOp};
pub use self::repeat::DateRepeat;
pub use self::spatial::{Point, Polygon};
pub use self::values::{Value, ValueKind};
pub use self::window::{FrameBound, OrderTerm, WindowExpr, WindowFrame, WindowFunction};
