//! SQL Transpiler for expression trees.
//!
//! Rendering happens in two passes: `emulate::lower` rewrites every node the
//! target dialect cannot express natively into primitives it can, then
//! `render` walks the lowered tree and prints it with minimal parentheses.
//!
//! ```ignore
//! use qail_expr::prelude::*;
//!
//! let adult = IntegerExpr::column("age").is_greater_than_or_equal(18);
//! assert_eq!(adult.to_sql(), "age >= 18");
//! assert_eq!(adult.to_sql_with_dialect(Dialect::SqlServer), "[age] >= 18");
//! ```

pub mod dialect;
pub mod emulate;
pub mod functions;
pub mod render;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

pub use dialect::{BooleanLiterals, ConcatStyle, Dialect, DialectConfig, DialectDescriptor, QuoteStyle};
pub use functions::{Feature, Function, FunctionGroup, FunctionSyntax};
pub use traits::SqlGenerator;

use crate::ast::builders::family::Family;
use crate::ast::builders::Typed;
use crate::ast::{Expr, OrderTerm, WindowExpr};

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    /// Render for an arbitrary generator.
    fn to_sql_with(&self, generator: &dyn SqlGenerator) -> String;

    /// Render for the default dialect (PostgreSQL).
    fn to_sql(&self) -> String {
        self.to_sql_with(Dialect::default().generator())
    }

    /// Render for a preset dialect.
    fn to_sql_with_dialect(&self, dialect: Dialect) -> String {
        self.to_sql_with(dialect.generator())
    }
}

impl ToSql for Expr {
    fn to_sql_with(&self, generator: &dyn SqlGenerator) -> String {
        render::render(self, generator)
    }
}

impl<K: Family> ToSql for Typed<K> {
    fn to_sql_with(&self, generator: &dyn SqlGenerator) -> String {
        render::render(self.expr(), generator)
    }
}

impl ToSql for WindowExpr {
    fn to_sql_with(&self, generator: &dyn SqlGenerator) -> String {
        render::render(&Expr::Window(Box::new(self.clone())), generator)
    }
}

/// An ORDER BY term. Without native NULLS FIRST/LAST this may expand into
/// two comma-separated keys.
impl ToSql for OrderTerm {
    fn to_sql_with(&self, generator: &dyn SqlGenerator) -> String {
        render::render_order(std::slice::from_ref(self), generator)
    }
}
