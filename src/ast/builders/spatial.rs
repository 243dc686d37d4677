//! Point and Polygon operations.

use crate::ast::builders::family::{Number, Point, Polygon, Text};
use crate::ast::builders::typed::Typed;
use crate::ast::{BinaryOp, UnaryOp};

/// Point from two numeric expressions.
pub fn point(x: impl Into<Typed<Number>>, y: impl Into<Typed<Number>>) -> Typed<Point> {
    let x: Typed<Number> = x.into();
    x.binary(BinaryOp::MakePoint, y.into())
}

impl Typed<Point> {
    pub fn x(self) -> Typed<Number> {
        self.unary(UnaryOp::PointX)
    }

    pub fn y(self) -> Typed<Number> {
        self.unary(UnaryOp::PointY)
    }

    /// Euclidean distance.
    pub fn distance_to(self, other: impl Into<Self>) -> Typed<Number> {
        self.binary(BinaryOp::Distance, other.into())
    }

    /// Degenerate polygon enclosing the point.
    pub fn bounding_box(self) -> Typed<Polygon> {
        self.unary(UnaryOp::BoundingBox)
    }

    /// WKT text.
    pub fn as_text(self) -> Typed<Text> {
        self.unary(UnaryOp::AsText)
    }
}

impl Typed<Polygon> {
    /// WKT text.
    pub fn as_text(self) -> Typed<Text> {
        self.unary(UnaryOp::AsText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{NumberExpr, PointExpr};
    use crate::transpiler::{Dialect, ToSql};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_native_geometry() {
        let p = point(NumberExpr::column("lon"), NumberExpr::column("lat"));
        assert_eq!(p.clone().to_sql(), "ST_MakePoint(lon, lat)");
        assert_eq!(p.x().to_sql(), "ST_X(ST_MakePoint(lon, lat))");
    }

    #[test]
    fn test_literal_point_is_wkt() {
        let p: PointExpr = crate::ast::Point::new(1.0, 2.0).into();
        assert_eq!(p.clone().to_sql(), "ST_GeomFromText('POINT(1 2)')");
        assert_eq!(p.to_sql_with_dialect(Dialect::Ansi), "'POINT(1 2)'");
    }

    #[test]
    fn test_point_equality_without_geometry() {
        let a = PointExpr::column("a");
        let b = PointExpr::column("b");
        let sql = a.is(b).to_sql_with_dialect(Dialect::SQLite);
        assert!(sql.contains(" AND "));
        assert!(sql.contains("SUBSTR("));
    }

    #[test]
    fn test_distance_emulated() {
        let a = PointExpr::column("a");
        let b = PointExpr::column("b");
        let sql = a.distance_to(b).to_sql_with_dialect(Dialect::Ansi);
        assert!(sql.starts_with("SQRT("));
    }
}
