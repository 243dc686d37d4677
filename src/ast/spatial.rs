//! Spatial values and their well-known-text (WKT) form.
//!
//! Dialects without geometry support carry points and polygons as WKT
//! strings (`POINT(1 2)`, `POLYGON((0 0, 1 0, 1 1, 0 0))`); the emulation
//! layer slices coordinates back out of that text between fixed delimiters.

use std::str::FromStr;

use nom::{
    IResult, Parser,
    bytes::complete::tag_no_case,
    character::complete::{char, multispace0, multispace1},
    combinator::all_consuming,
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded, separated_pair},
};
use serde::{Deserialize, Serialize};

use crate::error::{ExprError, ExprResult};

/// Delimiters around the x coordinate inside `POINT(x y)`.
pub const WKT_X_DELIMITERS: (&str, &str) = ("(", " ");
/// Delimiters around the y coordinate inside `POINT(x y)`.
pub const WKT_Y_DELIMITERS: (&str, &str) = (" ", ")");

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((other.x - self.x) * (other.x - self.x) + (other.y - self.y) * (other.y - self.y)).sqrt()
    }

    /// Degenerate closed ring that repeats this point at all four corners.
    pub fn bounding_box(&self) -> Polygon {
        Polygon::new(vec![*self; 5])
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "POINT({} {})", self.x, self.y)
    }
}

impl FromStr for Point {
    type Err = ExprError;

    fn from_str(s: &str) -> ExprResult<Self> {
        finish(s, all_consuming(parse_point).parse(s.trim()), "point")
    }
}

/// A polygon given by its exterior ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub ring: Vec<Point>,
}

impl Polygon {
    pub fn new(ring: Vec<Point>) -> Self {
        Self { ring }
    }

    /// Axis-aligned envelope as a closed five-point ring.
    pub fn bounding_box(&self) -> Polygon {
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.ring {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Polygon::new(vec![
            Point::new(min_x, min_y),
            Point::new(max_x, min_y),
            Point::new(max_x, max_y),
            Point::new(min_x, max_y),
            Point::new(min_x, min_y),
        ])
    }
}

impl std::fmt::Display for Polygon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "POLYGON((")?;
        for (i, p) in self.ring.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", p.x, p.y)?;
        }
        write!(f, "))")
    }
}

impl FromStr for Polygon {
    type Err = ExprError;

    fn from_str(s: &str) -> ExprResult<Self> {
        finish(s, all_consuming(parse_polygon).parse(s.trim()), "polygon")
    }
}

fn finish<T>(source: &str, result: IResult<&str, T>, what: &str) -> ExprResult<T> {
    match result {
        Ok((_, value)) => Ok(value),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ExprError::parse(
            source.trim().len() - e.input.len(),
            format!("invalid {} WKT '{}'", what, source),
        )),
        Err(nom::Err::Incomplete(_)) => Err(ExprError::parse(
            source.len(),
            format!("incomplete {} WKT", what),
        )),
    }
}

/// `x y` coordinate pair.
fn parse_coordinates(input: &str) -> IResult<&str, Point> {
    let (input, (x, y)) = separated_pair(
        preceded(multispace0, double),
        multispace1,
        double,
    )
    .parse(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, Point::new(x, y)))
}

/// `POINT(x y)`, optional space after the keyword.
fn parse_point(input: &str) -> IResult<&str, Point> {
    preceded(
        (tag_no_case("POINT"), multispace0),
        delimited(char('('), parse_coordinates, char(')')),
    )
    .parse(input)
}

/// `POLYGON((x y, x y, ...))`
fn parse_polygon(input: &str) -> IResult<&str, Polygon> {
    let (input, _) = (tag_no_case("POLYGON"), multispace0, char('('), char('(')).parse(input)?;
    let (input, ring) = separated_list1(char(','), parse_coordinates).parse(input)?;
    let (input, _) = (char(')'), char(')')).parse(input)?;
    Ok((input, Polygon::new(ring)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_wkt() {
        let p = Point::new(1.0, 2.0);
        assert_eq!(p.to_string(), "POINT(1 2)");
        assert_eq!("POINT (1 2)".parse::<Point>().unwrap(), p);
        assert_eq!("point(-1.5 2e3)".parse::<Point>().unwrap(), Point::new(-1.5, 2000.0));
    }

    #[test]
    fn test_polygon_wkt() {
        let poly: Polygon = "POLYGON((0 0, 2 0, 2 3, 0 0))".parse().unwrap();
        assert_eq!(poly.ring.len(), 4);
        assert_eq!(poly.to_string(), "POLYGON((0 0, 2 0, 2 3, 0 0))");
    }

    #[test]
    fn test_point_bounding_box_is_degenerate() {
        let bbox = Point::new(3.0, 4.0).bounding_box();
        assert_eq!(bbox.to_string(), "POLYGON((3 4, 3 4, 3 4, 3 4, 3 4))");
    }

    #[test]
    fn test_polygon_bounding_box() {
        let poly: Polygon = "POLYGON((0 0, 2 -1, 1 3, 0 0))".parse().unwrap();
        assert_eq!(
            poly.bounding_box().to_string(),
            "POLYGON((0 -1, 2 -1, 2 3, 0 3, 0 -1))"
        );
    }

    #[test]
    fn test_bad_wkt() {
        assert!("POINT(1)".parse::<Point>().is_err());
        assert!("LINESTRING(0 0, 1 1)".parse::<Polygon>().is_err());
    }

    #[test]
    fn test_distance() {
        assert_eq!(Point::new(0.0, 0.0).distance_to(&Point::new(3.0, 4.0)), 5.0);
    }
}
