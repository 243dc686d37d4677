//! Functions a dialect lacks, rebuilt from the primitives it has.

use pretty_assertions::assert_eq;

use super::{ansi, pg};
use crate::ast::DateRepeat;
use crate::ast::builders::*;
use crate::transpiler::{Dialect, ToSql};

fn on(dialect: Dialect, e: &impl ToSql) -> String {
    e.to_sql_with_dialect(dialect)
}

#[test]
fn test_greatest_native_or_case() {
    let e: IntegerExpr = greatest_of([IntegerExpr::column("a"), IntegerExpr::column("b")]);
    assert_eq!(
        pg(&e),
        "CASE WHEN a IS NULL OR b IS NULL THEN NULL WHEN a >= b THEN a ELSE b END"
    );
    assert_eq!(on(Dialect::MySQL, &e), "GREATEST(`a`, `b`)");
    assert_eq!(on(Dialect::SQLite, &e), "MAX(\"a\", \"b\")");
}

#[test]
fn test_least_of_three() {
    let e: IntegerExpr = least_of([
        IntegerExpr::column("a"),
        IntegerExpr::column("b"),
        IntegerExpr::column("c"),
    ]);
    assert_eq!(
        ansi(&e),
        "CASE WHEN a IS NULL OR b IS NULL OR c IS NULL THEN NULL \
         WHEN a <= b AND a <= c THEN a \
         WHEN b <= a AND b <= c THEN b \
         ELSE c END"
    );
    assert_eq!(on(Dialect::Oracle, &e), "LEAST(\"a\", \"b\", \"c\")");
}

#[test]
fn test_greatest_of_many_columns_stays_small() {
    let columns: Vec<IntegerExpr> = (0..20)
        .map(|i| IntegerExpr::column(format!("c{}", i)))
        .collect();
    let e: IntegerExpr = greatest_of(columns);
    let sql = pg(&e);
    // one guard plus one branch per argument, each naming every column once
    assert!(sql.len() < 20 * 20 * 16, "{} chars", sql.len());
    assert!(sql.starts_with("CASE WHEN c0 IS NULL OR c1 IS NULL"));
    assert!(sql.contains("WHEN c7 >= c0 AND c7 >= c1 AND"));
    assert!(sql.ends_with("ELSE c19 END"));
}

#[test]
fn test_sign() {
    let e = NumberExpr::column("delta").sign();
    assert_eq!(pg(&e), "SIGN(delta)");
    assert_eq!(
        ansi(&e),
        "CASE WHEN delta > 0 THEN 1 WHEN delta < 0 THEN -1 WHEN delta = 0 THEN 0 END"
    );
}

#[test]
fn test_case_insensitive_like_lowers_both_sides() {
    let e = StringExpr::column("name").is_like_ignore_case("a%");
    assert_eq!(
        on(Dialect::SqlServer, &e),
        "LOWER([name]) LIKE LOWER('a%')"
    );
    assert_eq!(on(Dialect::MySQL, &e), "LOWER(`name`) LIKE LOWER('a%')");
}

#[test]
fn test_day_of_week_from_epoch_days() {
    let e = DateExpr::column("due").day_of_week();
    assert_eq!(
        ansi(&e),
        "MOD(MOD((CAST(FLOOR(EXTRACT(EPOCH FROM due)) AS BIGINT) / 86400), 7) + 11, 7) + 1"
    );
    assert_eq!(pg(&e), "CAST(EXTRACT(DOW FROM due) + 1 AS INTEGER)");
}

#[test]
fn test_months_between_dates() {
    let e = DateExpr::column("ends").months_from(DateExpr::column("starts"));
    let raw = "(EXTRACT(YEAR FROM ends) - EXTRACT(YEAR FROM starts)) * 12 \
               + (EXTRACT(MONTH FROM ends) - EXTRACT(MONTH FROM starts))";
    let (later, earlier) = ("EXTRACT(DAY FROM ends)", "EXTRACT(DAY FROM starts)");
    assert_eq!(
        ansi(&e),
        format!(
            "CASE WHEN {raw} > 0 AND {later} < {earlier} THEN {raw} - 1 \
             WHEN {raw} < 0 AND {later} > {earlier} THEN {raw} + 1 ELSE {raw} END"
        )
    );
}

#[test]
fn test_days_between_on_boundary_counting_dialect() {
    let e = DateTimeExpr::column("ends").days_from(DateTimeExpr::column("starts"));
    assert_eq!(
        on(Dialect::SqlServer, &e),
        "((DATEDIFF_BIG(second, '1970-01-01', [ends]) \
         - DATEDIFF_BIG(second, '1970-01-01', [starts])) / 86400)"
    );
}

#[test]
fn test_days_between_divides_whole_epoch_seconds() {
    let e = DateTimeExpr::column("a").days_from(DateTimeExpr::column("b"));
    assert_eq!(
        on(Dialect::Redshift, &e),
        "((CAST(FLOOR(DATE_PART(epoch, \"a\")) AS BIGINT) \
         - CAST(FLOOR(DATE_PART(epoch, \"b\")) AS BIGINT)) / 86400)"
    );
}

#[test]
fn test_point_coordinates_from_wkt() {
    let e = PointExpr::column("p").x();
    assert_eq!(pg(&e), "ST_X(p)");
    assert_eq!(
        on(Dialect::SQLite, &e),
        "CAST(SUBSTR(\"p\", INSTR(\"p\", '(') + 1, \
         INSTR(\"p\", ' ') - INSTR(\"p\", '(') - 1) AS REAL)"
    );
}

#[test]
fn test_make_point_as_text() {
    let e = point(NumberExpr::column("x"), NumberExpr::column("y"));
    assert_eq!(pg(&e), "ST_MakePoint(x, y)");
    assert_eq!(
        ansi(&e),
        "'POINT(' || CAST(x AS VARCHAR(255)) || ' ' || CAST(y AS VARCHAR(255)) || ')'"
    );
}

#[test]
fn test_geometry_equality() {
    let a = PointExpr::column("a");
    let b = PointExpr::column("b");
    assert_eq!(pg(&a.copy().is(b.copy())), "ST_Equals(a, b)");
    assert_eq!(pg(&a.is_not(b)), "NOT ST_Equals(a, b)");
    let e = PolygonExpr::column("a").is(PolygonExpr::column("b"));
    assert_eq!(ansi(&e), "a = b");
}

#[test]
fn test_distance_without_geometry() {
    let e = PointExpr::column("a").distance_to(PointExpr::column("b"));
    assert_eq!(pg(&e), "ST_Distance(a, b)");
    assert!(ansi(&e).starts_with("SQRT("));
}

#[test]
fn test_date_plus_literal_repeat_is_chained() {
    let e = DateExpr::column("due").plus(DateRepeat::months(1));
    assert_eq!(pg(&e), "CAST((due + 1 * INTERVAL '1 month') AS DATE)");
}

#[test]
fn test_date_time_minus_literal_repeat() {
    let e = DateTimeExpr::column("ts").minus(DateRepeat::days(2));
    assert_eq!(ansi(&e), "(ts + (-2) * INTERVAL '1' DAY)");
}

#[test]
fn test_repeat_column_addition_parses_tokens() {
    let e = DateTimeExpr::column("ts").plus(DurationExpr::column("span"));
    let sql = on(Dialect::SQLite, &e);
    assert!(sql.starts_with("datetime(datetime("), "{}", sql);
    assert!(sql.contains("printf('%+d years'"), "{}", sql);
    assert!(sql.contains("INSTR(\"span\", 'P')"), "{}", sql);
}

#[test]
fn test_literal_repeat_component() {
    let e = DurationExpr::from(DateRepeat::days(4)).days();
    assert_eq!(ansi(&e), "4");
}

#[test]
fn test_repeat_between_dates() {
    let e = DateExpr::required_column("ends")
        .get_date_repeat_from(DateExpr::required_column("starts"));
    let sql = ansi(&e);
    assert!(sql.starts_with("'P' || CAST((EXTRACT(YEAR FROM ends)"), "{}", sql);
    assert!(sql.ends_with(" || 'D0h0n0s'"), "{}", sql);

    let e = DateExpr::column("ends").get_date_repeat_from(DateExpr::column("starts"));
    let sql = ansi(&e);
    assert!(
        sql.starts_with("CASE WHEN ends IS NULL OR starts IS NULL THEN NULL ELSE 'P' || "),
        "{}",
        sql
    );
}
