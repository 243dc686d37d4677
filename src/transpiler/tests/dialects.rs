//! The same expressions rendered by each preset.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use super::{ansi, pg};
use crate::ast::builders::*;
use crate::transpiler::{Dialect, ToSql};

fn on(dialect: Dialect, e: &impl ToSql) -> String {
    e.to_sql_with_dialect(dialect)
}

#[test]
fn test_identifier_quoting_per_dialect() {
    let e = IntegerExpr::column("qty").is_greater_than(10);
    assert_eq!(pg(&e), "qty > 10");
    assert_eq!(on(Dialect::DuckDB, &e), "qty > 10");
    assert_eq!(on(Dialect::MySQL, &e), "`qty` > 10");
    assert_eq!(on(Dialect::BigQuery, &e), "`qty` > 10");
    assert_eq!(on(Dialect::SqlServer, &e), "[qty] > 10");
    assert_eq!(on(Dialect::SQLite, &e), "\"qty\" > 10");
    assert_eq!(on(Dialect::Oracle, &e), "\"qty\" > 10");
}

#[test]
fn test_boolean_literals() {
    let e = BooleanExpr::column("active").is(true);
    assert_eq!(pg(&e), "active = TRUE");
    assert_eq!(on(Dialect::MySQL, &e), "`active` = 1");
    assert_eq!(on(Dialect::SQLite, &e), "\"active\" = 1");
}

#[test]
fn test_boolean_comparison_without_boolean_values() {
    let e = BooleanExpr::column("active").is(true);
    assert_eq!(on(Dialect::SqlServer, &e), "[active] = 1");
    let e = BooleanExpr::column("active").is_not(false);
    assert_eq!(on(Dialect::Oracle, &e), "\"active\" <> 0");
    let e = BooleanExpr::column("active").is(BooleanExpr::column("archived"));
    assert_eq!(on(Dialect::SqlServer, &e), "[active] = [archived]");
}

#[test]
fn test_predicate_comparison_without_boolean_values() {
    let e = BooleanExpr::column("active").is(IntegerExpr::column("qty").is_greater_than(1));
    assert_eq!(
        on(Dialect::SqlServer, &e),
        "[active] = CASE WHEN [qty] > 1 THEN 1 WHEN NOT [qty] > 1 THEN 0 END"
    );
}

#[test]
fn test_current_date_time() {
    let now = current_date_time();
    assert_eq!(pg(&now), "LOCALTIMESTAMP");
    assert_eq!(on(Dialect::SqlServer, &now), "SYSDATETIME()");
    assert_eq!(on(Dialect::BigQuery, &now), "CURRENT_DATETIME()");
    assert_eq!(
        on(Dialect::SQLite, &now),
        "datetime(CURRENT_TIMESTAMP, 'localtime')"
    );
    assert_eq!(ansi(&current_date()), "CURRENT_DATE");
    assert_eq!(ansi(&current_instant()), "CURRENT_TIMESTAMP");
}

#[test]
fn test_date_literals() {
    let d = DateExpr::from(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(pg(&d), "DATE '2024-03-01'");
    assert_eq!(on(Dialect::SQLite, &d), "'2024-03-01'");
    assert_eq!(on(Dialect::SqlServer, &d), "CAST('2024-03-01' AS DATE)");
}

#[test]
fn test_text_length() {
    let e = StringExpr::column("name").length();
    assert_eq!(pg(&e), "LENGTH(name)");
    assert_eq!(ansi(&e), "CHAR_LENGTH(name)");
    assert_eq!(on(Dialect::SqlServer, &e), "LEN([name])");
}

#[test]
fn test_integer_division() {
    let e = IntegerExpr::column("total").integer_divided_by(2);
    assert_eq!(pg(&e), "DIV(total, 2)");
    assert_eq!(ansi(&e), "(total / 2)");
    assert_eq!(on(Dialect::MySQL, &e), "(`total` DIV 2)");
    assert_eq!(on(Dialect::Oracle, &e), "TRUNC(\"total\" / 2)");
}

#[test]
fn test_subsecond() {
    let e = DateTimeExpr::column("ts").subsecond();
    assert_eq!(on(Dialect::MySQL, &e), "(MICROSECOND(`ts`) / 1000000)");
    assert_eq!(
        ansi(&e),
        "(EXTRACT(SECOND FROM ts) - FLOOR(EXTRACT(SECOND FROM ts)))"
    );
}

#[test]
fn test_add_days() {
    let ts = DateTimeExpr::column("ts");
    let e = ts.add_days(3);
    assert_eq!(pg(&e), "(ts + 3 * INTERVAL '1 day')");
    assert_eq!(on(Dialect::MySQL, &e), "DATE_ADD(`ts`, INTERVAL 3 DAY)");
    assert_eq!(on(Dialect::SqlServer, &e), "DATEADD(day, 3, [ts])");
    assert_eq!(on(Dialect::Oracle, &e), "(\"ts\" + 3)");
    assert_eq!(on(Dialect::BigQuery, &e), "DATETIME_ADD(`ts`, INTERVAL 3 DAY)");
    assert_eq!(
        on(Dialect::SQLite, &e),
        "datetime(\"ts\", printf('%+d days', 3))"
    );
}

#[test]
fn test_date_arithmetic_narrows_back_to_date() {
    let e = DateExpr::column("due").add_days(3);
    assert_eq!(
        on(Dialect::SQLite, &e),
        "date(datetime(\"due\", printf('%+d days', 3)))"
    );
    assert_eq!(pg(&e), "CAST((due + 3 * INTERVAL '1 day') AS DATE)");
    assert_eq!(on(Dialect::MySQL, &e), "DATE_ADD(`due`, INTERVAL 3 DAY)");
}

#[test]
fn test_month_extraction() {
    let e = DateExpr::column("due").month();
    assert_eq!(pg(&e), "EXTRACT(MONTH FROM due)");
    assert_eq!(on(Dialect::MySQL, &e), "MONTH(`due`)");
    assert_eq!(
        on(Dialect::SQLite, &e),
        "CAST(strftime('%m', \"due\") AS INTEGER)"
    );
    assert_eq!(on(Dialect::SqlServer, &e), "DATEPART(month, [due])");
}

#[test]
fn test_case_insensitive_like() {
    let e = StringExpr::column("name").is_like_ignore_case("a%");
    assert_eq!(pg(&e), "name ILIKE 'a%'");
    assert_eq!(on(Dialect::DuckDB, &e), "name ILIKE 'a%'");
}

#[test]
fn test_every_preset_renders() {
    let e = DateTimeExpr::column("ts")
        .year()
        .plus(1)
        .is_greater_than(IntegerExpr::column("target"));
    for dialect in Dialect::ALL {
        let sql = on(dialect, &e);
        assert!(sql.contains('>'), "{:?}: {}", dialect, sql);
    }
}
