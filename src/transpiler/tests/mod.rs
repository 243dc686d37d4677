//! Transpiler tests: shared helpers and cross-cutting cases.

mod dialects;
mod emulation;

use pretty_assertions::assert_eq;

use crate::ast::builders::*;
use crate::ast::{OrderTerm, SortOrder};
use crate::error::ExprError;
use crate::transpiler::{Dialect, DialectDescriptor, SqlGenerator, ToSql};

pub(super) fn pg<T: ToSql>(e: &T) -> String {
    e.to_sql_with_dialect(Dialect::Postgres)
}

pub(super) fn ansi<T: ToSql>(e: &T) -> String {
    e.to_sql_with_dialect(Dialect::Ansi)
}

#[test]
fn test_default_dialect_is_postgres() {
    let e = IntegerExpr::column("qty").is_greater_than(10);
    assert_eq!(e.to_sql(), pg(&e));
    assert_eq!(e.to_sql(), "qty > 10");
}

#[test]
fn test_boolean_precedence() {
    let a = BooleanExpr::column("a");
    let b = BooleanExpr::column("b");
    let c = BooleanExpr::column("c");
    let e = a.copy().or(b.copy()).and(c.copy());
    assert_eq!(pg(&e), "(a OR b) AND c");
    let e = a.copy().and(b.copy()).or(c.copy());
    assert_eq!(pg(&e), "a AND b OR c");
    let e = a.or(b).not();
    assert_eq!(pg(&e), "NOT (a OR b)");
}

#[test]
fn test_comparison_of_arithmetic() {
    let qty = IntegerExpr::column("qty");
    let e = qty.copy().plus(1).times(2).is_less_than(qty);
    assert_eq!(pg(&e), "(qty + 1) * 2 < qty");
}

#[test]
fn test_string_concatenation_styles() {
    let e = StringExpr::column("first_name")
        .append(" ")
        .append(StringExpr::column("last_name"));
    assert_eq!(pg(&e), "first_name || ' ' || last_name");
    assert_eq!(
        e.to_sql_with_dialect(Dialect::MySQL),
        "CONCAT(`first_name`, ' ', `last_name`)"
    );
    assert_eq!(
        e.to_sql_with_dialect(Dialect::SqlServer),
        "[first_name] + ' ' + [last_name]"
    );
}

#[test]
fn test_string_literal_escaping() {
    let e = StringExpr::column("name").is("O'Brien");
    assert_eq!(pg(&e), "name = 'O''Brien'");
}

#[test]
fn test_statically_null_comparison() {
    let e = IntegerExpr::column("qty").is(IntegerExpr::null());
    assert_eq!(pg(&e), "qty IS NULL");
    let e = IntegerExpr::column("qty").is_not(IntegerExpr::null());
    assert_eq!(pg(&e), "qty IS NOT NULL");
}

#[test]
fn test_null_operand_folds_to_null() {
    let e = IntegerExpr::column("qty").plus(IntegerExpr::null());
    assert_eq!(pg(&e), "NULL");
    let e = IntegerExpr::column("qty").if_null(0);
    assert_eq!(pg(&e), "COALESCE(qty, 0)");
}

#[test]
fn test_empty_junctions() {
    let none: Vec<BooleanExpr> = Vec::new();
    assert_eq!(pg(&all_of(none.clone())), "1 = 1");
    assert_eq!(pg(&any_of(none)), "1 = 0");
}

#[test]
fn test_case_when() {
    let qty = IntegerExpr::column("qty");
    let e = case_when(qty.copy().is_greater_than(100), StringExpr::from("bulk"))
        .when(qty.is_greater_than(10), "case")
        .otherwise("unit")
        .end();
    assert_eq!(
        pg(&e),
        "CASE WHEN qty > 100 THEN 'bulk' WHEN qty > 10 THEN 'case' ELSE 'unit' END"
    );
}

#[test]
fn test_custom_dialect_from_toml() {
    let warehouse = DialectDescriptor::from_toml_str(
        r#"
        name = "warehouse"
        extends = "ansi"
        quote = "bracket"
        quote_always = true

        [functions]
        greatest = "MAXOF"
        "#,
    )
    .unwrap();
    assert_eq!(warehouse.name(), "warehouse");
    let e: IntegerExpr = greatest_of([IntegerExpr::column("x"), IntegerExpr::column("y")]);
    assert_eq!(e.to_sql_with(&warehouse), "MAXOF([x], [y])");
}

#[test]
fn test_timezone_feature_requires_adjustment() {
    let err = DialectDescriptor::from_toml_str(
        r#"
        features = ["timezone_adjusted_now"]
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ExprError::Config(_)));
}

#[test]
fn test_order_term_to_sql() {
    let term = OrderTerm::new(IntegerExpr::column("seq"), SortOrder::AscNullsFirst);
    assert_eq!(pg(&term), "seq ASC NULLS FIRST");
    assert_eq!(
        term.to_sql_with_dialect(Dialect::MySQL),
        "CASE WHEN `seq` IS NULL THEN 0 ELSE 1 END ASC, `seq` ASC"
    );
    let plain = OrderTerm::desc(IntegerExpr::column("seq"));
    assert_eq!(plain.to_sql_with_dialect(Dialect::MySQL), "`seq` DESC");
}

#[test]
fn test_membership() {
    let e = StringExpr::column("status").is_in(["open", "held"]);
    assert_eq!(ansi(&e), "status IN ('open', 'held')");
    let e = StringExpr::column("status").is_not_in(Vec::<&str>::new());
    assert_eq!(ansi(&e), "1 = 1");
}
