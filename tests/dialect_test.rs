use std::str::FromStr;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use qail_expr::prelude::*;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// Route emulation traces to the test output with `RUST_LOG=trace`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One expression from every operation family.
fn battery() -> Vec<Expr> {
    let qty = || IntegerExpr::column("qty");
    let price = || NumberExpr::column("price");
    let name = || StringExpr::column("name");
    let due = || DateExpr::column("due");
    let ts = || DateTimeExpr::column("ts");
    let at = || InstantExpr::column("at");
    let span = || DurationExpr::column("span");
    let loc = || PointExpr::column("loc");
    let biggest: IntegerExpr = greatest_of([qty(), IntegerExpr::column("cap")]);
    let smallest: NumberExpr = least_of([price(), NumberExpr::from(9.5)]);

    vec![
        qty().plus(1).times(2).is_greater_than(10).into_expr(),
        qty().integer_divided_by(3).modulus(2).into_expr(),
        price().sign().into_expr(),
        price().round().abs().power(2).into_expr(),
        biggest.into_expr(),
        smallest.into_expr(),
        name().upper().trim().length().into_expr(),
        name().substring_before("@").into_expr(),
        name().is_like_ignore_case("a%").into_expr(),
        name().replace("-", "_").append(qty().to_text()).into_expr(),
        due().add_days(3).is_less_than(current_date()).into_expr(),
        due().add_months(qty()).into_expr(),
        due().day_of_week().into_expr(),
        due().months_from(DateExpr::column("start")).into_expr(),
        due().years_from(DateExpr::column("start")).into_expr(),
        due().days_from(DateExpr::column("start")).into_expr(),
        due().get_date_repeat_from(DateExpr::column("start")).into_expr(),
        due().plus(span()).into_expr(),
        due().minus(DateRepeat::months(1)).into_expr(),
        due().end_of_month().into_expr(),
        ts().hours_from(current_date_time()).into_expr(),
        ts().subsecond().into_expr(),
        ts().at_start_of_day().into_expr(),
        ts().plus(span()).into_expr(),
        at().minutes_from(current_instant()).into_expr(),
        span().seconds().into_expr(),
        loc().distance_to(point(price(), 2.5)).into_expr(),
        loc().bounding_box().as_text().into_expr(),
        loc().x().into_expr(),
        loc().is(PointExpr::from(Point::new(1.0, 2.0))).into_expr(),
        qty().is_in([1, 2, 3]).into_expr(),
        qty().if_null(0).into_expr(),
        row_number()
            .partition_by(name())
            .order_by_with(due(), SortOrder::DescNullsLast)
            .default_frame()
            .unwrap()
            .into_expr(),
        price().sum().over().order_by(due()).default_frame().unwrap().into_expr(),
    ]
}

#[test]
fn test_every_preset_renders_every_family() {
    init_tracing();
    for dialect in Dialect::ALL {
        for expr in battery() {
            let sql = expr.to_sql_with_dialect(dialect);
            assert!(!sql.is_empty(), "{:?} rendered nothing for {:?}", dialect, expr);
            assert!(
                !sql.contains("{0}") && !sql.contains("{1}"),
                "{:?} left a placeholder: {}",
                dialect,
                sql
            );
        }
    }
}

#[test]
fn test_ansi_output_uses_standard_sql_only() {
    const DIALECT_SPECIFIC: &[&str] = &[
        "GREATEST", "LEAST", "SIGN(", "DATEADD", "DATEDIFF", "DATE_ADD", "DATE_SUB",
        "TIMESTAMPDIFF", "ST_", "AGE(", "julianday", "strftime", "printf", "INSTR", "LEN(",
        "IFNULL", "NVL", "DAYOFWEEK", "ILIKE", "GETDATE", "SYSDATE", "datetime(",
    ];
    for expr in battery() {
        let sql = expr.to_sql_with_dialect(Dialect::Ansi);
        for name in DIALECT_SPECIFIC {
            assert!(!sql.contains(name), "{} found in {}", name, sql);
        }
    }
}

#[test]
fn test_rendering_is_deterministic() {
    for expr in battery() {
        assert_eq!(expr.to_sql(), expr.clone().to_sql());
    }
}

#[test]
fn test_repeat_token_round_trip() {
    for repeat in [
        DateRepeat::new(1, -2, 3, 0, 0, Decimal::new(15, 1)),
        DateRepeat::zero(),
        DateRepeat::new(0, 0, -400, 23, -59, Decimal::new(-125, 3)),
    ] {
        let token = repeat.to_string();
        assert_eq!(DateRepeat::from_str(&token).unwrap(), repeat, "{}", token);
    }
    assert_eq!(DateRepeat::years(2).to_string(), "P2Y0M0D0h0n0s");
    assert!(DateRepeat::from_str("P1Y2M").is_err());
}

#[test]
fn test_wkt_round_trip() {
    let p = Point::new(-71.06, 42.3601);
    assert_eq!(Point::from_str(&p.to_string()).unwrap(), p);

    let ring = Polygon::new(vec![
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Point::new(4.0, 3.5),
        Point::new(0.0, 0.0),
    ]);
    assert_eq!(ring.to_string(), "POLYGON((0 0, 4 0, 4 3.5, 0 0))");
    assert_eq!(Polygon::from_str(&ring.to_string()).unwrap(), ring);
    assert!(Point::from_str("POINT(1)").is_err());
}

#[test]
fn test_config_extends_preset() {
    let toml = r#"
        name = "shop"
        extends = "mysql"

        [functions]
        add_days = { template = "ADD_DAYS({0}, {1})" }
    "#;
    let shop = DialectDescriptor::from_toml_str(toml).unwrap();
    assert_eq!(shop.name, "shop");

    let due = DateExpr::column("due").add_days(2);
    assert_eq!(due.to_sql_with(&shop), "ADD_DAYS(`due`, 2)");

    // everything not overridden comes from the preset
    let e = StringExpr::column("a").append(StringExpr::column("b"));
    assert_eq!(e.to_sql_with(&shop), e.to_sql_with_dialect(Dialect::MySQL));
}

#[test]
fn test_config_rejects_unknown_names() {
    let err = DialectDescriptor::from_toml_str("extends = \"informix\"").unwrap_err();
    assert!(matches!(err, ExprError::Config(_)));
    let err = DialectDescriptor::from_toml_str("[functions]\nfrobnicate = \"F\"").unwrap_err();
    assert!(matches!(err, ExprError::Config(_)));
}

#[test]
fn test_config_from_file() {
    let path = std::env::temp_dir().join(format!("qail-expr-{}.toml", std::process::id()));
    std::fs::write(&path, "extends = \"sqlserver\"\nname = \"mart\"\n").unwrap();
    let mart = DialectDescriptor::from_toml_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(
        IntegerExpr::column("qty").to_sql_with(&mart),
        IntegerExpr::column("qty").to_sql_with_dialect(Dialect::SqlServer)
    );

    let missing = DialectDescriptor::from_toml_file(path.with_extension("absent"));
    assert!(matches!(missing, Err(ExprError::Io(_))));
}

#[test]
fn test_descriptor_json_round_trip() {
    let json = Dialect::SQLite.descriptor().to_json().unwrap();
    let back = DialectDescriptor::from_json_str(&json).unwrap();
    assert_eq!(&back, Dialect::SQLite.descriptor());
}

#[test]
fn test_expression_json_round_trip() {
    let e = StringExpr::column_in("users", "email")
        .is_like("%@example.com")
        .and(DateExpr::column("joined").is_greater_than(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
    let json = serde_json::to_string(e.expr()).unwrap();
    let back: Expr = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, e.expr());
}

#[test]
fn test_timezone_hook() {
    let now = current_date_time();
    assert_eq!(
        now.to_sql_with_dialect(Dialect::SQLite),
        "datetime(CURRENT_TIMESTAMP, 'localtime')"
    );
    assert_eq!(now.to_sql_with_dialect(Dialect::Postgres), "LOCALTIMESTAMP");

    let shifted = DialectDescriptor::new("shifted").with_timezone_adjustment("TO_LOCAL({0})");
    assert_eq!(now.to_sql_with(&shifted), "TO_LOCAL(LOCALTIMESTAMP)");

    // instants and dates are never adjusted
    assert_eq!(current_instant().to_sql_with(&shifted), "CURRENT_TIMESTAMP");
    assert_eq!(current_date().to_sql_with(&shifted), "CURRENT_DATE");
}

#[test]
fn test_column_binding() {
    let e = IntegerExpr::column_in("orders", "qty")
        .plus(IntegerExpr::column_in("stock", "qty"))
        .is_greater_than(IntegerExpr::column("limit"));
    let tables: Vec<_> = e.tables_involved().into_iter().collect();
    assert_eq!(tables, vec!["orders".to_string(), "stock".to_string()]);
    assert_eq!(e.columns_involved().len(), 3);

    let ctx = EvalContext::new()
        .with("orders.qty", 4)
        .with("stock.qty", 3)
        .with("limit", 5);
    assert_eq!(e.evaluate(&ctx).unwrap(), Value::Bool(true));
}
