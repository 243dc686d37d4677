//! Dialect descriptors.
//!
//! A `DialectDescriptor` is plain data: how to quote, how to spell booleans
//! and concatenation, which features exist and how each function is written.
//! Presets are built once and shared; custom dialects can be loaded from TOML
//! on top of a preset:
//!
//! ```toml
//! name = "warehouse"
//! extends = "postgres"
//! features = ["boolean_values", "nulls_ordering"]
//!
//! [functions]
//! greatest = "GREATEST"
//! add_days = { template = "DATEADD(day, {1}, {0})" }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExprError, ExprResult};
use crate::transpiler::functions::{Feature, Function, FunctionSyntax};
use crate::transpiler::sql::{
    ansi, bigquery, duckdb, mariadb, mysql, oracle, postgres, redshift, snowflake, sqlite,
    sqlserver,
};
use crate::transpiler::traits::{SqlGenerator, escape_identifier, needs_quoting};

/// Identifier quote characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStyle {
    /// "name"
    Double,
    /// `name`
    Backtick,
    /// [name]
    Bracket,
}

impl QuoteStyle {
    fn wrap(&self, name: &str) -> String {
        match self {
            QuoteStyle::Double => format!("\"{}\"", name.replace('"', "\"\"")),
            QuoteStyle::Backtick => format!("`{}`", name.replace('`', "``")),
            QuoteStyle::Bracket => format!("[{}]", name.replace(']', "]]")),
        }
    }
}

/// Spelling of boolean literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanLiterals {
    /// TRUE / FALSE
    Keywords,
    /// 1 / 0
    Numeric,
}

/// String concatenation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcatStyle {
    /// a || b
    Pipes,
    /// a + b
    Plus,
    /// CONCAT(a, b)
    Function,
}

/// Everything the renderer needs to know about a dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialectDescriptor {
    pub name: String,
    pub quote: QuoteStyle,
    /// Quote every identifier, not only reserved or unusual ones.
    pub quote_always: bool,
    pub boolean_literals: BooleanLiterals,
    pub concat: ConcatStyle,
    pub null_literal: String,
    pub features: BTreeSet<Feature>,
    pub functions: BTreeMap<Function, FunctionSyntax>,
    pub timezone_adjustment: Option<FunctionSyntax>,
}

impl DialectDescriptor {
    /// ANSI defaults: double quotes when needed, TRUE/FALSE, `||`, no
    /// features and no registered functions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quote: QuoteStyle::Double,
            quote_always: false,
            boolean_literals: BooleanLiterals::Keywords,
            concat: ConcatStyle::Pipes,
            null_literal: "NULL".to_string(),
            features: BTreeSet::new(),
            functions: BTreeMap::new(),
            timezone_adjustment: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_quote(mut self, quote: QuoteStyle, always: bool) -> Self {
        self.quote = quote;
        self.quote_always = always;
        self
    }

    pub fn with_numeric_booleans(mut self) -> Self {
        self.boolean_literals = BooleanLiterals::Numeric;
        self
    }

    pub fn with_concat(mut self, concat: ConcatStyle) -> Self {
        self.concat = concat;
        self
    }

    pub fn with_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn without_feature(mut self, feature: Feature) -> Self {
        self.features.remove(&feature);
        self
    }

    /// Register `function` as a plain call `NAME(args)`.
    pub fn with_function(mut self, function: Function, name: &str) -> Self {
        self.functions.insert(function, FunctionSyntax::name(name));
        self
    }

    /// Register `function` as a positional template.
    pub fn with_template(mut self, function: Function, template: &str) -> Self {
        self.functions
            .insert(function, FunctionSyntax::template(template));
        self
    }

    /// Drop a registration so the function falls back to its default or
    /// is emulated.
    pub fn without_function(mut self, function: Function) -> Self {
        self.functions.remove(&function);
        self
    }

    pub fn with_timezone_adjustment(mut self, template: &str) -> Self {
        self.timezone_adjustment = Some(FunctionSyntax::template(template));
        self.features.insert(Feature::TimezoneAdjustedNow);
        self
    }

    /// Parse a TOML dialect configuration.
    pub fn from_toml_str(source: &str) -> ExprResult<Self> {
        let config: DialectConfig = toml::from_str(source)?;
        config.into_descriptor()
    }

    /// Load a TOML dialect configuration from disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ExprResult<Self> {
        let path = path.as_ref();
        debug!("Loading dialect configuration from {}", path.display());
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Pretty JSON dump of the fully resolved descriptor.
    pub fn to_json(&self) -> ExprResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read back a descriptor written by `to_json`.
    pub fn from_json_str(source: &str) -> ExprResult<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

impl SqlGenerator for DialectDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn quote_identifier(&self, name: &str) -> String {
        match (self.quote, self.quote_always) {
            (QuoteStyle::Double, false) => escape_identifier(name),
            (_, false) if !needs_quoting(name) => name.to_string(),
            (style, _) => style.wrap(name),
        }
    }

    fn bool_literal(&self, val: bool) -> String {
        match (self.boolean_literals, val) {
            (BooleanLiterals::Keywords, true) => "TRUE".to_string(),
            (BooleanLiterals::Keywords, false) => "FALSE".to_string(),
            (BooleanLiterals::Numeric, true) => "1".to_string(),
            (BooleanLiterals::Numeric, false) => "0".to_string(),
        }
    }

    fn null_literal(&self) -> String {
        self.null_literal.clone()
    }

    fn string_concat(&self, parts: &[&str]) -> String {
        match self.concat {
            ConcatStyle::Pipes => parts.join(" || "),
            ConcatStyle::Plus => parts.join(" + "),
            ConcatStyle::Function => format!("CONCAT({})", parts.join(", ")),
        }
    }

    fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    fn function(&self, function: Function) -> Option<&FunctionSyntax> {
        self.functions.get(&function)
    }

    fn timezone_adjustment(&self) -> Option<&FunctionSyntax> {
        self.timezone_adjustment.as_ref()
    }
}

/// TOML form of a descriptor. Every field is optional and overrides the
/// preset named by `extends` (ANSI when absent).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DialectConfig {
    pub name: Option<String>,
    pub extends: Option<String>,
    pub quote: Option<QuoteStyle>,
    pub quote_always: Option<bool>,
    pub boolean_literals: Option<BooleanLiterals>,
    pub concat: Option<ConcatStyle>,
    pub null_literal: Option<String>,
    /// Replaces the preset's feature set when given.
    pub features: Option<Vec<Feature>>,
    /// Keys are function names such as `add_days`; entries are merged over
    /// the preset's registrations.
    pub functions: BTreeMap<String, FunctionSyntax>,
    pub timezone_adjustment: Option<FunctionSyntax>,
}

impl DialectConfig {
    pub fn into_descriptor(self) -> ExprResult<DialectDescriptor> {
        let base = match &self.extends {
            Some(name) => Dialect::from_str(name)?,
            None => Dialect::Ansi,
        };
        let mut descriptor = base.descriptor().clone();
        debug!(
            "Building dialect {:?} over preset {}",
            self.name.as_deref().unwrap_or(&descriptor.name),
            descriptor.name
        );

        if let Some(name) = self.name {
            descriptor.name = name;
        }
        if let Some(quote) = self.quote {
            descriptor.quote = quote;
        }
        if let Some(always) = self.quote_always {
            descriptor.quote_always = always;
        }
        if let Some(literals) = self.boolean_literals {
            descriptor.boolean_literals = literals;
        }
        if let Some(concat) = self.concat {
            descriptor.concat = concat;
        }
        if let Some(null_literal) = self.null_literal {
            descriptor.null_literal = null_literal;
        }
        if let Some(features) = self.features {
            descriptor.features = features.into_iter().collect();
        }
        for (key, syntax) in self.functions {
            let function = Function::from_str(&key)?;
            descriptor.functions.insert(function, syntax);
        }
        if let Some(adjustment) = self.timezone_adjustment {
            descriptor.timezone_adjustment = Some(adjustment);
        }

        if descriptor.supports(Feature::TimezoneAdjustedNow)
            && descriptor.timezone_adjustment.is_none()
        {
            return Err(ExprError::Config(format!(
                "dialect '{}' enables timezone_adjusted_now without a timezone_adjustment",
                descriptor.name
            )));
        }
        Ok(descriptor)
    }
}

/// Supported SQL Dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    Postgres,
    MySQL,
    MariaDB,
    SQLite,
    SqlServer,
    Oracle,
    DuckDB,
    Snowflake,
    BigQuery,
    Redshift,
    /// Standard SQL with every dialect-dependent function emulated.
    Ansi,
}

static POSTGRES: LazyLock<DialectDescriptor> = LazyLock::new(postgres::descriptor);
static MYSQL: LazyLock<DialectDescriptor> = LazyLock::new(mysql::descriptor);
static MARIADB: LazyLock<DialectDescriptor> = LazyLock::new(mariadb::descriptor);
static SQLITE: LazyLock<DialectDescriptor> = LazyLock::new(sqlite::descriptor);
static SQLSERVER: LazyLock<DialectDescriptor> = LazyLock::new(sqlserver::descriptor);
static ORACLE: LazyLock<DialectDescriptor> = LazyLock::new(oracle::descriptor);
static DUCKDB: LazyLock<DialectDescriptor> = LazyLock::new(duckdb::descriptor);
static SNOWFLAKE: LazyLock<DialectDescriptor> = LazyLock::new(snowflake::descriptor);
static BIGQUERY: LazyLock<DialectDescriptor> = LazyLock::new(bigquery::descriptor);
static REDSHIFT: LazyLock<DialectDescriptor> = LazyLock::new(redshift::descriptor);
static ANSI: LazyLock<DialectDescriptor> = LazyLock::new(ansi::descriptor);

impl Dialect {
    pub const ALL: [Dialect; 11] = [
        Dialect::Postgres,
        Dialect::MySQL,
        Dialect::MariaDB,
        Dialect::SQLite,
        Dialect::SqlServer,
        Dialect::Oracle,
        Dialect::DuckDB,
        Dialect::Snowflake,
        Dialect::BigQuery,
        Dialect::Redshift,
        Dialect::Ansi,
    ];

    /// The shared preset descriptor.
    pub fn descriptor(&self) -> &'static DialectDescriptor {
        match self {
            Dialect::Postgres => &*POSTGRES,
            Dialect::MySQL => &*MYSQL,
            Dialect::MariaDB => &*MARIADB,
            Dialect::SQLite => &*SQLITE,
            Dialect::SqlServer => &*SQLSERVER,
            Dialect::Oracle => &*ORACLE,
            Dialect::DuckDB => &*DUCKDB,
            Dialect::Snowflake => &*SNOWFLAKE,
            Dialect::BigQuery => &*BIGQUERY,
            Dialect::Redshift => &*REDSHIFT,
            Dialect::Ansi => &*ANSI,
        }
    }

    pub fn generator(&self) -> &'static dyn SqlGenerator {
        self.descriptor()
    }
}

impl FromStr for Dialect {
    type Err = ExprError;

    fn from_str(s: &str) -> ExprResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySQL),
            "mariadb" => Ok(Dialect::MariaDB),
            "sqlite" => Ok(Dialect::SQLite),
            "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            "oracle" => Ok(Dialect::Oracle),
            "duckdb" => Ok(Dialect::DuckDB),
            "snowflake" => Ok(Dialect::Snowflake),
            "bigquery" => Ok(Dialect::BigQuery),
            "redshift" => Ok(Dialect::Redshift),
            "ansi" => Ok(Dialect::Ansi),
            other => Err(ExprError::Config(format!("unknown dialect '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quoting_styles() {
        let pg = Dialect::Postgres.generator();
        assert_eq!(pg.quote_identifier("age"), "age");
        assert_eq!(pg.quote_identifier("order"), "\"order\"");
        assert_eq!(Dialect::MySQL.generator().quote_identifier("a`b"), "`a``b`");
        assert_eq!(Dialect::SqlServer.generator().quote_identifier("age"), "[age]");
        assert_eq!(Dialect::SQLite.generator().quote_identifier("age"), "\"age\"");
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("pg".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("MSSQL".parse::<Dialect>().unwrap(), Dialect::SqlServer);
        assert!("cobol".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_presets_are_shared() {
        let a = Dialect::MySQL.descriptor() as *const DialectDescriptor;
        let b = Dialect::MySQL.descriptor() as *const DialectDescriptor;
        assert_eq!(a, b);
    }

    #[test]
    fn test_gated_function_groups() {
        let ansi = Dialect::Ansi.generator();
        assert!(ansi.function_syntax(Function::IntervalAdd).is_none());
        assert!(ansi.function_syntax(Function::Greatest).is_none());
        assert_eq!(
            ansi.function_syntax(Function::Length),
            Some(FunctionSyntax::name("CHAR_LENGTH"))
        );
        let pg = Dialect::Postgres.generator();
        assert!(pg.function_syntax(Function::IntervalAdd).is_some());
        assert!(pg.function_syntax(Function::Distance).is_some());
    }

    #[test]
    fn test_config_extends_preset() {
        let d = DialectDescriptor::from_toml_str(
            r#"
            name = "warehouse"
            extends = "sqlite"
            boolean_literals = "keywords"

            [functions]
            greatest = "GREATEST"
            add_days = { template = "date_add({0}, {1})" }
            "#,
        )
        .unwrap();
        assert_eq!(d.name, "warehouse");
        assert!(d.quote_always);
        assert_eq!(d.bool_literal(true), "TRUE");
        assert_eq!(d.function(Function::Greatest), Some(&FunctionSyntax::name("GREATEST")));
        assert!(d.supports(Feature::TimezoneAdjustedNow));
    }

    #[test]
    fn test_config_rejects_unknown_function() {
        let err = DialectDescriptor::from_toml_str("[functions]\nfrobnicate = \"F\"").unwrap_err();
        assert!(matches!(err, ExprError::Config(_)));
    }

    #[test]
    fn test_descriptor_serializes() {
        let json = serde_json::to_string(Dialect::SQLite.descriptor()).unwrap();
        assert!(json.contains("\"timezone_adjusted_now\""));
    }
}
