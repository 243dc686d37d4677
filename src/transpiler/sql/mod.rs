//! Preset dialect descriptors, one file per database.

pub mod ansi;
pub mod bigquery;
pub mod duckdb;
pub mod mariadb;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod redshift;
pub mod snowflake;
pub mod sqlite;
pub mod sqlserver;
