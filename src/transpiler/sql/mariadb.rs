use crate::transpiler::dialect::DialectDescriptor;
use crate::transpiler::functions::Function;
use crate::transpiler::sql::mysql;

/// MySQL with MariaDB's cast targets.
pub fn descriptor() -> DialectDescriptor {
    mysql::descriptor()
        .with_name("mariadb")
        .with_template(Function::ToNumber, "CAST({0} AS DECIMAL(65, 30))")
        .with_template(Function::ToDateTime, "CAST({0} AS DATETIME(6))")
}
