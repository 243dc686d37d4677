//! CASE WHEN expression builders.

use crate::ast::builders::family::{Boolean, Family};
use crate::ast::builders::typed::Typed;
use crate::ast::Expr;

/// Start a CASE WHEN expression
pub fn case_when<K: Family>(condition: Typed<Boolean>, then: impl Into<Typed<K>>) -> CaseBuilder<K> {
    CaseBuilder {
        branches: vec![(condition.into_expr(), then.into().into_expr())],
        otherwise: None,
        _family: Default::default(),
    }
}

/// Builder for CASE expressions
#[derive(Debug, Clone)]
pub struct CaseBuilder<K: Family> {
    branches: Vec<(Expr, Expr)>,
    otherwise: Option<Expr>,
    _family: std::marker::PhantomData<K>,
}

impl<K: Family> CaseBuilder<K> {
    /// Add another WHEN clause
    pub fn when(mut self, condition: Typed<Boolean>, then: impl Into<Typed<K>>) -> Self {
        self.branches
            .push((condition.into_expr(), then.into().into_expr()));
        self
    }

    /// Add ELSE clause
    pub fn otherwise(mut self, value: impl Into<Typed<K>>) -> Self {
        self.otherwise = Some(value.into().into_expr());
        self
    }

    /// Build the final expression. Without ELSE, unmatched rows yield NULL.
    pub fn end(self) -> Typed<K> {
        Typed::wrap(Expr::make_case(self.branches, self.otherwise))
    }
}

impl<K: Family> From<CaseBuilder<K>> for Typed<K> {
    fn from(builder: CaseBuilder<K>) -> Self {
        builder.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{IntegerExpr, StringExpr};
    use crate::transpiler::ToSql;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_case_chain() {
        let score = IntegerExpr::column("score");
        let grade: StringExpr = case_when(score.clone().is_greater_than_or_equal(90), "A")
            .when(score.is_greater_than_or_equal(75), "B")
            .otherwise("C")
            .end();
        assert_eq!(
            grade.to_sql(),
            "CASE WHEN score >= 90 THEN 'A' WHEN score >= 75 THEN 'B' ELSE 'C' END"
        );
    }

    #[test]
    fn test_case_without_else_is_nullable() {
        let flag: IntegerExpr = case_when(IntegerExpr::required_column("n").is_greater_than(0), 1).end();
        assert!(flag.is_nullable());
    }
}
