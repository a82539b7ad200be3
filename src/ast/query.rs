use crate::ast::Expr;

/// A complete parsed query: a single top-level expression.
///
/// This is the unit handed to the scope rewriter and to rendering. Each
/// query owns its tree exclusively; concurrent rewrites must each parse
/// their own instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub expr: Expr,
}
