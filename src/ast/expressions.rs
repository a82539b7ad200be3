use crate::ast::matchers::VectorSelector;
use crate::ast::operators::{AggregateOp, BinOp, Grouping, UnaryOp, VectorMatching};
use std::time::Duration;

/// Abstract Syntax Tree node representing a parsed query expression.
///
/// The AST is the internal representation of a query after parsing. The
/// scope rewriter walks it recursively, rewriting the matcher list of every
/// [`Selector`](Expr::Selector) and [`Matrix`](Expr::Matrix) node it reaches.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    /// Numeric literal
    ///
    /// # Example
    /// ```text
    /// 42.5
    /// ```
    Number(f64),

    /// String literal
    ///
    /// # Example
    /// ```text
    /// "version"
    /// ```
    String(String),

    // Selectors - the rewrite targets
    /// Instant vector selector
    ///
    /// # Examples
    /// ```text
    /// up
    /// up{job="api"}
    /// ```
    Selector(VectorSelector),

    /// Range vector selector: an instant selector with a lookback range
    ///
    /// # Example
    /// ```text
    /// http_requests{job="api"}[5m]
    /// ```
    Matrix {
        selector: VectorSelector,
        range: Duration,
    },

    /// Subquery: re-evaluation of an inner expression over a range
    ///
    /// Parsed for grammar completeness; the scope rewriter refuses it.
    ///
    /// # Example
    /// ```text
    /// rate(http_requests[5m])[30m:1m]
    /// ```
    Subquery {
        expr: Box<Expr>,
        range: Duration,
        /// Resolution step; the backend default when absent
        step: Option<Duration>,
        offset: Option<Duration>,
    },

    // Containers
    /// Unary operation
    ///
    /// # Example
    /// ```text
    /// -up
    /// ```
    Unary { op: UnaryOp, expr: Box<Expr> },

    /// Parenthesized expression
    Paren(Box<Expr>),

    /// Binary operation with optional comparison and matching modifiers
    ///
    /// # Examples
    /// ```text
    /// a + b
    /// a > bool 0
    /// a / on(job) group_left b
    /// ```
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        /// `bool` modifier on comparisons: return 0/1 instead of filtering
        return_bool: bool,
        matching: Option<VectorMatching>,
    },

    /// Function call
    ///
    /// Arguments are an ordered expression list; the function name is not
    /// validated against a function table here.
    ///
    /// # Example
    /// ```text
    /// rate(http_requests[5m])
    /// ```
    Call { func: String, args: Vec<Expr> },

    /// Aggregation over a single inner expression
    ///
    /// The parameter of `topk`-style operators is restricted to a literal at
    /// parse time, so the rewriter can pass it through untouched.
    ///
    /// # Examples
    /// ```text
    /// sum(up) by (job)
    /// topk(3, up)
    /// ```
    Aggregate {
        op: AggregateOp,
        /// Literal parameter for operators that take one
        param: Option<Box<Expr>>,
        expr: Box<Expr>,
        grouping: Grouping,
    },
}
