//! Namespace scope enforcement for parsed queries.
//!
//! This module is the reason the crate exists: given an arbitrary
//! user-supplied query, rewrite its expression tree so that every metric
//! selector carries an equality constraint on the scope label before the
//! query is allowed to execute. A caller that fronts a multi-tenant
//! time-series backend runs every incoming query through [`scope_query`] and
//! executes only the rewritten text.
//!
//! # Guarantees
//!
//! - Every selector in the output carries `<label>="<value>"`. A
//!   pre-existing matcher on the scope label is replaced at its original
//!   position; otherwise the matcher is appended.
//! - All other matchers are preserved unchanged, in their original order.
//! - The rewrite is idempotent: applying it twice with the same value is
//!   the same as applying it once.
//! - The walk fails closed. A node kind outside the dispatch table aborts
//!   the whole rewrite; partially-enforced trees are never rendered, and the
//!   caller must never fall back to the unscoped input.
//!
//! # Examples
//!
//! ```
//! use promscope::scope_query;
//!
//! let out = scope_query("up", "team-a").unwrap();
//! assert_eq!(out, "up{namespace=\"team-a\"}");
//!
//! // An existing namespace matcher is overwritten, not duplicated.
//! let out = scope_query("up{namespace=\"team-b\"}", "team-a").unwrap();
//! assert_eq!(out, "up{namespace=\"team-a\"}");
//! ```

use crate::{
    ast::{Expr, LabelMatcher, Query},
    lexer::Lexer,
    parser::{ParseError, Parser},
    render::to_query_string,
};
use std::mem;

/// The label used for tenant isolation unless a caller overrides it.
pub const SCOPE_LABEL: &str = "namespace";

/// The enforcement target: which label to constrain and to which value.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    label: String,
    value: String,
}

impl Scope {
    /// A scope on the default [`SCOPE_LABEL`].
    pub fn new(value: impl Into<String>) -> Self {
        Scope::with_label(SCOPE_LABEL, value)
    }

    /// A scope on a custom label, for deployments that isolate tenants on
    /// something other than `namespace`.
    pub fn with_label(label: impl Into<String>, value: impl Into<String>) -> Self {
        Scope {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Errors that can abort a scope rewrite.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeError {
    /// The input failed to parse; surfaced unchanged
    Parse(ParseError),
    /// The walk reached a node kind outside its dispatch table
    UnhandledNode(&'static str),
}

impl std::fmt::Display for ScopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeError::Parse(e) => write!(f, "{}", e),
            ScopeError::UnhandledNode(kind) => write!(f, "unhandled node type: {}", kind),
        }
    }
}

impl std::error::Error for ScopeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScopeError::Parse(e) => Some(e),
            ScopeError::UnhandledNode(_) => None,
        }
    }
}

impl From<ParseError> for ScopeError {
    fn from(e: ParseError) -> Self {
        ScopeError::Parse(e)
    }
}

/// Rewrite one matcher sequence to carry exactly one equality matcher on
/// `label`.
///
/// The first matcher already named `label` is replaced in place, keeping its
/// position; any later duplicates are left untouched. With no existing
/// matcher on `label`, the new matcher is appended. All other matchers keep
/// their order.
///
/// # Examples
///
/// ```
/// use promscope::ast::LabelMatcher;
/// use promscope::scope::enforce_matchers;
///
/// let matchers = vec![LabelMatcher::equal("job", "api")];
/// let enforced = enforce_matchers(matchers, "namespace", "team-a");
///
/// assert_eq!(enforced.len(), 2);
/// assert_eq!(enforced[1], LabelMatcher::equal("namespace", "team-a"));
/// ```
pub fn enforce_matchers(
    mut matchers: Vec<LabelMatcher>,
    label: &str,
    value: &str,
) -> Vec<LabelMatcher> {
    let mut found = false;
    for matcher in matchers.iter_mut() {
        if matcher.name == label {
            *matcher = LabelMatcher::equal(label, value);
            found = true;
            break;
        }
    }

    if !found {
        matchers.push(LabelMatcher::equal(label, value));
    }
    matchers
}

/// Walk a query and enforce the scope on every selector beneath it.
pub fn enforce_query(query: &mut Query, scope: &Scope) -> Result<(), ScopeError> {
    enforce_expr(&mut query.expr, scope)
}

/// Walk an expression tree, rewriting the matcher list of every selector.
///
/// The match below is deliberately exhaustive with no wildcard arm: a new
/// [`Expr`] variant will not compile until someone decides how it is
/// enforced. A selector hiding inside an unenforced node kind would be a
/// tenant-isolation hole, so unsupported kinds return
/// [`ScopeError::UnhandledNode`] instead of passing through.
pub fn enforce_expr(expr: &mut Expr, scope: &Scope) -> Result<(), ScopeError> {
    match expr {
        Expr::Paren(inner) => enforce_expr(inner, scope),
        Expr::Unary { expr, .. } => enforce_expr(expr, scope),
        // Grouping and parameter are aggregation metadata; the parameter is
        // a literal by construction and cannot hide a selector
        Expr::Aggregate { expr, .. } => enforce_expr(expr, scope),
        Expr::Binary { lhs, rhs, .. } => {
            enforce_expr(lhs, scope)?;
            enforce_expr(rhs, scope)
        }
        Expr::Call { args, .. } => enforce_all(args, scope),
        Expr::Number(_) | Expr::String(_) => Ok(()),
        Expr::Selector(selector) => {
            selector.matchers = enforce_matchers(
                mem::take(&mut selector.matchers),
                scope.label(),
                scope.value(),
            );
            Ok(())
        }
        Expr::Matrix { selector, .. } => {
            selector.matchers = enforce_matchers(
                mem::take(&mut selector.matchers),
                scope.label(),
                scope.value(),
            );
            Ok(())
        }
        // A subquery re-evaluates its inner expression; until enforcement
        // through it is decided, refuse rather than let selectors slip by
        Expr::Subquery { .. } => Err(ScopeError::UnhandledNode("subquery")),
    }
}

fn enforce_all(exprs: &mut [Expr], scope: &Scope) -> Result<(), ScopeError> {
    for expr in exprs.iter_mut() {
        enforce_expr(expr, scope)?;
    }
    Ok(())
}

/// Parse `input`, enforce `namespace` on every selector, and render the
/// rewritten query.
///
/// This is the transformation entry point a query proxy calls per request.
/// Each call parses its own tree; nothing is shared or retained between
/// calls.
pub fn scope_query(input: &str, namespace: &str) -> Result<String, ScopeError> {
    scope_query_with(input, &Scope::new(namespace))
}

/// [`scope_query`] with a caller-chosen scope label.
pub fn scope_query_with(input: &str, scope: &Scope) -> Result<String, ScopeError> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    let mut query = parser.parse_query()?;

    enforce_query(&mut query, scope)?;

    Ok(to_query_string(&query.expr))
}
