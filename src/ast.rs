//! # Promscope - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the PromQL dialect
//! understood by promscope, a rewriter that scopes time-series queries to a
//! single tenant namespace before they are allowed anywhere near storage.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, selectors, calls, aggregations)
//! - **[operators]** - Binary, unary, and aggregation operators plus their modifiers
//! - **[matchers]** - Label matchers and the vector selectors that own them
//! - **[query]** - The top-level query wrapping a single expression
//!
//! ## Quick Start
//!
//! ```text
//! sum(rate(http_requests{status=~"5.."}[5m])) by (job)
//! ```
//!
//! This query aggregates the 5xx request rate per job. After rewriting against
//! the namespace `"team-a"` it becomes:
//!
//! ```text
//! sum(rate(http_requests{status=~"5..",namespace="team-a"}[5m])) by (job)
//! ```
//!
//! ## Core Concepts
//!
//! ### Selectors carry matchers
//!
//! The only nodes that identify time series are the instant vector selector
//! (`up{job="api"}`) and the range selector built on top of it
//! (`up{job="api"}[5m]`). Each owns an ordered list of label matchers, and
//! those lists are the mutation targets of the scope rewriter.
//!
//! ### Everything else is a container
//!
//! Parentheses, unary and binary operators, function calls, and aggregations
//! hold child expressions and nothing else of interest to the rewriter. The
//! tree is strictly owned: no sharing, no cycles, consumed once by rendering.
//!
//! ### Grammar extensions fail loudly
//!
//! The scope rewriter matches exhaustively over [`Expr`]. Adding a variant
//! here without wiring it into the rewriter is a compile error, not a silent
//! hole in tenant isolation.
pub mod tokens;
pub mod expressions;
pub mod operators;
pub mod matchers;
pub mod query;

pub use tokens::Token;
pub use expressions::Expr;
pub use operators::{AggregateOp, BinOp, GroupModifier, Grouping, UnaryOp, VectorMatching};
pub use matchers::{LabelMatcher, MatchOp, VectorSelector};
pub use query::Query;
