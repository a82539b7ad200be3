pub mod ast;
pub mod cli;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod scope;

pub use ast::{Expr, LabelMatcher, MatchOp, Query, Token, VectorSelector};
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, Parser};
pub use render::to_query_string;
pub use scope::{scope_query, scope_query_with, Scope, ScopeError, SCOPE_LABEL};
