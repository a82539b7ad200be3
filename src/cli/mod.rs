//! CLI support for promscope
//!
//! Provides programmatic access to promscope CLI functionality for embedding
//! in other tools (query proxies, admission gateways).

mod check;
mod rewrite;

pub use check::execute_check;
pub use rewrite::{execute_rewrite, rewrite_report, RewriteOptions};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Parser error
    Parse(crate::ParseError),
    /// Scope rewrite error
    Scope(crate::ScopeError),
    /// IO error
    Io(io::Error),
    /// No query provided
    NoQuery,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Parse(e) => write!(f, "Parse error: {}", e),
            CliError::Scope(e) => write!(f, "Rewrite error: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoQuery => {
                write!(f, "No query provided. Pass a query argument or pipe one to stdin.")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Parse(e) => Some(e),
            CliError::Scope(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::ParseError> for CliError {
    fn from(e: crate::ParseError) -> Self {
        CliError::Parse(e)
    }
}

impl From<crate::ScopeError> for CliError {
    fn from(e: crate::ScopeError) -> Self {
        CliError::Scope(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
