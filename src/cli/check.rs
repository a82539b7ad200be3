//! Validate query syntax without rewriting

use super::CliError;
use crate::{Lexer, Parser};

/// Parse a query and surface the first syntax error, if any.
pub fn execute_check(query: &str) -> Result<(), CliError> {
    let lexer = Lexer::new(query);
    let mut parser = Parser::new(lexer).map_err(CliError::Parse)?;
    parser.parse_query().map_err(CliError::Parse)?;
    Ok(())
}
