//! Rewrite queries against a namespace scope

use super::CliError;
use crate::scope::{scope_query_with, Scope};

/// Options for the rewrite command
#[derive(Debug, Clone, Default)]
pub struct RewriteOptions {
    /// The query to rewrite
    pub query: String,
    /// Namespace value enforced on every selector
    pub namespace: String,
    /// Scope label to constrain; the default label when absent
    pub label: Option<String>,
}

/// Rewrite a query so every selector is scoped to the namespace.
pub fn execute_rewrite(options: &RewriteOptions) -> Result<String, CliError> {
    let scope = match &options.label {
        Some(label) => Scope::with_label(label.clone(), options.namespace.clone()),
        None => Scope::new(options.namespace.clone()),
    };

    scope_query_with(&options.query, &scope).map_err(CliError::Scope)
}

/// Rewrite a query and wrap the result in a JSON object, for tools that
/// consume structured output.
pub fn rewrite_report(options: &RewriteOptions) -> Result<serde_json::Value, CliError> {
    let query = execute_rewrite(options)?;
    Ok(serde_json::json!({
        "namespace": options.namespace,
        "query": query,
    }))
}
