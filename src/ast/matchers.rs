use std::time::Duration;

/// How a label matcher compares a label value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOp {
    /// Exact equality (`=`)
    Equal,
    /// Negated equality (`!=`)
    NotEqual,
    /// Regex match (`=~`), anchored at both ends
    Regex,
    /// Negated regex match (`!~`), anchored at both ends
    NotRegex,
}

/// A single label constraint on a selector.
///
/// Matchers form an ordered sequence on their selector. The order carries no
/// query semantics, but the rewriter preserves it so output is deterministic
/// and a replaced matcher stays at its original position.
///
/// # Examples
/// ```text
/// job="api"          // LabelMatcher { name: "job", op: Equal, value: "api" }
/// status=~"5.."      // LabelMatcher { name: "status", op: Regex, value: "5.." }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMatcher {
    pub name: String,
    pub op: MatchOp,
    pub value: String,
}

impl LabelMatcher {
    pub fn new(name: impl Into<String>, op: MatchOp, value: impl Into<String>) -> Self {
        LabelMatcher {
            name: name.into(),
            op,
            value: value.into(),
        }
    }

    /// Shorthand for an equality matcher, the shape the scope rewriter
    /// injects.
    pub fn equal(name: impl Into<String>, value: impl Into<String>) -> Self {
        LabelMatcher::new(name, MatchOp::Equal, value)
    }
}

/// An instant vector selector: a metric name and/or a list of label
/// matchers, with an optional time offset.
///
/// At least one of `metric` and `matchers` is non-empty after parsing; a
/// bare `{}` is rejected.
///
/// # Examples
/// ```text
/// up
/// up{job="api"}
/// {__name__="up"}
/// up offset 5m
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSelector {
    /// Metric name, absent for brace-only selectors
    pub metric: Option<String>,
    /// Ordered label matchers
    pub matchers: Vec<LabelMatcher>,
    /// Evaluation time offset into the past
    pub offset: Option<Duration>,
}

impl VectorSelector {
    /// A selector for a named metric with no matchers.
    pub fn new(metric: impl Into<String>) -> Self {
        VectorSelector {
            metric: Some(metric.into()),
            matchers: Vec::new(),
            offset: None,
        }
    }

    /// A selector for a named metric with the given matchers.
    pub fn with_matchers(metric: impl Into<String>, matchers: Vec<LabelMatcher>) -> Self {
        VectorSelector {
            metric: Some(metric.into()),
            matchers,
            offset: None,
        }
    }
}
