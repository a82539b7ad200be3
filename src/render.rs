//! Canonical text rendering for parsed queries.
//!
//! This module turns an expression tree back into query text. Rendering is
//! deterministic: the same tree always produces the same text, matcher and
//! argument order is preserved, and durations print in their most compact
//! unit form (`300s` becomes `5m`). Re-parsing rendered output yields a tree
//! that renders identically.
//!
//! # Examples
//!
//! ```
//! use promscope::ast::{Expr, VectorSelector};
//! use promscope::render::to_query_string;
//!
//! let expr = Expr::Selector(VectorSelector::new("up"));
//! assert_eq!(to_query_string(&expr), "up");
//! ```

use crate::ast::{
    AggregateOp, BinOp, Expr, GroupModifier, Grouping, LabelMatcher, MatchOp, Query, UnaryOp,
    VectorMatching, VectorSelector,
};
use std::fmt;
use std::time::Duration;

/// Renders an expression tree to canonical query text.
pub fn to_query_string(expr: &Expr) -> String {
    expr.to_string()
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

impl fmt::Display for MatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchOp::Equal => "=",
            MatchOp::NotEqual => "!=",
            MatchOp::Regex => "=~",
            MatchOp::NotRegex => "!~",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for LabelMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, self.op, quote_string(&self.value))
    }
}

impl fmt::Display for VectorSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_name_and_matchers(self, f)?;
        if let Some(offset) = self.offset {
            write!(f, " offset {}", duration_string(offset))?;
        }
        Ok(())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "^",
            BinOp::Equal => "==",
            BinOp::NotEqual => "!=",
            BinOp::LessThan => "<",
            BinOp::GreaterThan => ">",
            BinOp::LessEqual => "<=",
            BinOp::GreaterEqual => ">=",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Unless => "unless",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for VectorMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.on { "on" } else { "ignoring" };
        write!(f, "{}({})", keyword, self.labels.join(", "))?;

        match &self.group {
            Some(GroupModifier::Left(labels)) => fmt_group(f, "group_left", labels),
            Some(GroupModifier::Right(labels)) => fmt_group(f, "group_right", labels),
            None => Ok(()),
        }
    }
}

fn fmt_group(f: &mut fmt::Formatter<'_>, keyword: &str, labels: &[String]) -> fmt::Result {
    if labels.is_empty() {
        write!(f, " {}", keyword)
    } else {
        write!(f, " {}({})", keyword, labels.join(", "))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => fmt_number(*n, f),
            Expr::String(s) => write!(f, "{}", quote_string(s)),
            Expr::Selector(selector) => write!(f, "{}", selector),
            Expr::Matrix { selector, range } => {
                fmt_name_and_matchers(selector, f)?;
                write!(f, "[{}]", duration_string(*range))?;
                if let Some(offset) = selector.offset {
                    write!(f, " offset {}", duration_string(offset))?;
                }
                Ok(())
            }
            Expr::Subquery {
                expr,
                range,
                step,
                offset,
            } => {
                write!(f, "{}[{}:", expr, duration_string(*range))?;
                if let Some(step) = step {
                    write!(f, "{}", duration_string(*step))?;
                }
                write!(f, "]")?;
                if let Some(offset) = offset {
                    write!(f, " offset {}", duration_string(*offset))?;
                }
                Ok(())
            }
            Expr::Unary { op, expr } => write!(f, "{}{}", op, expr),
            Expr::Paren(inner) => write!(f, "({})", inner),
            Expr::Binary {
                op,
                lhs,
                rhs,
                return_bool,
                matching,
            } => {
                write!(f, "{} {}", lhs, op)?;
                if *return_bool {
                    write!(f, " bool")?;
                }
                if let Some(matching) = matching {
                    write!(f, " {}", matching)?;
                }
                write!(f, " {}", rhs)
            }
            Expr::Call { func, args } => {
                write!(f, "{}(", func)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Aggregate {
                op,
                param,
                expr,
                grouping,
            } => {
                write!(f, "{}(", op)?;
                if let Some(param) = param {
                    write!(f, "{}, ", param)?;
                }
                write!(f, "{})", expr)?;
                match grouping {
                    Grouping::None => Ok(()),
                    Grouping::By(labels) => write!(f, " by ({})", labels.join(", ")),
                    Grouping::Without(labels) => write!(f, " without ({})", labels.join(", ")),
                }
            }
        }
    }
}

/// Metric name and matcher braces, without the offset. Shared between
/// instant and range selector rendering, where the offset lands after the
/// range brackets.
fn fmt_name_and_matchers(selector: &VectorSelector, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(name) = &selector.metric {
        write!(f, "{}", name)?;
    }
    if !selector.matchers.is_empty() || selector.metric.is_none() {
        write!(f, "{{")?;
        for (i, matcher) in selector.matchers.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", matcher)?;
        }
        write!(f, "}}")?;
    }
    Ok(())
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}", if n > 0.0 { "Inf" } else { "-Inf" })
    } else {
        write!(f, "{}", n)
    }
}

/// Compact duration text: the largest units first, zero components omitted.
fn duration_string(d: Duration) -> String {
    let mut ms = d.as_millis();
    if ms == 0 {
        return "0s".to_string();
    }

    const UNITS: [(u128, &str); 7] = [
        (31_536_000_000, "y"),
        (604_800_000, "w"),
        (86_400_000, "d"),
        (3_600_000, "h"),
        (60_000, "m"),
        (1_000, "s"),
        (1, "ms"),
    ];

    let mut out = String::new();
    for (unit, suffix) in UNITS {
        if ms >= unit {
            out.push_str(&(ms / unit).to_string());
            out.push_str(suffix);
            ms %= unit;
        }
    }
    out
}

/// Double-quote a string value, escaping the characters the lexer unescapes.
fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
