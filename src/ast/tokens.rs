use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Numeric literal
    ///
    /// Integers, floats, scientific notation, hexadecimal, `Inf`, and `NaN`
    /// all lex to the same token.
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// 1e3
    /// 0x1f
    /// Inf
    /// ```
    Number(f64),

    /// String literal enclosed in double or single quotes
    ///
    /// # Examples
    /// ```text
    /// "api"
    /// '5..'
    /// ```
    String(String),

    /// Time duration
    ///
    /// A number immediately followed by a unit (`ms`, `s`, `m`, `h`, `d`,
    /// `w`, `y`). Unit segments may be chained.
    ///
    /// # Examples
    /// ```text
    /// 5m
    /// 90s
    /// 1h30m
    /// ```
    Duration(Duration),

    /// Metric name, label name, or function name
    ///
    /// Must start with a letter or underscore. Colons are allowed in the
    /// body so recording-rule names like `job:http_requests:rate5m` lex as
    /// one identifier.
    Identifier(String),

    // Matcher and comparison operators
    /// Equality matcher (`=`)
    Eq,

    /// Equality comparison (`==`)
    EqEq,

    /// Inequality (`!=`), both as matcher and comparison
    NotEq,

    /// Regex matcher (`=~`)
    EqRegex,

    /// Negated regex matcher (`!~`)
    NotRegex,

    /// Less than (`<`)
    Lt,

    /// Greater than (`>`)
    Gt,

    /// Less than or equal (`<=`)
    LtEq,

    /// Greater than or equal (`>=`)
    GtEq,

    // Arithmetic
    /// Addition (`+`)
    Plus,

    /// Subtraction (`-`)
    Minus,

    /// Multiplication (`*`)
    Star,

    /// Division (`/`)
    Slash,

    /// Modulo (`%`)
    Percent,

    /// Power (`^`)
    Caret,

    // Keywords
    /// Set intersection (`and`)
    And,

    /// Set union (`or`)
    Or,

    /// Set complement (`unless`)
    Unless,

    /// Aggregation grouping (`by`)
    By,

    /// Inverted aggregation grouping (`without`)
    Without,

    /// Vector matching on listed labels (`on`)
    On,

    /// Vector matching ignoring listed labels (`ignoring`)
    Ignoring,

    /// Many-to-one vector matching (`group_left`)
    GroupLeft,

    /// One-to-many vector matching (`group_right`)
    GroupRight,

    /// Time offset modifier (`offset`)
    Offset,

    /// Comparison result modifier (`bool`)
    Bool,

    // Delimiters
    /// Left brace opening a matcher list
    LBrace,

    /// Right brace
    RBrace,

    /// Left parenthesis for grouping, calls, and label lists
    LParen,

    /// Right parenthesis
    RParen,

    /// Left bracket opening a range or subquery
    LBracket,

    /// Right bracket
    RBracket,

    /// Comma separating matchers, arguments, or labels
    Comma,

    /// Colon separating subquery range and step
    Colon,

    /// End of input
    Eof,
}
