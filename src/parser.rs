use crate::{
    ast::{
        AggregateOp, BinOp, Expr, GroupModifier, Grouping, LabelMatcher, MatchOp, Query, Token,
        UnaryOp, VectorMatching, VectorSelector,
    },
    lexer::{LexError, Lexer},
};
use std::mem;
use std::time::Duration;

/// Errors produced while parsing a token stream into an expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Lexical error in the underlying input
    Lex(LexError),
    /// A specific token was required
    Unexpected { expected: Token, found: Token },
    /// A class of token was required
    UnexpectedToken {
        context: &'static str,
        found: Token,
    },
    /// A `=~` or `!~` matcher carries a pattern the regex engine rejects
    InvalidRegex { pattern: String, reason: String },
    /// A parameterized aggregation was given a non-literal parameter
    AggregateParam { op: AggregateOp, found: Token },
    /// A brace-only selector with no matchers
    EmptySelector,
    /// A `[range]` suffix on something other than an instant selector
    RangeNotAllowed,
    /// An `offset` modifier on something that cannot carry one
    OffsetNotAllowed,
    /// More than one `offset` modifier on the same selector
    DuplicateOffset,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Lex(e) => write!(f, "{}", e),
            ParseError::Unexpected { expected, found } => {
                write!(f, "expected {:?}, got {:?}", expected, found)
            }
            ParseError::UnexpectedToken { context, found } => {
                write!(f, "expected {}, got {:?}", context, found)
            }
            ParseError::InvalidRegex { pattern, reason } => {
                write!(f, "invalid regex {:?}: {}", pattern, reason)
            }
            ParseError::AggregateParam { op, found } => {
                write!(
                    f,
                    "aggregation operator '{}' expects a literal number or string parameter, got {:?}",
                    op.name(),
                    found
                )
            }
            ParseError::EmptySelector => {
                write!(f, "vector selector must contain at least one matcher")
            }
            ParseError::RangeNotAllowed => {
                write!(f, "range specification is only allowed for instant vector selectors")
            }
            ParseError::OffsetNotAllowed => {
                write!(f, "offset modifier must follow a selector or subquery")
            }
            ParseError::DuplicateOffset => {
                write!(f, "offset may not be set multiple times")
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Lex(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError::Lex(e)
    }
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if mem::discriminant(&self.current_token) != mem::discriminant(&expected) {
            return Err(ParseError::Unexpected {
                expected,
                found: self.current_token.clone(),
            });
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    /// Parse a complete query: one expression covering all input.
    pub fn parse_query(&mut self) -> Result<Query, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(Token::Eof)?;
        Ok(Query { expr })
    }

    /// Parse one expression and require that it consumes all input.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(Token::Eof)?;
        Ok(expr)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(&Token::Or) {
            self.advance()?;
            let matching = self.parse_matching()?;
            let right = self.parse_and()?;

            left = Expr::Binary {
                op: BinOp::Or,
                lhs: Box::new(left),
                rhs: Box::new(right),
                return_bool: false,
                matching,
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;

        loop {
            let op = match &self.current_token {
                Token::And => BinOp::And,
                Token::Unless => BinOp::Unless,
                _ => break,
            };

            self.advance()?;
            let matching = self.parse_matching()?;
            let right = self.parse_comparison()?;

            left = Expr::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
                return_bool: false,
                matching,
            };
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match &self.current_token {
                Token::EqEq => BinOp::Equal,
                Token::NotEq => BinOp::NotEqual,
                Token::Lt => BinOp::LessThan,
                Token::Gt => BinOp::GreaterThan,
                Token::LtEq => BinOp::LessEqual,
                Token::GtEq => BinOp::GreaterEqual,
                _ => break,
            };

            self.advance()?;
            let return_bool = if self.check(&Token::Bool) {
                self.advance()?;
                true
            } else {
                false
            };
            let matching = self.parse_matching()?;
            let right = self.parse_additive()?;

            left = Expr::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
                return_bool,
                matching,
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match &self.current_token {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };

            self.advance()?;
            let matching = self.parse_matching()?;
            let right = self.parse_multiplicative()?;

            left = Expr::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
                return_bool: false,
                matching,
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match &self.current_token {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Percent => BinOp::Mod,
                _ => break,
            };

            self.advance()?;
            let matching = self.parse_matching()?;
            let right = self.parse_unary()?;

            left = Expr::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
                return_bool: false,
                matching,
            };
        }
        Ok(left)
    }

    /// Unary sign binds looser than `^`: `-1 ^ 2` is `-(1 ^ 2)`.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match &self.current_token {
            Token::Minus => UnaryOp::Neg,
            Token::Plus => UnaryOp::Pos,
            _ => return self.parse_power(),
        };

        self.advance()?;
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            expr: Box::new(operand),
        })
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let primary = self.parse_primary()?;
        let base = self.parse_suffix(primary)?;

        if self.check(&Token::Caret) {
            self.advance()?;
            let matching = self.parse_matching()?;
            // Right-associative; routing through unary also admits `2 ^ -3`
            let exponent = self.parse_unary()?;

            return Ok(Expr::Binary {
                op: BinOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
                return_bool: false,
                matching,
            });
        }
        Ok(base)
    }

    /// Parse optional `on`/`ignoring` and `group_left`/`group_right`
    /// modifiers following a binary operator.
    fn parse_matching(&mut self) -> Result<Option<VectorMatching>, ParseError> {
        let on = match &self.current_token {
            Token::On => true,
            Token::Ignoring => false,
            _ => return Ok(None),
        };
        self.advance()?;

        let labels = self.parse_label_list()?;

        let group = if self.check(&Token::GroupLeft) {
            self.advance()?;
            let extra = if self.check(&Token::LParen) {
                self.parse_label_list()?
            } else {
                Vec::new()
            };
            Some(GroupModifier::Left(extra))
        } else if self.check(&Token::GroupRight) {
            self.advance()?;
            let extra = if self.check(&Token::LParen) {
                self.parse_label_list()?
            } else {
                Vec::new()
            };
            Some(GroupModifier::Right(extra))
        } else {
            None
        };

        Ok(Some(VectorMatching { on, labels, group }))
    }

    /// Parse a parenthesized, comma-separated label name list.
    fn parse_label_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(Token::LParen)?;

        let mut labels = Vec::new();
        while !self.check(&Token::RParen) {
            let name = match &self.current_token {
                Token::Identifier(n) => n.clone(),
                other => {
                    return Err(ParseError::UnexpectedToken {
                        context: "label name",
                        found: other.clone(),
                    });
                }
            };
            self.advance()?;
            labels.push(name);

            if !self.check(&Token::RParen) {
                self.expect(Token::Comma)?;
            }
        }

        self.expect(Token::RParen)?;
        Ok(labels)
    }

    /// Parse primary expressions (atoms): literals, parenthesized
    /// expressions, selectors, calls, and aggregations.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Number(n) => {
                self.advance()?;
                Ok(Expr::Number(n))
            }
            Token::String(s) => {
                self.advance()?;
                Ok(Expr::String(s))
            }
            Token::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(Expr::Paren(Box::new(expr)))
            }
            // Brace-only selector: {job="api"}
            Token::LBrace => {
                self.advance()?;
                let matchers = self.parse_matchers()?;
                if matchers.is_empty() {
                    return Err(ParseError::EmptySelector);
                }
                Ok(Expr::Selector(VectorSelector {
                    metric: None,
                    matchers,
                    offset: None,
                }))
            }
            Token::Identifier(name) => {
                self.advance()?;
                self.parse_identifier(name)
            }
            token => Err(ParseError::UnexpectedToken {
                context: "expression",
                found: token,
            }),
        }
    }

    /// Disambiguate an identifier: aggregation, function call, or selector.
    fn parse_identifier(&mut self, name: String) -> Result<Expr, ParseError> {
        if let Some(op) = AggregateOp::from_name(&name) {
            return self.parse_aggregate(op);
        }

        if self.check(&Token::LParen) {
            self.advance()?;
            let mut args = Vec::new();
            while !self.check(&Token::RParen) {
                args.push(self.parse_expression()?);

                if !self.check(&Token::RParen) {
                    self.expect(Token::Comma)?;
                }
            }
            self.expect(Token::RParen)?;
            return Ok(Expr::Call { func: name, args });
        }

        let matchers = if self.check(&Token::LBrace) {
            self.advance()?;
            self.parse_matchers()?
        } else {
            Vec::new()
        };

        Ok(Expr::Selector(VectorSelector {
            metric: Some(name),
            matchers,
            offset: None,
        }))
    }

    /// Parse an aggregation. The grouping clause may lead or trail:
    /// `sum by (job) (up)` and `sum(up) by (job)` are both accepted.
    fn parse_aggregate(&mut self, op: AggregateOp) -> Result<Expr, ParseError> {
        let mut grouping = Grouping::None;
        if self.check(&Token::By) || self.check(&Token::Without) {
            grouping = self.parse_grouping()?;
        }

        self.expect(Token::LParen)?;

        let param = if op.takes_param() {
            let param = self.parse_aggregate_param(op)?;
            self.expect(Token::Comma)?;
            Some(Box::new(param))
        } else {
            None
        };

        let expr = Box::new(self.parse_expression()?);
        self.expect(Token::RParen)?;

        if matches!(grouping, Grouping::None)
            && (self.check(&Token::By) || self.check(&Token::Without))
        {
            grouping = self.parse_grouping()?;
        }

        Ok(Expr::Aggregate {
            op,
            param,
            expr,
            grouping,
        })
    }

    fn parse_grouping(&mut self) -> Result<Grouping, ParseError> {
        let by = self.check(&Token::By);
        self.advance()?;
        let labels = self.parse_label_list()?;
        Ok(if by {
            Grouping::By(labels)
        } else {
            Grouping::Without(labels)
        })
    }

    /// The parameter of `topk`-style operators must be a literal, so the
    /// scope rewriter can pass it through without looking inside.
    fn parse_aggregate_param(&mut self, op: AggregateOp) -> Result<Expr, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Number(n) => {
                self.advance()?;
                Ok(Expr::Number(n))
            }
            Token::String(s) => {
                self.advance()?;
                Ok(Expr::String(s))
            }
            token => Err(ParseError::AggregateParam { op, found: token }),
        }
    }

    /// Parse the matcher list of a selector, after the opening brace.
    fn parse_matchers(&mut self) -> Result<Vec<LabelMatcher>, ParseError> {
        let mut matchers = Vec::new();

        while !self.check(&Token::RBrace) {
            let name = match &self.current_token {
                Token::Identifier(n) => n.clone(),
                other => {
                    return Err(ParseError::UnexpectedToken {
                        context: "label name",
                        found: other.clone(),
                    });
                }
            };
            self.advance()?;

            let op = match &self.current_token {
                Token::Eq => MatchOp::Equal,
                Token::NotEq => MatchOp::NotEqual,
                Token::EqRegex => MatchOp::Regex,
                Token::NotRegex => MatchOp::NotRegex,
                other => {
                    return Err(ParseError::UnexpectedToken {
                        context: "label matcher operator",
                        found: other.clone(),
                    });
                }
            };
            self.advance()?;

            let value = match mem::replace(&mut self.current_token, Token::Eof) {
                Token::String(s) => {
                    self.advance()?;
                    s
                }
                other => {
                    return Err(ParseError::UnexpectedToken {
                        context: "label matcher value",
                        found: other,
                    });
                }
            };

            if matches!(op, MatchOp::Regex | MatchOp::NotRegex) {
                validate_regex(&value)?;
            }

            matchers.push(LabelMatcher::new(name, op, value));

            if !self.check(&Token::RBrace) {
                self.expect(Token::Comma)?;
            }
        }

        self.expect(Token::RBrace)?;
        Ok(matchers)
    }

    /// Parse trailing `[range]`, `[range:step]`, and `offset` modifiers.
    fn parse_suffix(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        loop {
            if self.check(&Token::LBracket) {
                self.advance()?;
                let range = self.expect_duration()?;

                if self.check(&Token::Colon) {
                    self.advance()?;
                    let step = if self.check(&Token::RBracket) {
                        None
                    } else {
                        Some(self.expect_duration()?)
                    };
                    self.expect(Token::RBracket)?;

                    expr = Expr::Subquery {
                        expr: Box::new(expr),
                        range,
                        step,
                        offset: None,
                    };
                } else {
                    self.expect(Token::RBracket)?;

                    expr = match expr {
                        Expr::Selector(selector) => Expr::Matrix { selector, range },
                        _ => return Err(ParseError::RangeNotAllowed),
                    };
                }
            } else if self.check(&Token::Offset) {
                self.advance()?;
                let duration = self.expect_duration()?;

                let slot = match &mut expr {
                    Expr::Selector(selector) => &mut selector.offset,
                    Expr::Matrix { selector, .. } => &mut selector.offset,
                    Expr::Subquery { offset, .. } => offset,
                    _ => return Err(ParseError::OffsetNotAllowed),
                };
                if slot.is_some() {
                    return Err(ParseError::DuplicateOffset);
                }
                *slot = Some(duration);
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn expect_duration(&mut self) -> Result<Duration, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Duration(d) => {
                self.advance()?;
                Ok(d)
            }
            token => Err(ParseError::UnexpectedToken {
                context: "duration",
                found: token,
            }),
        }
    }
}

/// Check a matcher regex the way the backend will compile it: anchored at
/// both ends.
fn validate_regex(pattern: &str) -> Result<(), ParseError> {
    regex::Regex::new(&format!("^(?:{})$", pattern))
        .map(|_| ())
        .map_err(|e| ParseError::InvalidRegex {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}
