use crate::ast::Token;
use std::time::Duration;

/// Errors produced while tokenizing query text. Positions are character
/// offsets into the input.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    UnexpectedChar { ch: char, position: usize },
    UnterminatedString { position: usize },
    InvalidEscape { ch: char, position: usize },
    InvalidNumber { text: String, position: usize },
    InvalidDuration { text: String, position: usize },
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::UnexpectedChar { ch, position } => {
                write!(f, "unexpected character '{}' at position {}", ch, position)
            }
            LexError::UnterminatedString { position } => {
                write!(f, "unterminated string starting at position {}", position)
            }
            LexError::InvalidEscape { ch, position } => {
                write!(f, "invalid escape sequence '\\{}' at position {}", ch, position)
            }
            LexError::InvalidNumber { text, position } => {
                write!(f, "invalid number '{}' at position {}", text, position)
            }
            LexError::InvalidDuration { text, position } => {
                write!(f, "invalid duration '{}' at position {}", text, position)
            }
        }
    }
}

impl std::error::Error for LexError {}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' {
                // Comment runs to end of line
                while let Some(c) = self.current_char() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == ':' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some('u') => {
                            let escape_pos = self.position;
                            let mut code = 0u32;
                            for offset in 1..=4 {
                                match self.peek_char(offset).and_then(|c| c.to_digit(16)) {
                                    Some(digit) => code = code * 16 + digit,
                                    None => {
                                        return Err(LexError::InvalidEscape {
                                            ch: 'u',
                                            position: escape_pos,
                                        });
                                    }
                                }
                            }
                            match char::from_u32(code) {
                                Some(c) => result.push(c),
                                None => {
                                    return Err(LexError::InvalidEscape {
                                        ch: 'u',
                                        position: escape_pos,
                                    });
                                }
                            }
                            // Step to the last hex digit; the shared advance
                            // below moves past it
                            for _ in 0..4 {
                                self.advance();
                            }
                        }
                        Some(ch) => {
                            return Err(LexError::InvalidEscape {
                                ch,
                                position: self.position,
                            });
                        }
                        None => return Err(LexError::UnterminatedString { position: start }),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_digits(&mut self) -> String {
        let mut digits = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        digits
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;

        // Hexadecimal
        if self.current_char() == Some('0') && matches!(self.peek_char(1), Some('x') | Some('X')) {
            self.advance();
            self.advance();
            let mut hex = String::new();
            while let Some(ch) = self.current_char() {
                if ch.is_ascii_hexdigit() {
                    hex.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            return u64::from_str_radix(&hex, 16)
                .map(|v| Token::Number(v as f64))
                .map_err(|_| LexError::InvalidNumber {
                    text: format!("0x{}", hex),
                    position: start,
                });
        }

        let mut number = self.read_digits();
        let mut is_float = false;

        if self.current_char() == Some('.')
            && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            number.push('.');
            self.advance();
            number.push_str(&self.read_digits());
        }

        if matches!(self.current_char(), Some('e') | Some('E')) {
            let mut offset = 1;
            if matches!(self.peek_char(1), Some('+') | Some('-')) {
                offset = 2;
            }
            if self.peek_char(offset).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                for _ in 0..offset {
                    number.push(self.current_char().unwrap_or_default());
                    self.advance();
                }
                number.push_str(&self.read_digits());
            }
        }

        if !is_float && self.at_duration_unit() {
            return self.read_duration(&number, start);
        }

        number
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| LexError::InvalidNumber {
                text: number.clone(),
                position: start,
            })
    }

    fn at_duration_unit(&self) -> bool {
        matches!(
            self.current_char(),
            Some('s') | Some('m') | Some('h') | Some('d') | Some('w') | Some('y')
        )
    }

    /// Reads the unit-suffixed tail of a duration, accumulating chained
    /// segments like `1h30m`.
    fn read_duration(&mut self, first: &str, start: usize) -> Result<Token, LexError> {
        let invalid = |text: &str| LexError::InvalidDuration {
            text: text.to_string(),
            position: start,
        };

        let mut total = Duration::ZERO;
        let mut count: u64 = first.parse().map_err(|_| LexError::InvalidNumber {
            text: first.to_string(),
            position: start,
        })?;

        loop {
            let unit_ms: u64 = match self.current_char() {
                Some('m') if self.peek_char(1) == Some('s') => {
                    self.advance();
                    self.advance();
                    1
                }
                Some('s') => {
                    self.advance();
                    1_000
                }
                Some('m') => {
                    self.advance();
                    60_000
                }
                Some('h') => {
                    self.advance();
                    3_600_000
                }
                Some('d') => {
                    self.advance();
                    86_400_000
                }
                Some('w') => {
                    self.advance();
                    604_800_000
                }
                Some('y') => {
                    self.advance();
                    31_536_000_000
                }
                _ => return Err(invalid(&count.to_string())),
            };

            let ms = count.checked_mul(unit_ms).ok_or_else(|| invalid(first))?;
            total = total
                .checked_add(Duration::from_millis(ms))
                .ok_or_else(|| invalid(first))?;

            if self.current_char().is_some_and(|c| c.is_ascii_digit()) {
                let digits = self.read_digits();
                count = digits.parse().map_err(|_| LexError::InvalidNumber {
                    text: digits.clone(),
                    position: start,
                })?;
            } else {
                break;
            }
        }

        Ok(Token::Duration(total))
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        match self.current_char() {
            None => Ok(Token::Eof),
            Some('{') => {
                self.advance();
                Ok(Token::LBrace)
            }
            Some('}') => {
                self.advance();
                Ok(Token::RBrace)
            }
            Some('(') => {
                self.advance();
                Ok(Token::LParen)
            }
            Some(')') => {
                self.advance();
                Ok(Token::RParen)
            }
            Some('[') => {
                self.advance();
                Ok(Token::LBracket)
            }
            Some(']') => {
                self.advance();
                Ok(Token::RBracket)
            }
            Some(',') => {
                self.advance();
                Ok(Token::Comma)
            }
            Some(':') => {
                self.advance();
                Ok(Token::Colon)
            }
            Some('+') => {
                self.advance();
                Ok(Token::Plus)
            }
            Some('-') => {
                self.advance();
                Ok(Token::Minus)
            }
            Some('*') => {
                self.advance();
                Ok(Token::Star)
            }
            Some('/') => {
                self.advance();
                Ok(Token::Slash)
            }
            Some('%') => {
                self.advance();
                Ok(Token::Percent)
            }
            Some('^') => {
                self.advance();
                Ok(Token::Caret)
            }
            Some('=') => match self.peek_char(1) {
                Some('=') => {
                    self.advance();
                    self.advance();
                    Ok(Token::EqEq)
                }
                Some('~') => {
                    self.advance();
                    self.advance();
                    Ok(Token::EqRegex)
                }
                _ => {
                    self.advance();
                    Ok(Token::Eq)
                }
            },
            Some('!') => match self.peek_char(1) {
                Some('=') => {
                    self.advance();
                    self.advance();
                    Ok(Token::NotEq)
                }
                Some('~') => {
                    self.advance();
                    self.advance();
                    Ok(Token::NotRegex)
                }
                _ => Err(LexError::UnexpectedChar {
                    ch: '!',
                    position: self.position,
                }),
            },
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::LtEq)
                } else {
                    self.advance();
                    Ok(Token::Lt)
                }
            }
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::GtEq)
                } else {
                    self.advance();
                    Ok(Token::Gt)
                }
            }
            Some('"') => self.read_string('"').map(Token::String),
            Some('\'') => self.read_string('\'').map(Token::String),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                Ok(match ident.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "unless" => Token::Unless,
                    "by" => Token::By,
                    "without" => Token::Without,
                    "on" => Token::On,
                    "ignoring" => Token::Ignoring,
                    "group_left" => Token::GroupLeft,
                    "group_right" => Token::GroupRight,
                    "offset" => Token::Offset,
                    "bool" => Token::Bool,
                    _ if ident.eq_ignore_ascii_case("inf") => Token::Number(f64::INFINITY),
                    _ if ident.eq_ignore_ascii_case("nan") => Token::Number(f64::NAN),
                    _ => Token::Identifier(ident),
                })
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) => Err(LexError::UnexpectedChar {
                ch,
                position: self.position,
            }),
        }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and or unless by without offset bool");
    assert_eq!(lexer.next_token(), Ok(Token::And));
    assert_eq!(lexer.next_token(), Ok(Token::Or));
    assert_eq!(lexer.next_token(), Ok(Token::Unless));
    assert_eq!(lexer.next_token(), Ok(Token::By));
    assert_eq!(lexer.next_token(), Ok(Token::Without));
    assert_eq!(lexer.next_token(), Ok(Token::Offset));
    assert_eq!(lexer.next_token(), Ok(Token::Bool));
}

#[test]
fn test_selector() {
    let mut lexer = Lexer::new("up{job=\"api\"}[5m]");
    assert_eq!(
        lexer.next_token(),
        Ok(Token::Identifier("up".to_string()))
    );
    assert_eq!(lexer.next_token(), Ok(Token::LBrace));
    assert_eq!(
        lexer.next_token(),
        Ok(Token::Identifier("job".to_string()))
    );
    assert_eq!(lexer.next_token(), Ok(Token::Eq));
    assert_eq!(lexer.next_token(), Ok(Token::String("api".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::RBrace));
    assert_eq!(lexer.next_token(), Ok(Token::LBracket));
    assert_eq!(
        lexer.next_token(),
        Ok(Token::Duration(Duration::from_secs(300)))
    );
    assert_eq!(lexer.next_token(), Ok(Token::RBracket));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}
