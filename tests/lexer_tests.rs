// tests/lexer_tests.rs

use promscope::ast::Token;
use promscope::lexer::{LexError, Lexer};
use std::time::Duration;

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut out = Vec::new();
    loop {
        let token = lexer.next_token().expect("unexpected lex error");
        let done = token == Token::Eof;
        out.push(token);
        if done {
            return out;
        }
    }
}

fn first_error(input: &str) -> LexError {
    let mut lexer = Lexer::new(input);
    loop {
        match lexer.next_token() {
            Ok(Token::Eof) => panic!("expected a lex error in {:?}", input),
            Ok(_) => continue,
            Err(e) => return e,
        }
    }
}

// ============================================================================
// Keywords and identifiers
// ============================================================================

#[test]
fn test_keywords() {
    assert_eq!(
        tokens("and or unless by without on ignoring group_left group_right offset bool"),
        vec![
            Token::And,
            Token::Or,
            Token::Unless,
            Token::By,
            Token::Without,
            Token::On,
            Token::Ignoring,
            Token::GroupLeft,
            Token::GroupRight,
            Token::Offset,
            Token::Bool,
            Token::Eof,
        ]
    );
}

#[test]
fn test_identifiers() {
    assert_eq!(
        tokens("up http_requests_total _internal"),
        vec![
            Token::Identifier("up".to_string()),
            Token::Identifier("http_requests_total".to_string()),
            Token::Identifier("_internal".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_recording_rule_name() {
    // Colons are part of the identifier body
    assert_eq!(
        tokens("job:http_requests:rate5m"),
        vec![
            Token::Identifier("job:http_requests:rate5m".to_string()),
            Token::Eof,
        ]
    );
}

// ============================================================================
// Selectors and operators
// ============================================================================

#[test]
fn test_selector_tokens() {
    assert_eq!(
        tokens("up{job=\"api\",status!=\"500\"}"),
        vec![
            Token::Identifier("up".to_string()),
            Token::LBrace,
            Token::Identifier("job".to_string()),
            Token::Eq,
            Token::String("api".to_string()),
            Token::Comma,
            Token::Identifier("status".to_string()),
            Token::NotEq,
            Token::String("500".to_string()),
            Token::RBrace,
            Token::Eof,
        ]
    );
}

#[test]
fn test_regex_matcher_tokens() {
    assert_eq!(
        tokens("{job=~\"a.*\",job!~\"b\"}"),
        vec![
            Token::LBrace,
            Token::Identifier("job".to_string()),
            Token::EqRegex,
            Token::String("a.*".to_string()),
            Token::Comma,
            Token::Identifier("job".to_string()),
            Token::NotRegex,
            Token::String("b".to_string()),
            Token::RBrace,
            Token::Eof,
        ]
    );
}

#[test]
fn test_comparison_operators() {
    assert_eq!(
        tokens("== != <= >= < > ="),
        vec![
            Token::EqEq,
            Token::NotEq,
            Token::LtEq,
            Token::GtEq,
            Token::Lt,
            Token::Gt,
            Token::Eq,
            Token::Eof,
        ]
    );
}

#[test]
fn test_arithmetic_operators() {
    assert_eq!(
        tokens("+ - * / % ^"),
        vec![
            Token::Plus,
            Token::Minus,
            Token::Star,
            Token::Slash,
            Token::Percent,
            Token::Caret,
            Token::Eof,
        ]
    );
}

// ============================================================================
// Numbers and durations
// ============================================================================

#[test]
fn test_numbers() {
    assert_eq!(
        tokens("42 3.14 1e3 2.5e-1 0x1f"),
        vec![
            Token::Number(42.0),
            Token::Number(3.14),
            Token::Number(1000.0),
            Token::Number(0.25),
            Token::Number(31.0),
            Token::Eof,
        ]
    );
}

#[test]
fn test_special_numbers() {
    assert_eq!(tokens("Inf")[0], Token::Number(f64::INFINITY));
    assert_eq!(tokens("inf")[0], Token::Number(f64::INFINITY));
    assert!(matches!(tokens("NaN")[0], Token::Number(n) if n.is_nan()));
}

#[test]
fn test_durations() {
    assert_eq!(
        tokens("5m 90s 250ms 2h 3d 1w 1y"),
        vec![
            Token::Duration(Duration::from_secs(300)),
            Token::Duration(Duration::from_secs(90)),
            Token::Duration(Duration::from_millis(250)),
            Token::Duration(Duration::from_secs(7_200)),
            Token::Duration(Duration::from_secs(259_200)),
            Token::Duration(Duration::from_secs(604_800)),
            Token::Duration(Duration::from_secs(31_536_000)),
            Token::Eof,
        ]
    );
}

#[test]
fn test_chained_duration() {
    assert_eq!(
        tokens("1h30m")[0],
        Token::Duration(Duration::from_secs(5_400))
    );
}

#[test]
fn test_incomplete_duration_is_an_error() {
    assert!(matches!(
        first_error("up[1h30]"),
        LexError::InvalidDuration { .. }
    ));
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_quotes() {
    assert_eq!(tokens("\"api\"")[0], Token::String("api".to_string()));
    assert_eq!(tokens("'api'")[0], Token::String("api".to_string()));
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        tokens(r#""a\nb\t\"c\\""#)[0],
        Token::String("a\nb\t\"c\\".to_string())
    );
    assert_eq!(tokens(r#""\u0041""#)[0], Token::String("A".to_string()));
}

#[test]
fn test_unterminated_string() {
    assert!(matches!(
        first_error("up{job=\"api"),
        LexError::UnterminatedString { .. }
    ));
}

#[test]
fn test_invalid_escape() {
    assert!(matches!(
        first_error(r#""a\qb""#),
        LexError::InvalidEscape { ch: 'q', .. }
    ));
}

// ============================================================================
// Whitespace, comments, errors
// ============================================================================

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        tokens("up # instance health\n+ 1"),
        vec![
            Token::Identifier("up".to_string()),
            Token::Plus,
            Token::Number(1.0),
            Token::Eof,
        ]
    );
}

#[test]
fn test_unexpected_character() {
    assert!(matches!(
        first_error("up ; down"),
        LexError::UnexpectedChar { ch: ';', .. }
    ));
}

#[test]
fn test_lone_bang_is_an_error() {
    assert!(matches!(
        first_error("up ! down"),
        LexError::UnexpectedChar { ch: '!', .. }
    ));
}
