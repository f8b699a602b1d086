//! Tokenizer for roll and obstacle formulas.

use logos::Logos;
use std::fmt;
use std::ops::Range;

/// A formula token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Unsigned integer literal.
    Number(i32),
    /// Die marker with its face count, e.g. `d6` or `D10`.
    Die(u32),
    /// Reference token without its `@` sigil, lowercased.
    Reference(String),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `(`
    LParen,
    /// `)`
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Die(faces) => write!(f, "d{faces}"),
            Token::Reference(name) => write!(f, "@{name}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

/// Internal logos token, converted to an owned [`Token`] after lexing.
#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"[dD][0-9]+")]
    Die,

    // A reference runs until whitespace, an operator or a parenthesis.
    #[regex(r"@[^ \t\r\n+\-*/()]+")]
    Reference,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,
}

/// A lexer error with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Byte range of the erroneous input.
    pub span: Range<usize>,
    /// Human-readable description of the error.
    pub message: String,
}

/// Lex a formula into `(Token, Span)` pairs.
///
/// Lexing continues past errors so every reference in a partly broken
/// formula is still found.
pub fn lex(source: &str) -> (Vec<(Token, Range<usize>)>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let slice = lexer.slice();
        let token = match result {
            Ok(RawToken::Number) => match slice.parse::<i32>() {
                Ok(n) => Token::Number(n),
                Err(_) => {
                    errors.push(LexError {
                        span,
                        message: format!("integer literal too large: {slice}"),
                    });
                    continue;
                }
            },
            Ok(RawToken::Die) => match slice[1..].parse::<u32>() {
                Ok(faces) => Token::Die(faces),
                Err(_) => {
                    errors.push(LexError {
                        span,
                        message: format!("die size too large: {slice}"),
                    });
                    continue;
                }
            },
            Ok(RawToken::Reference) => Token::Reference(slice[1..].to_lowercase()),
            Ok(RawToken::Plus) => Token::Plus,
            Ok(RawToken::Minus) => Token::Minus,
            Ok(RawToken::Star) => Token::Star,
            Ok(RawToken::Slash) => Token::Slash,
            Ok(RawToken::LParen) => Token::LParen,
            Ok(RawToken::RParen) => Token::RParen,
            Err(()) => {
                errors.push(LexError {
                    message: format!("unexpected character: {slice:?}"),
                    span,
                });
                continue;
            }
        };
        tokens.push((token, span));
    }

    (tokens, errors)
}
