//! Lexer for `OpenQASM` 2.0.

use logos::Logos;
use std::ops::Range;

use crate::error::{ParseError, ParseResult, Position};

/// Tokens for `OpenQASM` 2.0.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // Keywords
    #[token("OPENQASM")]
    OpenQasm,

    #[token("include")]
    Include,

    #[token("qreg")]
    Qreg,

    #[token("creg")]
    Creg,

    #[token("gate")]
    Gate,

    #[token("measure")]
    Measure,

    #[token("reset")]
    Reset,

    #[token("barrier")]
    Barrier,

    // Constants
    #[token("pi")]
    Pi,

    // Literals
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    #[regex(r"[0-9]+", |lex| IntValue::from_digits(lex.slice()))]
    IntLiteral(IntValue),

    #[regex(r#""[^"\n]*""#, |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    StringLiteral(String),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Operators and punctuation
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("->")]
    Arrow,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,
}

/// Value of an unsigned integer literal.
#[derive(Debug, Clone, PartialEq)]
pub enum IntValue {
    /// Fits in a `u64`.
    Exact(u64),
    /// Too large for a `u64`; the digits as written.
    Overflow(String),
}

impl IntValue {
    fn from_digits(digits: &str) -> Self {
        digits
            .parse::<u64>()
            .map_or_else(|_| IntValue::Overflow(digits.to_string()), IntValue::Exact)
    }

    /// Numeric value as an `f64`, rounded for large literals.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        match self {
            IntValue::Exact(v) => *v as f64,
            IntValue::Overflow(digits) => digits.parse().unwrap_or(f64::INFINITY),
        }
    }
}

impl std::fmt::Display for IntValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntValue::Exact(v) => write!(f, "{v}"),
            IntValue::Overflow(digits) => write!(f, "{digits}"),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::OpenQasm => write!(f, "OPENQASM"),
            Token::Include => write!(f, "include"),
            Token::Qreg => write!(f, "qreg"),
            Token::Creg => write!(f, "creg"),
            Token::Gate => write!(f, "gate"),
            Token::Measure => write!(f, "measure"),
            Token::Reset => write!(f, "reset"),
            Token::Barrier => write!(f, "barrier"),
            Token::Pi => write!(f, "pi"),
            Token::FloatLiteral(v) => write!(f, "{v:?}"),
            Token::IntLiteral(v) => write!(f, "{v}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Arrow => write!(f, "->"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// A token with its span and source position.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Range<usize>,
    pub position: Position,
}

/// A lazy stream of tokens over a source string.
///
/// Cloning the stream gives an independent cursor at the same point, so a
/// consumer can look ahead or restart without re-lexing from the beginning.
#[derive(Clone)]
pub struct TokenStream<'s> {
    lexer: logos::Lexer<'s, Token>,
    source: &'s str,
    scanned: usize,
    line: usize,
    column: usize,
}

impl<'s> TokenStream<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            lexer: Token::lexer(source),
            source,
            scanned: 0,
            line: 1,
            column: 1,
        }
    }

    /// Move the line/column cursor forward to `offset`.
    fn position_at(&mut self, offset: usize) -> Position {
        for ch in self.source[self.scanned..offset].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.scanned = offset;
        Position::new(self.line, self.column)
    }
}

impl Iterator for TokenStream<'_> {
    type Item = ParseResult<SpannedToken>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.lexer.next()?;
        let span = self.lexer.span();
        let position = self.position_at(span.start);
        Some(match result {
            Ok(token) => Ok(SpannedToken {
                token,
                span,
                position,
            }),
            Err(()) => {
                let slice = &self.source[span];
                Err(ParseError::Lex {
                    position,
                    message: format!("invalid token '{slice}'"),
                })
            }
        })
    }
}

/// Tokenize a QASM2 source string.
pub fn tokenize(source: &str) -> TokenStream<'_> {
    TokenStream::new(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source).filter_map(Result::ok).map(|t| t.token).collect()
    }

    #[test]
    fn test_header_tokens() {
        let toks = tokens("OPENQASM 2.0;");
        assert_eq!(toks.len(), 3);
        assert_eq!(toks[0], Token::OpenQasm);
        assert!(matches!(toks[1], Token::FloatLiteral(v) if (v - 2.0).abs() < f64::EPSILON));
        assert_eq!(toks[2], Token::Semicolon);
    }

    #[test]
    fn test_register_declaration() {
        let toks = tokens("qreg q[2];");
        assert_eq!(toks[0], Token::Qreg);
        assert!(matches!(toks[1], Token::Identifier(ref s) if s == "q"));
        assert_eq!(toks[2], Token::LBracket);
        assert_eq!(toks[3], Token::IntLiteral(IntValue::Exact(2)));
        assert_eq!(toks[4], Token::RBracket);
        assert_eq!(toks[5], Token::Semicolon);
    }

    #[test]
    fn test_measure_arrow() {
        let toks = tokens("measure q[0] -> c[0];");
        assert_eq!(toks[0], Token::Measure);
        assert_eq!(toks[5], Token::Arrow);
    }

    #[test]
    fn test_number_forms() {
        let toks = tokens("1 1.5 .25 3. 1e-7 2.5E+3");
        assert_eq!(toks[0], Token::IntLiteral(IntValue::Exact(1)));
        assert_eq!(toks[1], Token::FloatLiteral(1.5));
        assert_eq!(toks[2], Token::FloatLiteral(0.25));
        assert_eq!(toks[3], Token::FloatLiteral(3.0));
        assert_eq!(toks[4], Token::FloatLiteral(1e-7));
        assert_eq!(toks[5], Token::FloatLiteral(2500.0));
    }

    #[test]
    fn test_integer_wider_than_u64() {
        let toks: Vec<_> = tokenize("100000000000000000000 18446744073709551615")
            .collect::<ParseResult<_>>()
            .unwrap();
        let big = &toks[0].token;
        assert_eq!(
            *big,
            Token::IntLiteral(IntValue::Overflow("100000000000000000000".into()))
        );
        assert_eq!(big.to_string(), "100000000000000000000");
        assert_eq!(toks[1].token, Token::IntLiteral(IntValue::Exact(u64::MAX)));

        let Token::IntLiteral(value) = big else {
            panic!("expected integer literal");
        };
        assert_eq!(value.as_f64(), 1e20);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let toks = tokens("pi pi2 gate gates _x");
        assert_eq!(toks[0], Token::Pi);
        assert_eq!(toks[1], Token::Identifier("pi2".into()));
        assert_eq!(toks[2], Token::Gate);
        assert_eq!(toks[3], Token::Identifier("gates".into()));
        assert_eq!(toks[4], Token::Identifier("_x".into()));
    }

    #[test]
    fn test_comments_skipped() {
        let source = "
            // a comment
            qreg q[1]; // trailing
            x q[0];
        ";
        assert_eq!(tokens(source).len(), 12);
    }

    #[test]
    fn test_positions() {
        let spanned: Vec<_> = tokenize("qreg q[1];\n  h q[0];")
            .collect::<ParseResult<_>>()
            .unwrap();
        assert_eq!(spanned[0].position, Position::new(1, 1));
        assert_eq!(spanned[1].position, Position::new(1, 6));
        assert_eq!(spanned[6].position, Position::new(2, 3));
        assert_eq!(spanned[6].span, 13..14);
    }

    #[test]
    fn test_lex_error_position() {
        let err = tokenize("qreg q[1];\nh $q;")
            .collect::<ParseResult<Vec<_>>>()
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::Lex { position, .. } if position == Position::new(2, 3)
        ));
    }

    #[test]
    fn test_stream_is_restartable() {
        let mut stream = tokenize("x q[0];");
        stream.next();
        let snapshot = stream.clone();
        let rest: Vec<_> = stream.filter_map(Result::ok).map(|t| t.token).collect();
        let again: Vec<_> = snapshot.filter_map(Result::ok).map(|t| t.token).collect();
        assert_eq!(rest, again);
        assert_eq!(rest.len(), 5);
    }
}
