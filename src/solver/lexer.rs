//! Tokenizer for normalized expressions.

use logos::Logos;

use crate::core::errors::{EqResult, EquationError};

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    #[regex(r"[0-9]+(\.[0-9]*)?")]
    Number,
    #[token("x")]
    X,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
}

impl Token {
    pub fn describe(self) -> &'static str {
        match self {
            Token::Number => "number",
            Token::X => "variable 'x'",
            Token::Plus => "operator '+'",
            Token::Minus => "operator '-'",
            Token::Star => "operator '*'",
            Token::Slash => "operator '/'",
            Token::Caret => "operator '^'",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub lexeme: String,
    pub start: usize,
    pub end: usize,
}

/// Splits `input` into tokens.
///
/// Fails with [`EquationError::Parse`] at the first byte that starts no token,
/// e.g. a `.` without a leading digit or an `=` inside one side of an equation.
pub fn tokenize(input: &str) -> EqResult<Vec<SpannedToken>> {
    let mut lex = Token::lexer(input);
    let mut out = Vec::new();
    while let Some(res) = lex.next() {
        let span = lex.span();
        match res {
            Ok(token) => out.push(SpannedToken {
                token,
                lexeme: lex.slice().to_string(),
                start: span.start,
                end: span.end,
            }),
            Err(()) => {
                return Err(EquationError::parse(
                    span.start,
                    format!("invalid token '{}'", lex.slice()),
                ));
            }
        }
    }
    Ok(out)
}
