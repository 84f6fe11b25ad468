//! Recursive-descent parser for one side of a normalized expression.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := product (('+' | '-') product)*
//! product := unary (('*' | '/') unary | <implicit> unary)*
//! unary   := '-' unary | power
//! power   := primary ('^' unary)?
//! primary := NUMBER | 'x'
//! ```
//!
//! Implicit multiplication applies when a term is directly followed by `x`
//! (`3x`, `2x^2`). `^` is right-associative and binds tighter than unary
//! minus, so `-x^2` is `-(x^2)` and `2^-1` is `2^(-1)`.
//!
//! Input longer than [`MAX_EXPRESSION_TOKENS`] tokens is rejected before
//! parsing, which also bounds the depth of the returned tree.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Num;

use super::lexer::{SpannedToken, Token, tokenize};
use crate::core::constants::MAX_EXPRESSION_TOKENS;
use crate::core::errors::{EqResult, EquationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(BigRational),
    Var,
    Neg(Box<Expr>),
    Binary(Box<Expr>, BinOp, Box<Expr>),
}

/// Parses `input` into an expression tree.
///
/// Positions in returned [`EquationError::Parse`] errors are byte offsets
/// into `input`; a missing operand at the end reports `input.len()`.
pub fn parse(input: &str) -> EqResult<Expr> {
    let tokens = tokenize(input)?;
    if let Some(first_excess) = tokens.get(MAX_EXPRESSION_TOKENS) {
        return Err(EquationError::parse(
            first_excess.start,
            format!("expression longer than {MAX_EXPRESSION_TOKENS} tokens"),
        ));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        input_len: input.len(),
    };
    let expr = parser.parse_add_sub()?;
    if let Some(extra) = parser.tokens.get(parser.pos) {
        return Err(EquationError::parse(
            extra.start,
            format!("unexpected {} after complete expression", extra.token.describe()),
        ));
    }
    Ok(expr)
}

/// Converts a decimal literal such as `12`, `0.25` or `5.` into an exact rational.
pub fn parse_decimal(lexeme: &str) -> Option<BigRational> {
    let (int_part, frac_part) = lexeme.split_once('.').unwrap_or((lexeme, ""));
    let digits = format!("{int_part}{frac_part}");
    let numer = BigInt::from_str_radix(&digits, 10).ok()?;
    let denom = num_traits::pow(BigInt::from(10u32), frac_part.len());
    Some(BigRational::new(numer, denom))
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    input_len: usize,
}

impl Parser {
    fn parse_add_sub(&mut self) -> EqResult<Expr> {
        let mut node = self.parse_mul_div()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_mul_div()?;
            node = Expr::Binary(Box::new(node), op, Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_mul_div(&mut self) -> EqResult<Expr> {
        let mut node = self.parse_unary()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Star) => {
                    self.pos += 1;
                    BinOp::Mul
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    BinOp::Div
                }
                // implicit product, nothing to consume
                Some(Token::X) => BinOp::Mul,
                _ => break,
            };
            let rhs = self.parse_unary()?;
            node = Expr::Binary(Box::new(node), op, Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_unary(&mut self) -> EqResult<Expr> {
        if self.consume(Token::Minus) {
            Ok(Expr::Neg(Box::new(self.parse_unary()?)))
        } else {
            self.parse_pow()
        }
    }

    fn parse_pow(&mut self) -> EqResult<Expr> {
        let base = self.parse_primary()?;
        if self.consume(Token::Caret) {
            // right associative through unary -> pow
            let exponent = self.parse_unary()?;
            Ok(Expr::Binary(Box::new(base), BinOp::Pow, Box::new(exponent)))
        } else {
            Ok(base)
        }
    }

    fn parse_primary(&mut self) -> EqResult<Expr> {
        let Some(info) = self.next() else {
            return Err(EquationError::parse(
                self.input_len,
                "unexpected end of input, expected operand",
            ));
        };
        match info.token {
            Token::Number => parse_decimal(&info.lexeme).map(Expr::Number).ok_or_else(|| {
                EquationError::parse(info.start, format!("invalid number '{}'", info.lexeme))
            }),
            Token::X => Ok(Expr::Var),
            other => Err(EquationError::parse(
                info.start,
                format!("unexpected {}, expected operand", other.describe()),
            )),
        }
    }

    fn peek_token(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|t| t.token)
    }

    fn next(&mut self) -> Option<SpannedToken> {
        let info = self.tokens.get(self.pos).cloned();
        if info.is_some() {
            self.pos += 1;
        }
        info
    }

    fn consume(&mut self, token: Token) -> bool {
        if self.peek_token() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: i64) -> Expr {
        Expr::Number(BigRational::from_integer(BigInt::from(n)))
    }

    fn bin(lhs: Expr, op: BinOp, rhs: Expr) -> Expr {
        Expr::Binary(Box::new(lhs), op, Box::new(rhs))
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(
            parse("1-2-3").expect("parsed"),
            bin(bin(num(1), BinOp::Sub, num(2)), BinOp::Sub, num(3))
        );
        assert_eq!(
            parse("2^3^2").expect("parsed"),
            bin(num(2), BinOp::Pow, bin(num(3), BinOp::Pow, num(2)))
        );
        assert_eq!(
            parse("3+4*2").expect("parsed"),
            bin(num(3), BinOp::Add, bin(num(4), BinOp::Mul, num(2)))
        );
    }

    #[test]
    fn test_unary_minus_below_power() {
        assert_eq!(
            parse("-x^2").expect("parsed"),
            Expr::Neg(Box::new(bin(Expr::Var, BinOp::Pow, num(2))))
        );
        assert_eq!(
            parse("2^-1").expect("parsed"),
            bin(num(2), BinOp::Pow, Expr::Neg(Box::new(num(1))))
        );
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(
            parse("3x^2").expect("parsed"),
            bin(num(3), BinOp::Mul, bin(Expr::Var, BinOp::Pow, num(2)))
        );
    }

    #[test]
    fn test_decimal_literals() {
        assert_eq!(
            parse_decimal("0.25"),
            Some(BigRational::new(BigInt::from(1), BigInt::from(4)))
        );
        assert_eq!(parse_decimal("5."), Some(BigRational::from_integer(BigInt::from(5))));
    }

    #[test]
    fn test_overlong_input_is_a_parse_error() {
        let minus_run = format!("{}5", "-".repeat(100_000));
        assert!(matches!(
            parse(&minus_run),
            Err(EquationError::Parse { position: MAX_EXPRESSION_TOKENS, .. })
        ));
        let tower = vec!["2"; 50_000].join("^");
        assert!(matches!(parse(&tower), Err(EquationError::Parse { .. })));

        let nested = format!("{}5", "-".repeat(MAX_EXPRESSION_TOKENS - 1));
        assert!(parse(&nested).is_ok());
    }

    #[test]
    fn test_parse_errors_carry_position() {
        assert!(matches!(parse("-5+"), Err(EquationError::Parse { position: 3, .. })));
        assert!(matches!(parse("+5"), Err(EquationError::Parse { position: 0, .. })));
        assert!(matches!(parse("2*/3"), Err(EquationError::Parse { position: 2, .. })));
        assert!(matches!(parse(""), Err(EquationError::Parse { position: 0, .. })));
        assert!(matches!(parse("4 "), Err(EquationError::Parse { position: 1, .. })));
    }
}
