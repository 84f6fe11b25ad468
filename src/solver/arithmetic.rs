//! Evaluation of closed numeric expressions.
//!
//! Values stay exact rationals through `+ - * /` and integer powers; any
//! other power falls back to `f64` and the rest of the computation follows.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use super::parser::{BinOp, Expr};
use crate::core::errors::{EqResult, EquationError};
use crate::domain::Number;

/// Largest integer exponent evaluated exactly.
pub const MAX_EXACT_EXPONENT: i64 = 4096;

/// Evaluates an expression without free variables.
pub fn evaluate(expr: &Expr) -> EqResult<Number> {
    match expr {
        Expr::Number(value) => Ok(Number::Exact(value.clone())),
        Expr::Var => Err(EquationError::unsupported(
            "the variable x cannot be evaluated without an equation",
        )),
        Expr::Neg(inner) => Ok(match evaluate(inner)? {
            Number::Exact(v) => Number::Exact(-v),
            Number::Approx(v) => Number::Approx(-v),
        }),
        Expr::Binary(lhs, op, rhs) => apply(*op, evaluate(lhs)?, evaluate(rhs)?),
    }
}

/// Applies one binary operator.
pub fn apply(op: BinOp, lhs: Number, rhs: Number) -> EqResult<Number> {
    if op == BinOp::Div && rhs.is_zero() {
        return Err(EquationError::DivisionByZero);
    }
    let result = match (lhs, rhs) {
        (Number::Exact(a), Number::Exact(b)) => match op {
            BinOp::Add => Number::Exact(a + b),
            BinOp::Sub => Number::Exact(a - b),
            BinOp::Mul => Number::Exact(a * b),
            BinOp::Div => Number::Exact(a / b),
            BinOp::Pow => return exact_pow(a, &b),
        },
        (a, b) => {
            let (a, b) = (a.to_f64(), b.to_f64());
            if op == BinOp::Pow && a == 0.0 && b < 0.0 {
                return Err(EquationError::DivisionByZero);
            }
            Number::Approx(float_op(op, a, b))
        }
    };
    finite(result)
}

fn float_op(op: BinOp, a: f64, b: f64) -> f64 {
    match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        BinOp::Pow => a.powf(b),
    }
}

fn exact_pow(base: BigRational, exponent: &BigRational) -> EqResult<Number> {
    let small_integer = exponent
        .is_integer()
        .then(|| exponent.to_integer().to_i64())
        .flatten()
        .filter(|e| e.abs() <= MAX_EXACT_EXPONENT);

    match small_integer {
        Some(e) if e < 0 && base.is_zero() => Err(EquationError::DivisionByZero),
        Some(e) => Ok(Number::Exact(rational_pow(&base, e))),
        None => {
            let b = base.to_f64().unwrap_or(f64::NAN);
            let e = exponent.to_f64().unwrap_or(f64::NAN);
            if b == 0.0 && e < 0.0 {
                return Err(EquationError::DivisionByZero);
            }
            finite(Number::Approx(b.powf(e)))
        }
    }
}

/// `base^exponent` for a small integer exponent. `base` must be non-zero
/// when `exponent` is negative.
pub fn rational_pow(base: &BigRational, exponent: i64) -> BigRational {
    let magnitude = exponent.unsigned_abs() as usize;
    let numer: BigInt = num_traits::pow(base.numer().clone(), magnitude);
    let denom: BigInt = num_traits::pow(base.denom().clone(), magnitude);
    if exponent >= 0 {
        BigRational::new(numer, denom)
    } else {
        BigRational::new(denom, numer)
    }
}

fn finite(value: Number) -> EqResult<Number> {
    match value {
        Number::Approx(v) if !v.is_finite() => Err(EquationError::unsupported(format!(
            "result {v} is not a finite real number"
        ))),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::parser::parse;

    fn eval(text: &str) -> EqResult<Number> {
        evaluate(&parse(text).expect("parsed"))
    }

    fn ratio(n: i64, d: i64) -> Number {
        Number::Exact(BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(eval("3+4*2").expect("evaluated"), Number::from_integer(11));
        assert_eq!(eval("10-4-3").expect("evaluated"), Number::from_integer(3));
        assert_eq!(eval("-2^2").expect("evaluated"), Number::from_integer(-4));
    }

    #[test]
    fn test_exact_division() {
        assert_eq!(eval("1/3+1/6").expect("evaluated"), ratio(1, 2));
        assert_eq!(eval("0.1+0.2").expect("evaluated"), ratio(3, 10));
        assert_eq!(eval("2^-2").expect("evaluated"), ratio(1, 4));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(eval("5/0"), Err(EquationError::DivisionByZero)));
        assert!(matches!(eval("1/0.0"), Err(EquationError::DivisionByZero)));
        assert!(matches!(eval("0^-1"), Err(EquationError::DivisionByZero)));
        assert!(matches!(eval("1/2^0.5/0"), Err(EquationError::DivisionByZero)));
    }

    #[test]
    fn test_fractional_power_falls_back_to_float() {
        match eval("2^0.5").expect("evaluated") {
            Number::Approx(v) => assert!((v - 2f64.sqrt()).abs() < 1e-12),
            other => panic!("expected approximate value, got {other:?}"),
        }
        assert_eq!(eval("4^0.5*0").expect("evaluated").to_f64(), 0.0);
    }

    #[test]
    fn test_overflowing_power_is_unsupported() {
        assert!(matches!(
            eval("10^5000"),
            Err(EquationError::Unsupported { .. })
        ));
    }
}
