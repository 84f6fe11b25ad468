//! Univariate polynomials with exact rational coefficients.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::fmt;

use super::arithmetic::{MAX_EXACT_EXPONENT, rational_pow};
use super::parser::{BinOp, Expr};
use crate::core::errors::{EqResult, EquationError};

/// A polynomial in `x`; `coefficients[i]` multiplies `x^i`.
///
/// Trailing zero coefficients are always trimmed, so the zero polynomial has
/// no coefficients at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial {
    coefficients: Vec<BigRational>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Self {
            coefficients: Vec::new(),
        }
    }

    pub fn constant(value: BigRational) -> Self {
        Self::from_coefficients(vec![value])
    }

    /// The polynomial `x`.
    pub fn x() -> Self {
        Self::from_coefficients(vec![BigRational::zero(), BigRational::one()])
    }

    /// Builds from ascending coefficients.
    pub fn from_coefficients(mut coefficients: Vec<BigRational>) -> Self {
        while coefficients.last().is_some_and(|c| c.is_zero()) {
            coefficients.pop();
        }
        Self { coefficients }
    }

    /// Lowers an expression tree into a polynomial.
    ///
    /// # Errors
    ///
    /// * [`EquationError::DivisionByZero`] when dividing by a zero constant.
    /// * [`EquationError::Unsupported`] for `x` in a denominator, a power of
    ///   `x` that is not a non-negative integer, or a degree above `max_degree`.
    pub fn from_expr(expr: &Expr, max_degree: u32) -> EqResult<Self> {
        let poly = match expr {
            Expr::Number(value) => Self::constant(value.clone()),
            Expr::Var => Self::x(),
            Expr::Neg(inner) => Self::from_expr(inner, max_degree)?.neg(),
            Expr::Binary(lhs, op, rhs) => {
                let a = Self::from_expr(lhs, max_degree)?;
                let b = Self::from_expr(rhs, max_degree)?;
                match op {
                    BinOp::Add => a.add(&b),
                    BinOp::Sub => a.sub(&b),
                    BinOp::Mul => a.mul(&b),
                    BinOp::Div => a.div(&b)?,
                    BinOp::Pow => a.pow(&b, max_degree)?,
                }
            }
        };
        match poly.degree() {
            Some(d) if d > max_degree as usize => Err(EquationError::unsupported(format!(
                "degree {d} exceeds the maximum of {max_degree}"
            ))),
            _ => Ok(poly),
        }
    }

    pub fn coefficients(&self) -> &[BigRational] {
        &self.coefficients
    }

    /// Degree, or `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coefficients.len().checked_sub(1)
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// The constant value if the polynomial has degree 0 (or is zero).
    pub fn as_constant(&self) -> Option<BigRational> {
        match self.coefficients.len() {
            0 => Some(BigRational::zero()),
            1 => Some(self.coefficients[0].clone()),
            _ => None,
        }
    }

    pub fn neg(&self) -> Self {
        Self {
            coefficients: self.coefficients.iter().map(|c| -c).collect(),
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        let len = self.coefficients.len().max(other.coefficients.len());
        let zero = BigRational::zero();
        Self::from_coefficients(
            (0..len)
                .map(|i| {
                    self.coefficients.get(i).unwrap_or(&zero)
                        + other.coefficients.get(i).unwrap_or(&zero)
                })
                .collect(),
        )
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut out =
            vec![BigRational::zero(); self.coefficients.len() + other.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in other.coefficients.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Self::from_coefficients(out)
    }

    pub fn scale(&self, factor: &BigRational) -> Self {
        Self::from_coefficients(self.coefficients.iter().map(|c| c * factor).collect())
    }

    fn div(&self, divisor: &Self) -> EqResult<Self> {
        let Some(value) = divisor.as_constant() else {
            return Err(EquationError::unsupported(
                "the variable x may not appear in a denominator",
            ));
        };
        if value.is_zero() {
            return Err(EquationError::DivisionByZero);
        }
        Ok(self.scale(&value.recip()))
    }

    fn pow(&self, exponent: &Self, max_degree: u32) -> EqResult<Self> {
        let Some(exp) = exponent.as_constant() else {
            return Err(EquationError::unsupported(
                "the variable x may not appear in an exponent",
            ));
        };
        let exp = exp
            .is_integer()
            .then(|| exp.to_integer().to_i64())
            .flatten()
            .filter(|e| e.abs() <= MAX_EXACT_EXPONENT)
            .ok_or_else(|| {
                EquationError::unsupported(format!("exponent {exp} is not a small integer"))
            })?;

        if let Some(base) = self.as_constant() {
            if exp < 0 && base.is_zero() {
                return Err(EquationError::DivisionByZero);
            }
            return Ok(Self::constant(rational_pow(&base, exp)));
        }

        if exp < 0 {
            return Err(EquationError::unsupported(format!(
                "negative power {exp} of an expression in x"
            )));
        }
        let degree = self.degree().unwrap_or(0) as u64;
        if degree * exp as u64 > max_degree as u64 {
            return Err(EquationError::unsupported(format!(
                "degree {} exceeds the maximum of {max_degree}",
                degree * exp as u64
            )));
        }
        let mut result = Self::constant(BigRational::one());
        for _ in 0..exp {
            result = result.mul(self);
        }
        Ok(result)
    }

    /// Evaluates at `x` with Horner's scheme.
    pub fn evaluate(&self, x: &BigRational) -> BigRational {
        self.coefficients
            .iter()
            .rev()
            .fold(BigRational::zero(), |acc, c| acc * x + c)
    }

    /// Divides by `(x - root)`, discarding the remainder.
    pub fn deflate(&self, root: &BigRational) -> Self {
        let n = self.coefficients.len();
        if n <= 1 {
            return Self::zero();
        }
        let mut quotient = vec![BigRational::zero(); n - 1];
        let mut carry = BigRational::zero();
        for i in (1..n).rev() {
            carry = &self.coefficients[i] + carry * root;
            quotient[i - 1] = carry.clone();
        }
        Self::from_coefficients(quotient)
    }

    /// Divides by `x`, assuming the constant term is zero.
    pub fn shift_down(&self) -> Self {
        Self::from_coefficients(self.coefficients.iter().skip(1).cloned().collect())
    }

    /// Scales to integer coefficients with no common factor and a positive
    /// leading coefficient.
    pub fn primitive_integer_coefficients(&self) -> Vec<BigInt> {
        use num_integer::Integer;

        let lcm = self
            .coefficients
            .iter()
            .fold(BigInt::one(), |acc, c| acc.lcm(c.denom()));
        let mut ints: Vec<BigInt> = self
            .coefficients
            .iter()
            .map(|c| (c * BigRational::from_integer(lcm.clone())).to_integer())
            .collect();
        let gcd = ints.iter().fold(BigInt::zero(), |acc, c| acc.gcd(c));
        if !gcd.is_zero() && !gcd.is_one() {
            for c in &mut ints {
                *c = &*c / &gcd;
            }
        }
        if ints.last().is_some_and(|c| c.is_negative()) {
            for c in &mut ints {
                *c = -&*c;
            }
        }
        ints
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (power, c) in self.coefficients.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }
            let sign = if c.is_negative() { "-" } else { "+" };
            if first {
                if c.is_negative() {
                    write!(f, "-")?;
                }
            } else {
                write!(f, " {sign} ")?;
            }
            first = false;
            let magnitude = c.abs();
            match power {
                0 => write!(f, "{magnitude}")?,
                _ => {
                    if !magnitude.is_one() {
                        write!(f, "{magnitude}*")?;
                    }
                    if power == 1 {
                        write!(f, "x")?;
                    } else {
                        write!(f, "x^{power}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::parser::parse;

    fn int(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    fn poly(text: &str) -> EqResult<Polynomial> {
        Polynomial::from_expr(&parse(text).expect("parsed"), 16)
    }

    #[test]
    fn test_expansion() {
        let p = poly("x").expect("lowered");
        assert_eq!(p, Polynomial::x());

        let p = poly("2*x^2-8").expect("lowered");
        assert_eq!(p.coefficients(), &[int(-8), int(0), int(2)]);
        assert_eq!(p.to_string(), "2*x^2 - 8");
    }

    #[test]
    fn test_cancellation_trims_degree() {
        let p = poly("x^2+3x-x^2").expect("lowered");
        assert_eq!(p.degree(), Some(1));
        assert!(poly("x-x").expect("lowered").is_zero());
    }

    #[test]
    fn test_unsupported_forms() {
        assert!(matches!(poly("1/x"), Err(EquationError::Unsupported { .. })));
        assert!(matches!(poly("2^x"), Err(EquationError::Unsupported { .. })));
        assert!(matches!(poly("x^0.5"), Err(EquationError::Unsupported { .. })));
        assert!(matches!(poly("x^-1"), Err(EquationError::Unsupported { .. })));
        assert!(matches!(poly("x^17"), Err(EquationError::Unsupported { .. })));
        assert!(matches!(poly("x/0"), Err(EquationError::DivisionByZero)));
    }

    #[test]
    fn test_constant_powers_are_exact() {
        let p = poly("x/2^-1").expect("lowered");
        assert_eq!(p.coefficients(), &[int(0), int(2)]);
    }

    #[test]
    fn test_evaluate_and_deflate() {
        // (x - 1)(x - 2)(x + 3) = x^3 - 7x + 6
        let p = poly("x^3-7x+6").expect("lowered");
        assert!(p.evaluate(&int(2)).is_zero());
        let q = p.deflate(&int(2));
        assert_eq!(q.coefficients(), &[int(-3), int(2), int(1)]);
    }

    #[test]
    fn test_primitive_integer_coefficients() {
        let p = poly("0.5*x^2-2").expect("lowered");
        assert_eq!(
            p.primitive_integer_coefficients(),
            vec![BigInt::from(-4), BigInt::from(0), BigInt::from(1)]
        );
        let n = poly("0-3x+6").expect("lowered");
        assert_eq!(
            n.primitive_integer_coefficients(),
            vec![BigInt::from(-2), BigInt::from(1)]
        );
    }
}
