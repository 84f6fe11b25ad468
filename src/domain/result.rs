//! Results produced by the solver.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;

/// A numeric value: exact while the computation stays rational, `f64` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Exact(BigRational),
    Approx(f64),
}

impl Number {
    pub fn from_integer(value: i64) -> Self {
        Number::Exact(BigRational::from_integer(BigInt::from(value)))
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Exact(r) => r.to_f64().unwrap_or(f64::NAN),
            Number::Approx(v) => *v,
        }
    }

    /// The exact value, if the computation stayed rational.
    pub fn as_exact(&self) -> Option<&BigRational> {
        match self {
            Number::Exact(r) => Some(r),
            Number::Approx(_) => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Exact(r) => r.is_zero(),
            Number::Approx(v) => *v == 0.0,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Exact(r) if r.is_integer() => write!(f, "{}", r.to_integer()),
            other => write!(f, "{}", other.to_f64()),
        }
    }
}

/// One exact real solution of an equation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    /// A rational root.
    Rational(BigRational),
    /// `rational + coefficient * sqrt(radicand)` with a square-free radicand > 1.
    Surd {
        rational: BigRational,
        coefficient: BigRational,
        radicand: BigInt,
    },
}

impl Solution {
    pub fn to_f64(&self) -> f64 {
        match self {
            Solution::Rational(r) => r.to_f64().unwrap_or(f64::NAN),
            Solution::Surd {
                rational,
                coefficient,
                radicand,
            } => {
                let a = rational.to_f64().unwrap_or(f64::NAN);
                let c = coefficient.to_f64().unwrap_or(f64::NAN);
                let r = radicand.to_f64().unwrap_or(f64::NAN);
                a + c * r.sqrt()
            }
        }
    }

    /// Orders solutions by numeric value.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Solution::Rational(a), Solution::Rational(b)) => a.cmp(b),
            _ => self
                .to_f64()
                .partial_cmp(&other.to_f64())
                .unwrap_or(Ordering::Equal),
        }
    }
}

fn write_surd_term(
    f: &mut fmt::Formatter<'_>,
    coefficient: &BigRational,
    radicand: &BigInt,
) -> fmt::Result {
    let numer = coefficient.numer().abs();
    let denom = coefficient.denom();
    if !numer.is_one() {
        write!(f, "{numer}*")?;
    }
    write!(f, "sqrt({radicand})")?;
    if !denom.is_one() {
        write!(f, "/{denom}")?;
    }
    Ok(())
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solution::Rational(r) => write!(f, "{r}"),
            Solution::Surd {
                rational,
                coefficient,
                radicand,
            } => {
                if rational.is_zero() {
                    if coefficient.is_negative() {
                        write!(f, "-")?;
                    }
                } else {
                    write!(f, "{rational}")?;
                    write!(f, "{}", if coefficient.is_negative() { " - " } else { " + " })?;
                }
                write_surd_term(f, coefficient, radicand)
            }
        }
    }
}

/// Outcome of a solve attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EquationResult {
    /// The arithmetic branch evaluated to a single number.
    Value(Number),
    /// The algebraic branch found these distinct real solutions (possibly none).
    /// Every real root of the equation is listed.
    Solutions(Vec<Solution>),
    /// Some real roots may be missing: `residual` (in `x`, equal to zero) is a
    /// factor with no rational roots that the solver could not solve in
    /// closed form. `solutions` holds the roots that were found.
    Incomplete {
        solutions: Vec<Solution>,
        residual: String,
    },
    /// Both sides are identical for every `x`.
    Identity,
    /// The equation reduces to a false constant statement such as `0 = 1`.
    Contradiction,
}

impl EquationResult {
    pub fn value(&self) -> Option<&Number> {
        match self {
            EquationResult::Value(n) => Some(n),
            _ => None,
        }
    }

    pub fn solutions(&self) -> Option<&[Solution]> {
        match self {
            EquationResult::Solutions(s) => Some(s),
            EquationResult::Incomplete { solutions, .. } => Some(solutions),
            _ => None,
        }
    }

    /// Whether the reported solutions are known to be all of them.
    pub fn is_complete(&self) -> bool {
        !matches!(self, EquationResult::Incomplete { .. })
    }

    /// Whether the equation is proven to have no real solution.
    pub fn has_no_solutions(&self) -> bool {
        matches!(self, EquationResult::Contradiction)
            || matches!(self, EquationResult::Solutions(s) if s.is_empty())
    }
}

fn write_solutions(f: &mut fmt::Formatter<'_>, solutions: &[Solution]) -> fmt::Result {
    for (i, s) in solutions.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "x = {s}")?;
    }
    Ok(())
}

impl fmt::Display for EquationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquationResult::Value(n) => write!(f, "{n}"),
            EquationResult::Solutions(solutions) if solutions.is_empty() => {
                write!(f, "no real solutions")
            }
            EquationResult::Solutions(solutions) => write_solutions(f, solutions),
            EquationResult::Incomplete {
                solutions,
                residual,
            } => {
                if !solutions.is_empty() {
                    write_solutions(f, solutions)?;
                    write!(f, "; ")?;
                }
                write!(f, "no closed-form solutions found for {residual} = 0")
            }
            EquationResult::Identity => write!(f, "infinitely many solutions (identity)"),
            EquationResult::Contradiction => write!(f, "no solution (contradiction)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Number::from_integer(11).to_string(), "11");
        assert_eq!(Number::Exact(ratio(7, 2)).to_string(), "3.5");
        assert_eq!(Number::Approx(2.0).to_string(), "2");
    }

    #[test]
    fn test_solution_display() {
        assert_eq!(Solution::Rational(ratio(-4, 3)).to_string(), "-4/3");
        let surd = Solution::Surd {
            rational: ratio(1, 1),
            coefficient: ratio(-1, 1),
            radicand: BigInt::from(2),
        };
        assert_eq!(surd.to_string(), "1 - sqrt(2)");
        let halves = Solution::Surd {
            rational: ratio(0, 1),
            coefficient: ratio(3, 2),
            radicand: BigInt::from(5),
        };
        assert_eq!(halves.to_string(), "3*sqrt(5)/2");
        assert!((halves.to_f64() - 1.5 * 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_result_display() {
        let result = EquationResult::Solutions(vec![
            Solution::Rational(ratio(-2, 1)),
            Solution::Rational(ratio(2, 1)),
        ]);
        assert_eq!(result.to_string(), "x = -2, x = 2");
        assert!(EquationResult::Solutions(vec![]).has_no_solutions());
        assert!(EquationResult::Contradiction.has_no_solutions());
        assert!(!EquationResult::Identity.has_no_solutions());
    }

    #[test]
    fn test_incomplete_result_is_not_proven_empty() {
        let gave_up = EquationResult::Incomplete {
            solutions: vec![],
            residual: "x^3 - 2".to_string(),
        };
        assert!(!gave_up.has_no_solutions());
        assert!(!gave_up.is_complete());
        assert_eq!(gave_up.to_string(), "no closed-form solutions found for x^3 - 2 = 0");

        let partial = EquationResult::Incomplete {
            solutions: vec![Solution::Rational(ratio(0, 1))],
            residual: "x^3 - 2".to_string(),
        };
        assert_eq!(
            partial.to_string(),
            "x = 0; no closed-form solutions found for x^3 - 2 = 0"
        );
        assert!(EquationResult::Solutions(vec![]).is_complete());
    }
}
