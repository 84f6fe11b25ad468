//! Expression solving.
//!
//! The [`Solver`] routes a [`NormalizedExpression`] to one of two branches:
//!
//! - **arithmetic** (no `=`): parse and evaluate to a single [`Number`]
//! - **algebraic** (one `=`): parse both sides, reduce `left - right` to a
//!   polynomial in `x` and find its exact real roots
//!
//! An all-zero reduction is an [`EquationResult::Identity`], a non-zero
//! constant an [`EquationResult::Contradiction`].

pub mod arithmetic;
pub mod lexer;
pub mod parser;
pub mod polynomial;
pub mod roots;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::constants::{DEFAULT_MAX_DEGREE, DEFAULT_ROOT_SEARCH_LIMIT};
use crate::core::errors::{EqResult, EquationError};
use crate::domain::{EquationResult, NormalizedExpression, Number};

pub use polynomial::Polynomial;
pub use roots::{RootSet, find_roots};

/// Configuration for the solving stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    /// Highest polynomial degree accepted in the algebraic branch.
    pub max_degree: u32,
    /// Largest integer coefficient whose divisors are enumerated when
    /// searching for rational roots.
    pub root_search_limit: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_degree: DEFAULT_MAX_DEGREE,
            root_search_limit: DEFAULT_ROOT_SEARCH_LIMIT,
        }
    }
}

impl ConfigValidator for SolverConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_size_range(self.max_degree, 1, 64, "max_degree")?;
        if self.root_search_limit == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "root_search_limit must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Solves normalized expressions.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves `expression`, choosing the branch by the number of `=` signs.
    pub fn solve(&self, expression: &NormalizedExpression) -> EqResult<EquationResult> {
        let text = expression.as_str();
        match text.matches('=').count() {
            0 => self.evaluate(text).map(EquationResult::Value),
            1 => match expression.sides() {
                Some((left, right, right_offset)) => self.solve_equation(left, right, right_offset),
                None => Err(EquationError::parse(0, "missing '='")),
            },
            count => Err(EquationError::MultipleEqualitySigns { count }),
        }
    }

    /// Validates `text` as a normalized expression and solves it.
    pub fn solve_str(&self, text: &str) -> EqResult<EquationResult> {
        self.solve(&NormalizedExpression::new(text)?)
    }

    /// Arithmetic branch: evaluates an expression without `=`.
    pub fn evaluate(&self, text: &str) -> EqResult<Number> {
        if let Some(position) = text.find('x') {
            return Err(EquationError::parse(
                position,
                "variable 'x' in an expression without '='",
            ));
        }
        let expr = parser::parse(text)?;
        let value = arithmetic::evaluate(&expr)?;
        debug!("Evaluated '{}' to {}", text, value);
        Ok(value)
    }

    /// Algebraic branch: solves `left = right` for `x`.
    ///
    /// `right_offset` is the byte offset of `right` in the full expression and
    /// is added to parse error positions from the right side.
    pub fn solve_equation(
        &self,
        left: &str,
        right: &str,
        right_offset: usize,
    ) -> EqResult<EquationResult> {
        let max_degree = self.config.max_degree;
        let left_expr = parser::parse(left)?;
        let right_expr =
            parser::parse(right).map_err(|e| e.offset_position(right_offset))?;

        let lhs = Polynomial::from_expr(&left_expr, max_degree)?;
        let rhs = Polynomial::from_expr(&right_expr, max_degree)?;
        let reduced = lhs.sub(&rhs);
        debug!("Reduced '{}={}' to {} = 0", left, right, reduced);

        match reduced.degree() {
            None => return Ok(EquationResult::Identity),
            Some(0) => return Ok(EquationResult::Contradiction),
            Some(_) => {}
        }

        let set = find_roots(&reduced, self.config.root_search_limit);
        match set.unresolved {
            Some(residual) => {
                warn!(
                    "Roots of {} have no closed form; {} solutions reported",
                    residual,
                    set.roots.len()
                );
                Ok(EquationResult::Incomplete {
                    solutions: set.roots,
                    residual: residual.to_string(),
                })
            }
            None => Ok(EquationResult::Solutions(set.roots)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Solution;
    use num_bigint::BigInt;
    use num_rational::BigRational;

    fn int(n: i64) -> Solution {
        Solution::Rational(BigRational::from_integer(BigInt::from(n)))
    }

    fn solve(text: &str) -> EqResult<EquationResult> {
        Solver::default().solve_str(text)
    }

    #[test]
    fn test_quadratic_equation() {
        let result = solve("2*x^2-8=0").expect("solved");
        assert_eq!(result.solutions(), Some(&[int(-2), int(2)][..]));
        assert_eq!(result.to_string(), "x = -2, x = 2");
    }

    #[test]
    fn test_arithmetic_value() {
        let result = solve("3+4*2").expect("evaluated");
        assert_eq!(result, EquationResult::Value(Number::from_integer(11)));
        assert_eq!(result.to_string(), "11");
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(solve("5/0"), Err(EquationError::DivisionByZero)));
        assert!(matches!(solve("x/0=1"), Err(EquationError::DivisionByZero)));
    }

    #[test]
    fn test_identity_and_contradiction() {
        assert_eq!(solve("x=x").expect("solved"), EquationResult::Identity);
        assert_eq!(solve("2x+1=1+x+x").expect("solved"), EquationResult::Identity);
        assert_eq!(solve("0=1").expect("solved"), EquationResult::Contradiction);
        assert_eq!(solve("x+1=x").expect("solved"), EquationResult::Contradiction);
    }

    #[test]
    fn test_linear_solution_is_exact() {
        let result = solve("3x+1=0").expect("solved");
        assert_eq!(
            result.solutions(),
            Some(&[Solution::Rational(BigRational::new(BigInt::from(-1), BigInt::from(3)))][..])
        );
    }

    #[test]
    fn test_no_real_solutions_is_not_an_error() {
        let result = solve("x^2+4=0").expect("solved");
        assert!(result.has_no_solutions());
        assert_eq!(result.to_string(), "no real solutions");
    }

    #[test]
    fn test_cube_root_is_reported_as_unsolved() {
        let result = solve("x^3=2").expect("solved");
        assert!(!result.has_no_solutions());
        assert!(!result.is_complete());
        assert_eq!(
            result,
            EquationResult::Incomplete {
                solutions: vec![],
                residual: "x^3 - 2".to_string(),
            }
        );
        assert_eq!(result.to_string(), "no closed-form solutions found for x^3 - 2 = 0");

        let result = solve("x^4=2x").expect("solved");
        assert_eq!(result.solutions(), Some(&[int(0)][..]));
        assert!(!result.is_complete());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(solve("-5+"), Err(EquationError::Parse { .. })));
        assert!(matches!(solve("=5"), Err(EquationError::Parse { position: 0, .. })));
        assert!(matches!(solve("x=5+"), Err(EquationError::Parse { position: 4, .. })));
        assert!(matches!(solve("3*x^2"), Err(EquationError::Parse { position: 2, .. })));
    }

    #[test]
    fn test_long_unary_chain_fails_cleanly() {
        let text = format!("x={}1", "-".repeat(100_000));
        assert!(matches!(solve(&text), Err(EquationError::Parse { position: 258, .. })));
    }

    #[test]
    fn test_multiple_equals_rejected_before_solving() {
        assert!(matches!(
            solve("x=1=2"),
            Err(EquationError::MultipleEqualitySigns { count: 2 })
        ));
    }

    #[test]
    fn test_degree_limit() {
        let solver = Solver::new(SolverConfig {
            max_degree: 2,
            ..SolverConfig::default()
        });
        assert!(matches!(
            solver.solve_str("x^3=1"),
            Err(EquationError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        assert!(SolverConfig::default().validate().is_ok());
        assert!(
            SolverConfig {
                max_degree: 0,
                ..SolverConfig::default()
            }
            .validate()
            .is_err()
        );
        assert!(
            SolverConfig {
                root_search_limit: 0,
                ..SolverConfig::default()
            }
            .validate()
            .is_err()
        );
    }
}
