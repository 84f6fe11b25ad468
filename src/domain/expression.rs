//! The normalized expression handed from the assembler to the solver.

use crate::core::errors::{EqResult, EquationError};
use std::fmt;

/// Characters a normalized expression may contain.
///
/// `.` is kept so decimal operands survive normalization.
pub const EXPRESSION_CHARSET: &str = "0123456789x+-*/^=.";

/// A sanitized operator/operand string with at most one `=`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedExpression(String);

impl NormalizedExpression {
    /// Validates `text` against the expression charset.
    ///
    /// Fails with [`EquationError::EmptyExpression`] for an empty string,
    /// [`EquationError::Parse`] for a character outside the charset and
    /// [`EquationError::MultipleEqualitySigns`] for more than one `=`.
    pub fn new(text: impl Into<String>) -> EqResult<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(EquationError::EmptyExpression);
        }
        if let Some((position, c)) = text
            .char_indices()
            .find(|(_, c)| !EXPRESSION_CHARSET.contains(*c))
        {
            return Err(EquationError::parse(
                position,
                format!("character '{c}' is not allowed in an expression"),
            ));
        }
        let count = text.matches('=').count();
        if count > 1 {
            return Err(EquationError::MultipleEqualitySigns { count });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the expression is an equation (contains `=`).
    pub fn is_equation(&self) -> bool {
        self.0.contains('=')
    }

    /// Left and right side of an equation, with the byte offset of the right side.
    pub fn sides(&self) -> Option<(&str, &str, usize)> {
        self.0
            .split_once('=')
            .map(|(left, right)| (left, right, left.len() + 1))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedExpression {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
