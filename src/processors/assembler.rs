//! Symbol stream assembly.
//!
//! The [`SymbolAssembler`] concatenates classifier labels into a raw token
//! string and runs it through an ordered table of [`RewriteRule`]s. Each
//! rule sees the output of the previous one, so the order of
//! [`REWRITE_RULES`] is part of the grammar.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::core::errors::{EqResult, EquationError};
use crate::domain::{Label, LabeledSymbol, NormalizedExpression};

static EXPONENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d*)x(\d+)")
        .unwrap_or_else(|e| panic!("Failed to compile regex pattern: {e}"))
});

static DISALLOWED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^0-9x+\-*/^=.]")
        .unwrap_or_else(|e| panic!("Failed to compile regex pattern: {e}"))
});

/// One named string rewrite.
#[derive(Debug, Clone, Copy)]
pub struct RewriteRule {
    /// Short identifier used in logs.
    pub name: &'static str,
    /// The rewrite itself.
    pub apply: fn(&str) -> String,
}

/// The default rule table, in application order.
pub const REWRITE_RULES: [RewriteRule; 5] = [
    RewriteRule {
        name: "minus_pair_to_equals",
        apply: minus_pair_to_equals,
    },
    RewriteRule {
        name: "exponent",
        apply: rewrite_exponents,
    },
    RewriteRule {
        name: "bare_x_multiplication",
        apply: bare_x_to_multiplication,
    },
    RewriteRule {
        name: "decimal_repair",
        apply: repair_decimals,
    },
    RewriteRule {
        name: "whitelist",
        apply: strip_disallowed,
    },
];

/// A horizontal equals bar segments into two `-` glyphs; `--` always means `=`.
fn minus_pair_to_equals(raw: &str) -> String {
    raw.replace("--", "=")
}

/// `x` followed by digits is a power: `x2` → `x^2`, `3x2` → `3*x^2`.
///
/// Only equations have a variable to raise; in arithmetic `3x2` is left for
/// the multiplication rule.
fn rewrite_exponents(raw: &str) -> String {
    if !raw.contains('=') {
        return raw.to_string();
    }
    EXPONENT_REGEX
        .replace_all(raw, |caps: &Captures| {
            let coefficient = &caps[1];
            let power = &caps[2];
            if coefficient.is_empty() {
                format!("x^{power}")
            } else {
                format!("{coefficient}*x^{power}")
            }
        })
        .into_owned()
}

/// Without `=` there is no variable, so a bare `x` is a multiplication sign.
fn bare_x_to_multiplication(raw: &str) -> String {
    if raw.contains('=') {
        return raw.to_string();
    }
    let chars: Vec<char> = raw.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if c == 'x' && chars.get(i + 1) != Some(&'^') {
                '*'
            } else {
                c
            }
        })
        .collect()
}

/// A `.` without a digit before it gets a leading `0`.
fn repair_decimals(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    let mut previous: Option<char> = None;
    for c in raw.chars() {
        if c == '.' && !previous.is_some_and(|p| p.is_ascii_digit()) {
            out.push('0');
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

fn strip_disallowed(raw: &str) -> String {
    DISALLOWED_REGEX.replace_all(raw, "").into_owned()
}

/// Turns ordered labels into a [`NormalizedExpression`].
#[derive(Debug, Clone)]
pub struct SymbolAssembler {
    rules: Vec<RewriteRule>,
}

impl Default for SymbolAssembler {
    fn default() -> Self {
        Self {
            rules: REWRITE_RULES.to_vec(),
        }
    }
}

impl SymbolAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule that runs after the existing ones.
    pub fn with_rule(mut self, rule: RewriteRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Assembles a labeled symbol stream.
    ///
    /// # Errors
    ///
    /// * [`EquationError::InvalidInput`] if ordinals are not strictly increasing
    ///   or a digit label is out of range.
    /// * [`EquationError::EmptyExpression`] if nothing survives the rewrite.
    /// * [`EquationError::MultipleEqualitySigns`] if the result holds more than one `=`.
    pub fn assemble(&self, symbols: &[LabeledSymbol]) -> EqResult<NormalizedExpression> {
        if let Some(pair) = symbols.windows(2).find(|w| w[0].ordinal >= w[1].ordinal) {
            return Err(EquationError::invalid_input(format!(
                "symbols out of reading order: ordinal {} followed by {}",
                pair[0].ordinal, pair[1].ordinal
            )));
        }
        let labels: Vec<Label> = symbols.iter().map(|s| s.label).collect();
        self.assemble_labels(&labels)
    }

    /// Assembles labels already in reading order.
    pub fn assemble_labels(&self, labels: &[Label]) -> EqResult<NormalizedExpression> {
        let raw = labels
            .iter()
            .map(|l| {
                l.validate()
                    .map(Label::as_char)
                    .map_err(|e| EquationError::invalid_input(e.to_string()))
            })
            .collect::<EqResult<String>>()?;
        self.normalize(&raw)
    }

    /// Runs the rule table over `raw` and validates the result.
    pub fn normalize(&self, raw: &str) -> EqResult<NormalizedExpression> {
        let rewritten = self.rewrite(raw);
        debug!("Assembled '{}' into '{}'", raw, rewritten);
        NormalizedExpression::new(rewritten)
    }

    /// Runs the rule table without validating the result.
    pub fn rewrite(&self, raw: &str) -> String {
        self.rules.iter().fold(raw.to_string(), |text, rule| {
            let next = (rule.apply)(&text);
            if next != text {
                debug!("Rule {} rewrote '{}' to '{}'", rule.name, text, next);
            }
            next
        })
    }
}
