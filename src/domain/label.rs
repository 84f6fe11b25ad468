//! Symbol labels and the labeled symbol stream.

use crate::core::errors::ClassifierError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A classification label.
///
/// The classifier alphabet is the fifteen symbols in [`Label::ALPHABET`].
/// [`Label::Equals`] is not produced by trained classifiers (an equals sign
/// usually segments into two `-` glyphs) but is accepted in the symbol
/// stream so heuristic classifiers can emit it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// A digit `0..=9`.
    Digit(u8),
    Dot,
    Minus,
    Plus,
    Slash,
    /// The literal `x`: the variable, or multiplication in arithmetic.
    X,
    Equals,
}

impl Label {
    /// The fifteen labels a glyph classifier may return, in class-index order.
    pub const ALPHABET: [Label; 15] = [
        Label::Digit(0),
        Label::Digit(1),
        Label::Digit(2),
        Label::Digit(3),
        Label::Digit(4),
        Label::Digit(5),
        Label::Digit(6),
        Label::Digit(7),
        Label::Digit(8),
        Label::Digit(9),
        Label::Dot,
        Label::Minus,
        Label::Plus,
        Label::Slash,
        Label::X,
    ];

    /// Checks that a digit label is a single decimal digit.
    pub fn validate(self) -> Result<Self, ClassifierError> {
        match self {
            Label::Digit(d) if d > 9 => Err(ClassifierError::UnknownLabel {
                label: format!("digit {d}"),
            }),
            label => Ok(label),
        }
    }

    /// Character this label contributes to the raw token string.
    ///
    /// An out-of-range digit maps to `?`; see [`Label::validate`].
    pub fn as_char(self) -> char {
        match self {
            Label::Digit(d) => char::from_digit(u32::from(d), 10).unwrap_or('?'),
            Label::Dot => '.',
            Label::Minus => '-',
            Label::Plus => '+',
            Label::Slash => '/',
            Label::X => 'x',
            Label::Equals => '=',
        }
    }

    /// Parses a single character. Returns `None` for characters outside the stream alphabet.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Label::Digit(c as u8 - b'0')),
            '.' => Some(Label::Dot),
            '-' => Some(Label::Minus),
            '+' => Some(Label::Plus),
            '/' => Some(Label::Slash),
            'x' | 'X' => Some(Label::X),
            '=' => Some(Label::Equals),
            _ => None,
        }
    }

    /// Maps a class index of [`Label::ALPHABET`] to its label.
    pub fn from_class_index(index: usize) -> Option<Self> {
        Self::ALPHABET.get(index).copied()
    }

    /// Parses a whole label string such as `"3x2--5"`, one label per character.
    pub fn parse_sequence(text: &str) -> Result<Vec<Label>, ClassifierError> {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| {
                Label::from_char(c).ok_or_else(|| ClassifierError::UnknownLabel {
                    label: c.to_string(),
                })
            })
            .collect()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Label {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Label::from_char(c),
            _ => None,
        }
        .ok_or_else(|| ClassifierError::UnknownLabel {
            label: s.to_string(),
        })
    }
}

/// A label attached to the ordinal of the glyph it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledSymbol {
    pub ordinal: usize,
    pub label: Label,
}

impl LabeledSymbol {
    pub fn new(ordinal: usize, label: Label) -> Self {
        Self { ordinal, label }
    }

    /// Numbers a label sequence in reading order.
    pub fn sequence(labels: &[Label]) -> Vec<LabeledSymbol> {
        labels
            .iter()
            .enumerate()
            .map(|(ordinal, &label)| LabeledSymbol::new(ordinal, label))
            .collect()
    }
}
