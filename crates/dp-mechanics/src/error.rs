//! Error types for the dice-pool engine.

use std::collections::BTreeSet;
use std::ops::Range;

/// Errors that can occur while resolving a roll.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MechError {
    /// A formula references tokens that no resolver could supply.
    ///
    /// This is the only recoverable error: supply values for every listed
    /// token and roll again.
    #[error("unresolved reference(s): {}", join_tokens(.0))]
    UnresolvedReference(BTreeSet<String>),

    /// A formula could not be parsed or evaluated after substitution.
    #[error("malformed formula '{formula}': {message}")]
    MalformedFormula {
        /// The formula text the span points into (after substitution).
        formula: String,
        /// Byte range of the offending input.
        span: Range<usize>,
        /// Human-readable description of the problem.
        message: String,
    },

    /// A roll request failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The dice evaluator broke its contract or ran out of values.
    #[error("dice source error: {0}")]
    DiceSource(String),

    /// A configuration file could not be read or parsed.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl MechError {
    /// Build a [`MechError::MalformedFormula`] for the given formula and span.
    pub fn malformed(formula: &str, span: Range<usize>, message: impl Into<String>) -> Self {
        Self::MalformedFormula {
            formula: formula.to_string(),
            span,
            message: message.into(),
        }
    }

    /// Returns true if the caller can recover by supplying more references.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnresolvedReference(_))
    }
}

fn join_tokens(tokens: &BTreeSet<String>) -> String {
    tokens
        .iter()
        .map(|t| format!("@{t}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_reference_lists_every_token() {
        let tokens: BTreeSet<String> = ["will".to_string(), "strength".to_string()].into();
        let err = MechError::UnresolvedReference(tokens);
        assert_eq!(
            err.to_string(),
            "unresolved reference(s): @strength, @will"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn malformed_formula_display() {
        let err = MechError::malformed("3 +", 3..3, "unexpected end of input");
        assert_eq!(
            err.to_string(),
            "malformed formula '3 +': unexpected end of input"
        );
        assert!(!err.is_recoverable());
    }
}
