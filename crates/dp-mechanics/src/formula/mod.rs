//! Obstacle and roll formulas.
//!
//! A formula is either a plain integer (`"3"`) or an expression over
//! integers, dice terms (`2d6`, `D10`) and `@reference` tokens, joined with
//! `+`, `-` and parentheses. Resolution happens in two phases:
//!
//! 1. [`prepare`] substitutes references and parses the result. It never
//!    rolls, so a missing reference or a malformed formula costs no dice.
//! 2. [`PreparedFormula::evaluate`] rolls the dice terms in order and
//!    collects every elementary term into an [`EvaluatedFormula`].

pub mod lexer;
pub mod parser;
pub mod reference;

pub use reference::{NoReferences, ReferenceResolver, ReferenceTable};

use std::collections::BTreeSet;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::dice::{self, DiceEvaluator};
use crate::error::{MechError, MechResult};
use lexer::Token;
use parser::Expr;

/// One elementary term of an evaluated formula.
///
/// The value carries the sign of the term's position, so the terms of a
/// formula always sum to its total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormulaTerm {
    /// Signed value of the term.
    pub value: i32,
    /// True for a single die face, false for a flat number.
    pub is_dice_result: bool,
}

impl FormulaTerm {
    /// A flat numeric term.
    pub fn flat(value: i32) -> Self {
        Self {
            value,
            is_dice_result: false,
        }
    }

    /// A single rolled die face.
    pub fn die(value: i32) -> Self {
        Self {
            value,
            is_dice_result: true,
        }
    }
}

/// The fully evaluated form of a formula string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluatedFormula {
    /// The formula as written.
    pub source_formula: String,
    /// The formula after reference substitution, for display.
    pub resolved_formula: String,
    /// Sum of all terms.
    pub raw_total: i32,
    /// True if the formula was a bare non-negative integer.
    pub is_plain_integer: bool,
    /// Elementary terms in evaluation order.
    pub terms: Vec<FormulaTerm>,
}

impl EvaluatedFormula {
    /// The obstacle this formula sets.
    ///
    /// A plain integer is the obstacle itself. Any other formula sets an
    /// obstacle one higher than its total.
    pub fn obstacle(&self) -> i32 {
        if self.is_plain_integer {
            self.raw_total
        } else {
            self.raw_total.saturating_add(1)
        }
    }

    /// Faces of the dice rolled while evaluating, in roll order.
    pub fn dice_results(&self) -> impl Iterator<Item = i32> + '_ {
        self.terms
            .iter()
            .filter(|t| t.is_dice_result)
            .map(|t| t.value)
    }
}

impl std::fmt::Display for EvaluatedFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_plain_integer {
            return write!(f, "{}", self.raw_total);
        }
        let terms: Vec<String> = self
            .terms
            .iter()
            .map(|t| {
                if t.is_dice_result {
                    format!("[{}]", t.value)
                } else {
                    t.value.to_string()
                }
            })
            .collect();
        write!(
            f,
            "{} → {} = {}",
            self.resolved_formula,
            terms.join(" "),
            self.raw_total
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Body {
    Plain(i32),
    Expr(Expr),
}

/// A formula with its references substituted and its syntax checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedFormula {
    source: String,
    resolved: String,
    body: Body,
}

impl PreparedFormula {
    /// The formula as written.
    pub fn source_formula(&self) -> &str {
        &self.source
    }

    /// The substituted, normalized formula.
    pub fn resolved_formula(&self) -> &str {
        &self.resolved
    }

    /// True if the formula is a bare non-negative integer.
    pub fn is_plain_integer(&self) -> bool {
        matches!(self.body, Body::Plain(_))
    }

    /// Number of dice evaluation will roll.
    pub fn dice_count(&self) -> u64 {
        match &self.body {
            Body::Plain(_) => 0,
            Body::Expr(expr) => expr.dice_count(),
        }
    }

    /// Roll the formula's dice and total its terms.
    pub fn evaluate<D: DiceEvaluator + ?Sized>(&self, dice: &mut D) -> MechResult<EvaluatedFormula> {
        let (raw_total, terms) = match &self.body {
            Body::Plain(n) => (*n, vec![FormulaTerm::flat(*n)]),
            Body::Expr(expr) => {
                let mut terms = Vec::new();
                collect_terms(expr, 1, dice, &mut terms)?;
                tracing::trace!(?terms, "formula terms");
                let total: i64 = terms.iter().map(|t| i64::from(t.value)).sum();
                let total = i32::try_from(total).map_err(|_| {
                    MechError::malformed(
                        &self.resolved,
                        0..self.resolved.len(),
                        format!("total {total} is out of range"),
                    )
                })?;
                (total, terms)
            }
        };
        tracing::debug!(
            formula = %self.source,
            resolved = %self.resolved,
            raw_total,
            "formula evaluated"
        );
        Ok(EvaluatedFormula {
            source_formula: self.source.clone(),
            resolved_formula: self.resolved.clone(),
            raw_total,
            is_plain_integer: self.is_plain_integer(),
            terms,
        })
    }
}

fn collect_terms<D: DiceEvaluator + ?Sized>(
    expr: &Expr,
    sign: i32,
    dice: &mut D,
    terms: &mut Vec<FormulaTerm>,
) -> MechResult<()> {
    match expr {
        Expr::Number(n) => terms.push(FormulaTerm::flat(sign * n)),
        Expr::Dice { count, faces } => {
            for face in dice::roll_checked(dice, *faces, *count)? {
                // Faces are bounded by the parser, which rejects dice over i32::MAX sides.
                let face = i32::try_from(face).unwrap_or(i32::MAX);
                terms.push(FormulaTerm::die(sign * face));
            }
        }
        Expr::Neg(inner) => collect_terms(inner, -sign, dice, terms)?,
        Expr::Add(lhs, rhs) => {
            collect_terms(lhs, sign, dice, terms)?;
            collect_terms(rhs, sign, dice, terms)?;
        }
        Expr::Sub(lhs, rhs) => {
            collect_terms(lhs, sign, dice, terms)?;
            collect_terms(rhs, -sign, dice, terms)?;
        }
    }
    Ok(())
}

/// Returns true if `formula` (trimmed) is one or more ASCII digits.
pub fn is_plain_integer(formula: &str) -> bool {
    let trimmed = formula.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit())
}

/// The distinct reference tokens in `formula`, lowercased and without sigil.
pub fn referenced_tokens(formula: &str) -> BTreeSet<String> {
    let (tokens, _) = lexer::lex(formula);
    tokens
        .into_iter()
        .filter_map(|(tok, _)| match tok {
            Token::Reference(name) => Some(name),
            _ => None,
        })
        .collect()
}

/// Substitute references in `formula` and parse the result.
///
/// Fails with [`MechError::UnresolvedReference`] naming every token the
/// resolver does not know, or [`MechError::MalformedFormula`] if the
/// substituted text does not parse.
pub fn prepare<R: ReferenceResolver + ?Sized>(
    formula: &str,
    references: &R,
) -> MechResult<PreparedFormula> {
    if is_plain_integer(formula) {
        let trimmed = formula.trim();
        let start = formula.len() - formula.trim_start().len();
        let value = trimmed.parse::<i32>().map_err(|_| {
            MechError::malformed(formula, start..start + trimmed.len(), "integer literal too large")
        })?;
        return Ok(PreparedFormula {
            source: formula.to_string(),
            resolved: formula.to_string(),
            body: Body::Plain(value),
        });
    }

    let substituted = substitute(formula, references)?;
    let resolved = join_dice_counts(&substituted);

    let (tokens, lex_errors) = lexer::lex(&resolved);
    if let Some(err) = lex_errors.into_iter().next() {
        return Err(MechError::malformed(&resolved, err.span, err.message));
    }
    check_tokens(&resolved, &tokens)?;

    let expr = parser::parse(&tokens, resolved.len()).map_err(|errors| {
        let (span, message) = errors
            .into_iter()
            .next()
            .map(|e| (e.span, e.message))
            .unwrap_or_else(|| (0..resolved.len(), "invalid formula".to_string()));
        MechError::malformed(&resolved, span, message)
    })?;

    tracing::debug!(formula, resolved = %resolved, "formula prepared");
    Ok(PreparedFormula {
        source: formula.to_string(),
        resolved,
        body: Body::Expr(expr),
    })
}

/// Prepare and evaluate `formula` in one step.
pub fn evaluate_formula<R, D>(
    formula: &str,
    references: &R,
    dice: &mut D,
) -> MechResult<EvaluatedFormula>
where
    R: ReferenceResolver + ?Sized,
    D: DiceEvaluator + ?Sized,
{
    prepare(formula, references)?.evaluate(dice)
}

/// Replace every reference token with its substitution text.
fn substitute<R: ReferenceResolver + ?Sized>(formula: &str, references: &R) -> MechResult<String> {
    let (tokens, _) = lexer::lex(formula);
    let spans: Vec<(String, Range<usize>)> = tokens
        .into_iter()
        .filter_map(|(tok, span)| match tok {
            Token::Reference(name) => Some((name, span)),
            _ => None,
        })
        .collect();

    let mut missing = BTreeSet::new();
    let mut values = Vec::with_capacity(spans.len());
    for (name, span) in &spans {
        match references.resolve(name) {
            Some(value) => values.push((span.clone(), value)),
            None => {
                missing.insert(name.clone());
            }
        }
    }
    if !missing.is_empty() {
        tracing::debug!(formula, ?missing, "unresolved references");
        return Err(MechError::UnresolvedReference(missing));
    }

    let mut out = String::with_capacity(formula.len());
    let mut cursor = 0;
    for (span, value) in values {
        out.push_str(&formula[cursor..span.start]);
        out.push_str(value.trim());
        cursor = span.end;
    }
    out.push_str(&formula[cursor..]);
    Ok(out)
}

/// Remove whitespace between a dice count and its die marker (`3 D6` to `3D6`).
fn join_dice_counts(formula: &str) -> String {
    let (tokens, _) = lexer::lex(formula);
    let mut gaps: Vec<Range<usize>> = Vec::new();
    for pair in tokens.windows(2) {
        if let [(Token::Number(_), count), (Token::Die(_), die)] = pair
            && count.end < die.start
            && formula[count.end..die.start].trim().is_empty()
        {
            gaps.push(count.end..die.start);
        }
    }
    if gaps.is_empty() {
        return formula.to_string();
    }

    let mut out = String::with_capacity(formula.len());
    let mut cursor = 0;
    for gap in gaps {
        out.push_str(&formula[cursor..gap.start]);
        cursor = gap.end;
    }
    out.push_str(&formula[cursor..]);
    out
}

/// Reject tokens the grammar has no place for, with a precise message.
fn check_tokens(resolved: &str, tokens: &[(Token, Range<usize>)]) -> MechResult<()> {
    for (tok, span) in tokens {
        match tok {
            Token::Star | Token::Slash => {
                return Err(MechError::malformed(
                    resolved,
                    span.clone(),
                    format!("operator '{tok}' is not supported"),
                ));
            }
            Token::Reference(_) => {
                return Err(MechError::malformed(
                    resolved,
                    span.clone(),
                    format!("substituted text contains reference '{tok}'"),
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    fn refs() -> ReferenceTable {
        ReferenceTable::new()
            .with("strength", "3")
            .with("will", "2")
            .with("pair", "1 + 1")
    }

    #[test]
    fn plain_integer_short_circuits() {
        let mut dice = ScriptedDice::default();
        let eval = evaluate_formula("5", &NoReferences, &mut dice).unwrap();
        assert_eq!(eval.raw_total, 5);
        assert!(eval.is_plain_integer);
        assert_eq!(eval.resolved_formula, "5");
        assert_eq!(eval.terms, vec![FormulaTerm::flat(5)]);
        assert_eq!(eval.obstacle(), 5);
        assert_eq!(dice.calls(), 0);
    }

    #[test]
    fn padded_plain_integer_is_still_plain() {
        let eval = evaluate_formula(" 3 ", &NoReferences, &mut ScriptedDice::default()).unwrap();
        assert!(eval.is_plain_integer);
        assert_eq!(eval.obstacle(), 3);
    }

    #[test]
    fn rolled_obstacle_is_one_higher() {
        let mut dice = ScriptedDice::new([3, 4]);
        let eval = evaluate_formula("2D6", &NoReferences, &mut dice).unwrap();
        assert_eq!(eval.raw_total, 7);
        assert!(!eval.is_plain_integer);
        assert_eq!(eval.obstacle(), 8);
        assert_eq!(eval.terms, vec![FormulaTerm::die(3), FormulaTerm::die(4)]);
    }

    #[test]
    fn non_plain_arithmetic_also_adds_one() {
        let eval = evaluate_formula("2 + 1", &NoReferences, &mut ScriptedDice::default()).unwrap();
        assert_eq!(eval.raw_total, 3);
        assert_eq!(eval.obstacle(), 4);
    }

    #[test]
    fn references_are_substituted() {
        let eval = evaluate_formula("@strength + 2", &refs(), &mut ScriptedDice::default()).unwrap();
        assert_eq!(eval.resolved_formula, "3 + 2");
        assert_eq!(eval.raw_total, 5);
        assert_eq!(eval.terms, vec![FormulaTerm::flat(3), FormulaTerm::flat(2)]);
    }

    #[test]
    fn reference_before_die_marker_becomes_dice_count() {
        let mut dice = ScriptedDice::new([6, 1, 2]);
        let eval = evaluate_formula("@STR D6", &ReferenceTable::new().with("str", "3"), &mut dice)
            .unwrap();
        assert_eq!(eval.resolved_formula, "3D6");
        assert_eq!(eval.raw_total, 9);
        assert_eq!(eval.dice_results().collect::<Vec<_>>(), vec![6, 1, 2]);
    }

    #[test]
    fn literal_count_and_die_are_joined() {
        let prepared = prepare("2 d6 + 1", &NoReferences).unwrap();
        assert_eq!(prepared.resolved_formula(), "2d6 + 1");
        assert_eq!(prepared.dice_count(), 2);
    }

    #[test]
    fn substitution_is_textual() {
        let mut dice = ScriptedDice::new([4]);
        let eval = evaluate_formula("@pair d6", &refs(), &mut dice).unwrap();
        assert_eq!(eval.resolved_formula, "1 + 1d6");
        assert_eq!(eval.raw_total, 5);
    }

    #[test]
    fn subtraction_negates_terms() {
        let mut dice = ScriptedDice::new([2, 5]);
        let eval = evaluate_formula("10 - 2d6 - (1 - 3)", &NoReferences, &mut dice).unwrap();
        assert_eq!(
            eval.terms,
            vec![
                FormulaTerm::flat(10),
                FormulaTerm::die(-2),
                FormulaTerm::die(-5),
                FormulaTerm::flat(-1),
                FormulaTerm::flat(3),
            ]
        );
        assert_eq!(eval.raw_total, 5);
    }

    #[test]
    fn missing_references_are_all_named() {
        let mut dice = ScriptedDice::new([1]);
        let err = evaluate_formula("@Agility + @strength + @LUCK + @luck", &refs(), &mut dice)
            .unwrap_err();
        let expected: BTreeSet<String> = ["agility".to_string(), "luck".to_string()].into();
        assert_eq!(err, MechError::UnresolvedReference(expected));
        assert_eq!(dice.calls(), 0);
    }

    #[test]
    fn referenced_tokens_are_deduplicated() {
        let tokens = referenced_tokens("@Str + @str + @will d6");
        let expected: BTreeSet<String> = ["str".to_string(), "will".to_string()].into();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn malformed_formula_is_reported_with_span() {
        let err = prepare("3 + + ", &NoReferences).unwrap_err();
        match err {
            MechError::MalformedFormula { formula, span, .. } => {
                assert_eq!(formula, "3 + + ");
                assert!(span.start >= 4);
            }
            other => panic!("expected malformed formula, got {other:?}"),
        }
    }

    #[test]
    fn empty_formula_is_malformed() {
        assert!(matches!(
            prepare("", &NoReferences),
            Err(MechError::MalformedFormula { .. })
        ));
    }

    #[test]
    fn multiplication_is_rejected() {
        let err = prepare("2 * 3", &NoReferences).unwrap_err();
        assert_eq!(
            err,
            MechError::malformed("2 * 3", 2..3, "operator '*' is not supported")
        );
    }

    #[test]
    fn reference_inside_substitution_is_rejected() {
        let table = ReferenceTable::new().with("a", "@b");
        assert!(matches!(
            prepare("@a + 1", &table),
            Err(MechError::MalformedFormula { .. })
        ));
    }

    #[test]
    fn stray_characters_are_malformed() {
        assert!(matches!(
            prepare("2 + x", &NoReferences),
            Err(MechError::MalformedFormula { .. })
        ));
    }

    #[test]
    fn same_inputs_give_identical_results() {
        let a = evaluate_formula("@strength d6 + 1", &refs(), &mut ScriptedDice::new([1, 2, 3]))
            .unwrap();
        let b = evaluate_formula("@strength d6 + 1", &refs(), &mut ScriptedDice::new([1, 2, 3]))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn display_shows_terms() {
        let eval = evaluate_formula("1d6 + 2", &NoReferences, &mut ScriptedDice::new([4])).unwrap();
        assert_eq!(eval.to_string(), "1d6 + 2 → [4] 2 = 6");
    }
}
