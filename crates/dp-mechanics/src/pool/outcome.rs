//! Roll outcomes.

use serde::Serialize;

use crate::formula::EvaluatedFormula;
use crate::modifier::RollModifier;
use crate::outcome::OutcomeKind;
use crate::sum::SumExpression;

/// The immutable result of one dice-pool roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollOutcome {
    pub(crate) effective_dice_count: u32,
    pub(crate) total_dice_expression: SumExpression,
    pub(crate) evaluated_obstacle: EvaluatedFormula,
    pub(crate) obstacle: i32,
    pub(crate) hits: Vec<u32>,
    pub(crate) misses: Vec<u32>,
    pub(crate) blank_count: u32,
    pub(crate) degree: i32,
    pub(crate) outcome: OutcomeKind,
    pub(crate) modifier: RollModifier,
    pub(crate) compensation_points: i32,
}

impl RollOutcome {
    /// Number of dice rolled.
    pub fn effective_dice_count(&self) -> u32 {
        self.effective_dice_count
    }

    /// Base dice components plus the bonus, if it added dice.
    pub fn total_dice_expression(&self) -> &SumExpression {
        &self.total_dice_expression
    }

    /// The obstacle formula as evaluated.
    pub fn evaluated_obstacle(&self) -> &EvaluatedFormula {
        &self.evaluated_obstacle
    }

    /// The obstacle the hits were compared against.
    pub fn obstacle(&self) -> i32 {
        self.obstacle
    }

    /// Faces at or above the hit threshold, in roll order.
    pub fn hits(&self) -> &[u32] {
        &self.hits
    }

    /// Faces below the hit threshold, in roll order.
    pub fn misses(&self) -> &[u32] {
        &self.misses
    }

    /// Obstacle slots with no die rolled against them.
    pub fn blank_count(&self) -> u32 {
        self.blank_count
    }

    /// Surplus hits on a success, hit count on a partial, otherwise zero.
    pub fn degree(&self) -> i32 {
        self.degree
    }

    /// The classified result.
    pub fn outcome(&self) -> OutcomeKind {
        self.outcome
    }

    /// The modifier the pool was rolled with.
    pub fn modifier(&self) -> RollModifier {
        self.modifier
    }

    /// Compensation points carried through from the request.
    pub fn compensation_points(&self) -> i32 {
        self.compensation_points
    }

    /// Number of hits.
    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} hit(s) on {} dice vs Ob {}: {}",
            self.hits.len(),
            self.effective_dice_count,
            self.obstacle,
            self.outcome
        )?;
        if self.degree != 0 {
            write!(f, " (degree {})", self.degree)?;
        }
        Ok(())
    }
}
