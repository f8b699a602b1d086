//! The dice-pool orchestrator.
//!
//! A roll runs through fixed stages, aborting on the first error:
//! count the dice, resolve the obstacle, roll, split hits from misses,
//! classify, assemble the [`RollOutcome`]. The obstacle is resolved before
//! any pool die is rolled, so a missing reference consumes no randomness.

pub mod outcome;
pub mod request;

pub use outcome::RollOutcome;
pub use request::{DicePoolRequest, DicePoolRequestBuilder};

use crate::dice::{self, DiceEvaluator};
use crate::error::MechResult;
use crate::formula::{self, NoReferences, ReferenceResolver};
use crate::outcome::classify;

/// Rolls dice pools against obstacles, looking up formula references
/// through its resolver.
///
/// Holds no per-roll state; one pool can serve any number of rolls.
#[derive(Debug, Clone, Default)]
pub struct DicePool<R = NoReferences> {
    references: R,
}

impl<R: ReferenceResolver> DicePool<R> {
    /// Create a pool that resolves references through `references`.
    pub fn new(references: R) -> Self {
        Self { references }
    }

    /// The reference resolver.
    pub fn references(&self) -> &R {
        &self.references
    }

    /// Roll `request`, drawing faces from `dice`.
    pub fn roll<D: DiceEvaluator + ?Sized>(
        &self,
        dice: &mut D,
        request: &DicePoolRequest,
    ) -> MechResult<RollOutcome> {
        roll_pool(request, &self.references, dice)
    }
}

/// Roll `request` with the given reference resolver and dice.
pub fn roll_pool<R, D>(
    request: &DicePoolRequest,
    references: &R,
    dice: &mut D,
) -> MechResult<RollOutcome>
where
    R: ReferenceResolver + ?Sized,
    D: DiceEvaluator + ?Sized,
{
    let effective_dice_count = request.effective_dice_count();

    let evaluated_obstacle =
        formula::prepare(request.obstacle_formula(), references)?.evaluate(dice)?;
    let obstacle = evaluated_obstacle.obstacle();

    let faces = dice::roll_checked(dice, request.die_faces(), effective_dice_count)?;
    let threshold = request.hit_threshold();
    let (hits, misses): (Vec<u32>, Vec<u32>) = faces.into_iter().partition(|&f| f >= threshold);

    let blank_count = u32::try_from(
        (i64::from(obstacle) - i64::from(effective_dice_count)).max(0),
    )
    .unwrap_or(u32::MAX);

    let hit_count = u32::try_from(hits.len()).unwrap_or(u32::MAX);
    let (outcome, degree) = classify(hit_count, obstacle);

    tracing::debug!(
        dice = effective_dice_count,
        obstacle,
        hits = hit_count,
        %outcome,
        degree,
        "pool rolled"
    );

    Ok(RollOutcome {
        effective_dice_count,
        total_dice_expression: request.total_dice_expression(),
        evaluated_obstacle,
        obstacle,
        hits,
        misses,
        blank_count,
        degree,
        outcome,
        modifier: request.modifier(),
        compensation_points: request.compensation_points(),
    })
}
