//! Roll requests.

use serde::Serialize;

use crate::error::{MechError, MechResult};
use crate::modifier::RollModifier;
use crate::sum::{SumComponent, SumExpression};

/// Default number of faces on a pool die.
pub const DEFAULT_DIE_FACES: u32 = 6;
/// Default lowest face that counts as a hit.
pub const DEFAULT_HIT_THRESHOLD: u32 = 5;
/// Largest number of dice a single pool may roll.
pub const MAX_POOL_SIZE: u32 = 1000;

/// A validated description of one dice-pool roll.
///
/// Built with [`DicePoolRequest::builder`]; once built, the die size and hit
/// threshold are known to be consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DicePoolRequest {
    die_faces: u32,
    hit_threshold: u32,
    dice_expression: SumExpression,
    bonus: SumComponent,
    obstacle_formula: String,
    modifier: RollModifier,
    compensation_points: i32,
}

impl DicePoolRequest {
    /// Start building a request with the default die and an obstacle of `0`.
    pub fn builder() -> DicePoolRequestBuilder {
        DicePoolRequestBuilder::default()
    }

    /// Faces per pool die.
    pub fn die_faces(&self) -> u32 {
        self.die_faces
    }

    /// Lowest face that counts as a hit.
    pub fn hit_threshold(&self) -> u32 {
        self.hit_threshold
    }

    /// Where the pool's base dice come from.
    pub fn dice_expression(&self) -> &SumExpression {
        &self.dice_expression
    }

    /// Bonus dice added after the modifier.
    pub fn bonus(&self) -> &SumComponent {
        &self.bonus
    }

    /// The obstacle formula as written.
    pub fn obstacle_formula(&self) -> &str {
        &self.obstacle_formula
    }

    /// Modifier applied to the base dice.
    pub fn modifier(&self) -> RollModifier {
        self.modifier
    }

    /// Compensation points carried through to the outcome.
    pub fn compensation_points(&self) -> i32 {
        self.compensation_points
    }

    /// The bonus component if it adds dice, otherwise `None`.
    pub fn effective_bonus(&self) -> Option<&SumComponent> {
        (self.bonus.value > 0).then_some(&self.bonus)
    }

    /// Modified base dice plus positive bonus, before clamping.
    pub fn unclamped_dice_count(&self) -> i64 {
        let base = i64::from(self.modifier.apply(self.dice_expression.total()));
        let bonus = self.effective_bonus().map_or(0, |b| i64::from(b.value));
        base + bonus
    }

    /// Number of dice the pool rolls: never negative.
    pub fn effective_dice_count(&self) -> u32 {
        u32::try_from(self.unclamped_dice_count().max(0)).unwrap_or(u32::MAX)
    }

    /// The pool's composition as shown to players: base components plus
    /// the bonus when it adds dice.
    pub fn total_dice_expression(&self) -> SumExpression {
        let mut expr = self.dice_expression.clone();
        if let Some(bonus) = self.effective_bonus() {
            expr.push(bonus.clone());
        }
        expr
    }
}

/// Builder for [`DicePoolRequest`].
#[derive(Debug, Clone)]
pub struct DicePoolRequestBuilder {
    die_faces: u32,
    hit_threshold: u32,
    dice_expression: SumExpression,
    bonus: SumComponent,
    obstacle_formula: String,
    modifier: RollModifier,
    compensation_points: i32,
}

impl Default for DicePoolRequestBuilder {
    fn default() -> Self {
        Self {
            die_faces: DEFAULT_DIE_FACES,
            hit_threshold: DEFAULT_HIT_THRESHOLD,
            dice_expression: SumExpression::new(),
            bonus: SumComponent::new("bonus", "Bonus", 0),
            obstacle_formula: "0".to_string(),
            modifier: RollModifier::None,
            compensation_points: 0,
        }
    }
}

impl DicePoolRequestBuilder {
    /// Set the die size and the lowest face that counts as a hit.
    pub fn die(mut self, faces: u32, hit_threshold: u32) -> Self {
        self.die_faces = faces;
        self.hit_threshold = hit_threshold;
        self
    }

    /// Add one component to the base dice.
    pub fn dice(mut self, component: SumComponent) -> Self {
        self.dice_expression.push(component);
        self
    }

    /// Replace the base dice expression.
    pub fn dice_expression(mut self, expression: SumExpression) -> Self {
        self.dice_expression = expression;
        self
    }

    /// Set the number of bonus dice under the default "Bonus" label.
    pub fn bonus(mut self, value: i32) -> Self {
        self.bonus.value = value;
        self
    }

    /// Set the bonus component.
    pub fn bonus_component(mut self, component: SumComponent) -> Self {
        self.bonus = component;
        self
    }

    /// Set the obstacle formula.
    pub fn obstacle(mut self, formula: impl Into<String>) -> Self {
        self.obstacle_formula = formula.into();
        self
    }

    /// Set the modifier applied to the base dice.
    pub fn modifier(mut self, modifier: RollModifier) -> Self {
        self.modifier = modifier;
        self
    }

    /// Set the compensation points carried through to the outcome.
    pub fn compensation_points(mut self, points: i32) -> Self {
        self.compensation_points = points;
        self
    }

    /// Validate and build the request.
    pub fn build(self) -> MechResult<DicePoolRequest> {
        if self.die_faces == 0 {
            return Err(MechError::InvalidRequest(
                "die faces must be greater than zero".to_string(),
            ));
        }
        if !(1..=self.die_faces).contains(&self.hit_threshold) {
            return Err(MechError::InvalidRequest(format!(
                "hit threshold {} is outside 1..={}",
                self.hit_threshold, self.die_faces
            )));
        }
        let request = DicePoolRequest {
            die_faces: self.die_faces,
            hit_threshold: self.hit_threshold,
            dice_expression: self.dice_expression,
            bonus: self.bonus,
            obstacle_formula: self.obstacle_formula,
            modifier: self.modifier,
            compensation_points: self.compensation_points,
        };
        if request.unclamped_dice_count() > i64::from(MAX_POOL_SIZE) {
            return Err(MechError::InvalidRequest(format!(
                "pool of {} dice exceeds the limit of {MAX_POOL_SIZE}",
                request.unclamped_dice_count()
            )));
        }
        Ok(request)
    }
}
