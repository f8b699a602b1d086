//! The dice source.
//!
//! [`DiceEvaluator`] is the only place randomness enters the engine. Everything
//! downstream of it is a pure function of the faces it returns, which is what
//! makes rolls reproducible with a seeded RNG or a [`ScriptedDice`] replay.

pub mod rng;
pub mod scripted;

pub use rng::RngDice;
pub use scripted::ScriptedDice;

use crate::error::{MechError, MechResult};

/// Rolls `count` dice with `faces` sides each.
///
/// Implementations must return exactly `count` values, each in
/// `1..=faces`, and nothing at all when `count` is zero.
pub trait DiceEvaluator {
    /// Roll `count` dice of `faces` sides, in roll order.
    fn roll(&mut self, faces: u32, count: u32) -> MechResult<Vec<u32>>;
}

impl<D: DiceEvaluator + ?Sized> DiceEvaluator for &mut D {
    fn roll(&mut self, faces: u32, count: u32) -> MechResult<Vec<u32>> {
        (**self).roll(faces, count)
    }
}

impl<D: DiceEvaluator + ?Sized> DiceEvaluator for Box<D> {
    fn roll(&mut self, faces: u32, count: u32) -> MechResult<Vec<u32>> {
        (**self).roll(faces, count)
    }
}

/// Roll through `dice` and verify the batch honours the evaluator contract.
pub(crate) fn roll_checked<D: DiceEvaluator + ?Sized>(
    dice: &mut D,
    faces: u32,
    count: u32,
) -> MechResult<Vec<u32>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let values = dice.roll(faces, count)?;
    if values.len() != count as usize {
        return Err(MechError::DiceSource(format!(
            "asked for {count}d{faces}, got {} value(s)",
            values.len()
        )));
    }
    if let Some(bad) = values.iter().find(|v| !(1..=faces).contains(*v)) {
        return Err(MechError::DiceSource(format!(
            "face {bad} is outside 1..={faces}"
        )));
    }
    tracing::trace!(faces, count, ?values, "dice rolled");
    Ok(values)
}
