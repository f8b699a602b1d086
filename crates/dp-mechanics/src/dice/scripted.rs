//! Replayed dice.

use std::collections::VecDeque;

use super::DiceEvaluator;
use crate::error::{MechError, MechResult};

/// A [`DiceEvaluator`] that hands out a fixed sequence of faces in order.
///
/// Used to replay a recorded roll and to drive the engine deterministically
/// in tests. Running out of faces is an error rather than a reroll.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
    calls: usize,
    served: usize,
}

impl ScriptedDice {
    /// Create a script from the faces to return, in roll order.
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            calls: 0,
            served: 0,
        }
    }

    /// How many times [`DiceEvaluator::roll`] has been called with dice to roll.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// How many faces have been handed out so far.
    pub fn served(&self) -> usize {
        self.served
    }

    /// Faces not yet handed out.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DiceEvaluator for ScriptedDice {
    fn roll(&mut self, faces: u32, count: u32) -> MechResult<Vec<u32>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        self.calls += 1;
        let count = count as usize;
        if self.faces.len() < count {
            return Err(MechError::DiceSource(format!(
                "script exhausted: asked for {count}d{faces}, {} face(s) left",
                self.faces.len()
            )));
        }
        self.served += count;
        Ok(self.faces.drain(..count).collect())
    }
}
