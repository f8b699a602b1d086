//! Dice-pool resolution engine.
//!
//! Turns a declarative roll request (how many dice, against what obstacle,
//! with what modifier) into a reproducible [`RollOutcome`]. Randomness comes
//! only from an injected [`DiceEvaluator`] and formula references only from
//! an injected [`ReferenceResolver`], so every roll is a pure function of
//! its inputs and the faces it was dealt.
//!
//! ```
//! use dp_mechanics::{DicePool, DicePoolRequest, NoReferences, OutcomeKind, ScriptedDice, SumComponent};
//!
//! let request = DicePoolRequest::builder()
//!     .dice(SumComponent::new("strength", "Strength", 3))
//!     .bonus(2)
//!     .obstacle("1")
//!     .build()?;
//! let mut dice = ScriptedDice::new([5, 3, 1, 2, 6]);
//! let outcome = DicePool::new(NoReferences).roll(&mut dice, &request)?;
//! assert_eq!(outcome.hits(), [5, 6]);
//! assert_eq!(outcome.outcome(), OutcomeKind::Success);
//! assert_eq!(outcome.degree(), 1);
//! # Ok::<(), dp_mechanics::MechError>(())
//! ```

pub mod config;
pub mod dice;
pub mod error;
pub mod formula;
pub mod modifier;
pub mod outcome;
pub mod pool;
pub mod sum;

pub use config::PoolConfig;
pub use dice::{DiceEvaluator, RngDice, ScriptedDice};
pub use error::{MechError, MechResult};
pub use formula::{
    EvaluatedFormula, FormulaTerm, NoReferences, PreparedFormula, ReferenceResolver,
    ReferenceTable, evaluate_formula, prepare, referenced_tokens,
};
pub use modifier::{RollModifier, effective};
pub use outcome::{OutcomeKind, classify};
pub use pool::{DicePool, DicePoolRequest, DicePoolRequestBuilder, RollOutcome, roll_pool};
pub use sum::{SumComponent, SumExpression};
