//! Pool-size modifiers.
//!
//! A modifier halves the base dice count of a pool before bonus dice are
//! added. Bonus dice are never halved.

use serde::{Deserialize, Serialize};

/// How the base dice count of a pool is transformed before rolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RollModifier {
    /// Roll the full pool.
    #[default]
    None,
    /// Roll half the pool, rounding down.
    HalfRoundedDown,
    /// Roll half the pool, rounding up.
    HalfRoundedUp,
}

impl RollModifier {
    /// Apply this modifier to a raw dice count.
    pub fn apply(self, raw: i32) -> i32 {
        effective(raw, self)
    }
}

/// Map a raw dice count to the count actually rolled under `modifier`.
///
/// Rounding follows the mathematical floor and ceiling, so negative counts
/// (a pool dragged below zero by penalties) stay consistent.
pub fn effective(raw: i32, modifier: RollModifier) -> i32 {
    match modifier {
        RollModifier::None => raw,
        RollModifier::HalfRoundedDown => raw.div_euclid(2),
        RollModifier::HalfRoundedUp => raw.div_euclid(2) + raw.rem_euclid(2),
    }
}

impl std::fmt::Display for RollModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::HalfRoundedDown => write!(f, "half-down"),
            Self::HalfRoundedUp => write!(f, "half-up"),
        }
    }
}

impl std::str::FromStr for RollModifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "half-down" | "half-rounded-down" | "halfdown" => Ok(Self::HalfRoundedDown),
            "half-up" | "half-rounded-up" | "halfup" => Ok(Self::HalfRoundedUp),
            other => Err(format!(
                "unknown modifier '{other}' (expected none, half-down or half-up)"
            )),
        }
    }
}
