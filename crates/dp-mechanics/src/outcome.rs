//! Outcome classification.
//!
//! A pool is classified from its hit count and the obstacle it rolled
//! against:
//! - obstacle of zero or less: no test was required
//! - hits at or above the obstacle: success, degree is the surplus
//! - some hits, but fewer than the obstacle: partial, degree is the hit count
//! - no hits: failure
//!
//! The partial degree is the raw hit count, not a (negative) deficit.

use serde::{Deserialize, Serialize};

/// The category of a classified roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// The obstacle was zero or less; nothing to beat.
    None,
    /// Hits met or exceeded the obstacle.
    Success,
    /// Some hits, but fewer than the obstacle.
    Partial,
    /// No hits against a positive obstacle.
    Failure,
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "No Obstacle"),
            Self::Success => write!(f, "Success"),
            Self::Partial => write!(f, "Partial Success"),
            Self::Failure => write!(f, "Failure"),
        }
    }
}

/// Classify a hit count against an obstacle, returning the kind and degree.
pub fn classify(hit_count: u32, obstacle: i32) -> (OutcomeKind, i32) {
    if obstacle <= 0 {
        return (OutcomeKind::None, 0);
    }
    let hits = i64::from(hit_count);
    let obstacle = i64::from(obstacle);
    if hits >= obstacle {
        (OutcomeKind::Success, saturate(hits - obstacle))
    } else if hits > 0 {
        (OutcomeKind::Partial, saturate(hits))
    } else {
        (OutcomeKind::Failure, 0)
    }
}

fn saturate(n: i64) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tie_is_success_with_zero_degree() {
        assert_eq!(classify(3, 3), (OutcomeKind::Success, 0));
        assert_eq!(classify(1, 1), (OutcomeKind::Success, 0));
    }

    #[test]
    fn surplus_hits_are_the_degree() {
        assert_eq!(classify(5, 2), (OutcomeKind::Success, 3));
    }

    #[test]
    fn partial_degree_is_hit_count() {
        assert_eq!(classify(2, 4), (OutcomeKind::Partial, 2));
        assert_eq!(classify(1, 2), (OutcomeKind::Partial, 1));
    }

    #[test]
    fn no_hits_is_failure() {
        assert_eq!(classify(0, 1), (OutcomeKind::Failure, 0));
        assert_eq!(classify(0, 7), (OutcomeKind::Failure, 0));
    }

    #[test]
    fn non_positive_obstacle_is_none() {
        assert_eq!(classify(0, 0), (OutcomeKind::None, 0));
        assert_eq!(classify(4, 0), (OutcomeKind::None, 0));
        assert_eq!(classify(4, -2), (OutcomeKind::None, 0));
    }

    #[test]
    fn display() {
        assert_eq!(OutcomeKind::Partial.to_string(), "Partial Success");
        assert_eq!(OutcomeKind::None.to_string(), "No Obstacle");
    }

    proptest! {
        #[test]
        fn success_degree_is_surplus(obstacle in 1i32..50, k in 0u32..50) {
            let hits = obstacle as u32 + k;
            prop_assert_eq!(classify(hits, obstacle), (OutcomeKind::Success, k as i32));
        }

        #[test]
        fn below_obstacle_is_partial(obstacle in 2i32..50, hits in 1u32..49) {
            prop_assume!((hits as i32) < obstacle);
            prop_assert_eq!(classify(hits, obstacle), (OutcomeKind::Partial, hits as i32));
        }

        #[test]
        fn non_positive_obstacle_ignores_hits(obstacle in -50i32..=0, hits in 0u32..100) {
            prop_assert_eq!(classify(hits, obstacle), (OutcomeKind::None, 0));
        }
    }
}
