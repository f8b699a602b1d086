//! Named numeric contributions and their sums.
//!
//! A [`SumExpression`] is how a dice pool records where its dice came from:
//! "Strength 3, Athletics 2, Help +1". The order of components only matters
//! for display.

use serde::{Deserialize, Serialize};

/// One named contribution to a [`SumExpression`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SumComponent {
    /// Stable identifier of the contribution (e.g. "strength").
    pub key: String,
    /// Label shown to players (e.g. "Strength").
    pub display_key: String,
    /// The contributed amount, possibly negative.
    pub value: i32,
}

impl SumComponent {
    /// Create a component with distinct key and display label.
    pub fn new(key: impl Into<String>, display_key: impl Into<String>, value: i32) -> Self {
        Self {
            key: key.into(),
            display_key: display_key.into(),
            value,
        }
    }

    /// Create a component whose display label equals its key.
    pub fn keyed(key: impl Into<String>, value: i32) -> Self {
        let key = key.into();
        Self {
            display_key: key.clone(),
            key,
            value,
        }
    }
}

impl std::fmt::Display for SumComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.value >= 0 {
            write!(f, "{} +{}", self.display_key, self.value)
        } else {
            write!(f, "{} {}", self.display_key, self.value)
        }
    }
}

/// An ordered list of [`SumComponent`]s with a derived total.
///
/// Duplicate keys are not rejected; every component contributes to the
/// total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumExpression {
    /// The components in insertion order.
    pub components: Vec<SumComponent>,
}

impl SumExpression {
    /// Create an empty expression.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Append a component, builder style.
    pub fn with(mut self, component: SumComponent) -> Self {
        self.components.push(component);
        self
    }

    /// Append a component in place.
    pub fn push(&mut self, component: SumComponent) {
        self.components.push(component);
    }

    /// Sum of all component values; zero when empty.
    pub fn total(&self) -> i32 {
        self.components.iter().map(|c| c.value).sum()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if there are no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterate the components in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, SumComponent> {
        self.components.iter()
    }

    /// Find the first component with the given key.
    pub fn get(&self, key: &str) -> Option<&SumComponent> {
        self.components.iter().find(|c| c.key == key)
    }
}

impl FromIterator<SumComponent> for SumExpression {
    fn from_iter<T: IntoIterator<Item = SumComponent>>(iter: T) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SumExpression {
    type Item = &'a SumComponent;
    type IntoIter = std::slice::Iter<'a, SumComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

impl std::fmt::Display for SumExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        write!(f, "{} = {}", parts.join(" / "), self.total())
    }
}
