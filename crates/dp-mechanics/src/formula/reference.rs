//! Lookup of `@reference` tokens.
//!
//! The engine never knows where a reference value comes from (character
//! attributes, skills, a prompt answered by the player). It only asks a
//! [`ReferenceResolver`] for the substitution text of each token.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};

/// Supplies substitution text for reference tokens.
///
/// `token` is the reference name without its `@` sigil, lowercased.
pub trait ReferenceResolver {
    /// Return the text to substitute for `token`, or `None` if unknown.
    fn resolve(&self, token: &str) -> Option<String>;
}

impl<T: ReferenceResolver + ?Sized> ReferenceResolver for &T {
    fn resolve(&self, token: &str) -> Option<String> {
        (**self).resolve(token)
    }
}

/// A resolver that knows no references.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReferences;

impl ReferenceResolver for NoReferences {
    fn resolve(&self, _token: &str) -> Option<String> {
        None
    }
}

/// A case-insensitive table of reference values.
///
/// Keys are stored lowercased and without a leading `@`, so `"@STR"`,
/// `"Str"` and `"str"` all name the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct ReferenceTable {
    entries: BTreeMap<String, String>,
}

impl ReferenceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, builder style.
    pub fn with(mut self, token: &str, value: impl Into<String>) -> Self {
        self.insert(token, value);
        self
    }

    /// Insert or replace a value. Returns the previous value, if any.
    pub fn insert(&mut self, token: &str, value: impl Into<String>) -> Option<String> {
        self.entries.insert(normalize(token), value.into())
    }

    /// Copy every entry of `other` into this table, overriding duplicates.
    pub fn extend_from(&mut self, other: &ReferenceTable) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    /// Look up a value by token (case-insensitive, sigil optional).
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(&normalize(token)).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(token, value)` pairs in token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse a `key=value` assignment, as given on a command line.
    pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
        let key = normalize(key);
        if key.is_empty() {
            return Err(format!("empty reference name in '{s}'"));
        }
        Ok((key, value.trim().to_string()))
    }
}

fn normalize(token: &str) -> String {
    let token = token.trim();
    token.strip_prefix('@').unwrap_or(token).to_lowercase()
}

impl ReferenceResolver for ReferenceTable {
    fn resolve(&self, token: &str) -> Option<String> {
        self.get(token).map(str::to_string)
    }
}

impl From<BTreeMap<String, String>> for ReferenceTable {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<ReferenceTable> for BTreeMap<String, String> {
    fn from(table: ReferenceTable) -> Self {
        table.entries
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ReferenceTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (k, v) in iter {
            table.insert(k.as_ref(), v);
        }
        table
    }
}

impl<S: BuildHasher> ReferenceResolver for HashMap<String, String, S> {
    fn resolve(&self, token: &str) -> Option<String> {
        self.get(token).cloned().or_else(|| {
            self.iter()
                .find(|(k, _)| normalize(k) == token)
                .map(|(_, v)| v.clone())
        })
    }
}

impl ReferenceResolver for BTreeMap<String, String> {
    fn resolve(&self, token: &str) -> Option<String> {
        self.get(token).cloned().or_else(|| {
            self.iter()
                .find(|(k, _)| normalize(k) == token)
                .map(|(_, v)| v.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_case_insensitive() {
        let table = ReferenceTable::new().with("@Strength", "3");
        assert_eq!(table.get("strength"), Some("3"));
        assert_eq!(table.get("STRENGTH"), Some("3"));
        assert_eq!(table.resolve("strength"), Some("3".to_string()));
    }

    #[test]
    fn insert_replaces() {
        let mut table = ReferenceTable::new();
        assert_eq!(table.insert("will", "2"), None);
        assert_eq!(table.insert("Will", "4"), Some("2".to_string()));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn extend_overrides_duplicates() {
        let mut base = ReferenceTable::new().with("str", "1").with("dex", "2");
        base.extend_from(&ReferenceTable::new().with("str", "5"));
        assert_eq!(base.get("str"), Some("5"));
        assert_eq!(base.get("dex"), Some("2"));
    }

    #[test]
    fn deserializes_from_plain_map() {
        let table: ReferenceTable =
            serde_json::from_str(r#"{"Strength": "3", "@will": "2"}"#).unwrap();
        assert_eq!(table.get("strength"), Some("3"));
        assert_eq!(table.get("will"), Some("2"));
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"strength":"3","will":"2"}"#);
    }

    #[test]
    fn parse_assignment() {
        assert_eq!(
            ReferenceTable::parse_assignment("@Str = 3"),
            Ok(("str".to_string(), "3".to_string()))
        );
        assert!(ReferenceTable::parse_assignment("str").is_err());
        assert!(ReferenceTable::parse_assignment("=3").is_err());
    }

    #[test]
    fn hash_map_falls_back_to_case_insensitive_keys() {
        let map: HashMap<String, String> = [("Strength".to_string(), "3".to_string())].into();
        assert_eq!(map.resolve("strength"), Some("3".to_string()));
        assert_eq!(map.resolve("will"), None);
    }

    #[test]
    fn no_references_knows_nothing() {
        assert_eq!(NoReferences.resolve("strength"), None);
    }
}
