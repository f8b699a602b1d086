//! Pool configuration loaded from JSON.
//!
//! ```json
//! { "die_faces": 6, "hit_threshold": 5, "references": { "strength": "3" } }
//! ```
//!
//! Every field is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};
use crate::formula::ReferenceTable;
use crate::pool::request::{DEFAULT_DIE_FACES, DEFAULT_HIT_THRESHOLD};
use crate::pool::{DicePool, DicePoolRequest, DicePoolRequestBuilder};

/// Die settings and reference values shared by a series of rolls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Faces per pool die.
    pub die_faces: u32,
    /// Lowest face that counts as a hit.
    pub hit_threshold: u32,
    /// Values for `@reference` tokens in obstacle formulas.
    pub references: ReferenceTable,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            die_faces: DEFAULT_DIE_FACES,
            hit_threshold: DEFAULT_HIT_THRESHOLD,
            references: ReferenceTable::new(),
        }
    }
}

impl PoolConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> MechResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| MechError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> MechResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| MechError::InvalidConfig(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| MechError::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the die settings could build a request.
    pub fn validate(&self) -> MechResult<()> {
        self.request_builder()
            .build()
            .map(|_| ())
            .map_err(|e| MechError::InvalidConfig(e.to_string()))
    }

    /// A request builder preset with this configuration's die.
    pub fn request_builder(&self) -> DicePoolRequestBuilder {
        DicePoolRequest::builder().die(self.die_faces, self.hit_threshold)
    }

    /// A dice pool resolving references from this configuration.
    pub fn pool(&self) -> DicePool<ReferenceTable> {
        DicePool::new(self.references.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = PoolConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PoolConfig::default());
    }

    #[test]
    fn parses_all_fields() {
        let config = PoolConfig::from_json_str(
            r#"{"die_faces": 10, "hit_threshold": 8, "references": {"Strength": "4"}}"#,
        )
        .unwrap();
        assert_eq!(config.die_faces, 10);
        assert_eq!(config.hit_threshold, 8);
        assert_eq!(config.references.get("strength"), Some("4"));

        let request = config.request_builder().build().unwrap();
        assert_eq!(request.die_faces(), 10);
        assert_eq!(request.hit_threshold(), 8);
    }

    #[test]
    fn inconsistent_die_is_rejected() {
        let err = PoolConfig::from_json_str(r#"{"die_faces": 6, "hit_threshold": 9}"#).unwrap_err();
        assert!(matches!(err, MechError::InvalidConfig(_)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(PoolConfig::from_json_str(r#"{"faces": 6}"#).is_err());
    }

    #[test]
    fn syntax_errors_are_config_errors() {
        assert!(matches!(
            PoolConfig::from_json_str("{"),
            Err(MechError::InvalidConfig(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = PoolConfig::load(Path::new("/nonexistent/dicepool.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
