//! Per-collection configuration.

use crate::{error::Result, wrap::is_reserved, Error};
use serde::{Deserialize, Serialize};

/// Default name of the identifier field.
pub const DEFAULT_ID_FIELD: &str = "id";

/// Collection configuration.
///
/// Every field has a default, so `{}` is a valid JSON config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionConfig {
    /// Field holding each entity's identifier
    pub id_field: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            id_field: DEFAULT_ID_FIELD.to_string(),
        }
    }
}

impl CollectionConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Use a different identifier field.
    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    /// Check the config for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.id_field.is_empty() {
            return Err(Error::InvalidConfig("id field must not be empty".into()));
        }
        if is_reserved(&self.id_field) {
            return Err(Error::InvalidConfig(format!(
                "id field '{}' is reserved for tracking data",
                self.id_field
            )));
        }
        Ok(())
    }
}
