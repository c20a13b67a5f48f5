//! Engine Configuration
//!
//! Every field has a default, so a partial JSON document is enough.

use serde::{Deserialize, Serialize};

use crate::domain::{LabelPosition, DEFAULT_TEMPLATE};
use crate::error::EngineResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Origin used to absolutize relative image paths
    pub base_origin: String,
    /// Local storage key holding the custom item array
    pub storage_key: String,
    /// Query parameter carrying the board token
    pub query_param: String,
    /// Image shown for ids no source can resolve
    pub placeholder_image: String,
    /// Template used when no token is available
    pub default_template: String,
    pub label_position: LabelPosition,
    /// False on the server or wherever local storage must not be touched
    pub has_persistent_store: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_origin: "https://tierlist.app".to_string(),
            storage_key: "tierlist.customItems".to_string(),
            query_param: "state".to_string(),
            placeholder_image: "/images/placeholder.png".to_string(),
            default_template: DEFAULT_TEMPLATE.to_string(),
            label_position: LabelPosition::default(),
            has_persistent_store: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_base_origin(mut self, origin: impl Into<String>) -> Self {
        self.base_origin = origin.into();
        self
    }

    /// Config for contexts without local storage (server rendering)
    pub fn without_persistent_store(mut self) -> Self {
        self.has_persistent_store = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{"baseOrigin":"https://example.com","labelPosition":"top"}"#).unwrap();
        assert_eq!(config.base_origin, "https://example.com");
        assert_eq!(config.label_position, LabelPosition::Top);
        assert_eq!(config.query_param, "state");
        assert!(config.has_persistent_store);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(EngineConfig::from_json("{not json").is_err());
    }
}
