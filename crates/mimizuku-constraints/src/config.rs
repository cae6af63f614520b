//! Serializer configuration

use serde::{Deserialize, Serialize};

/// Controls how violations are written as triples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerConfig {
    /// Emit `spin:violationSource` for violations that know their rule
    #[serde(default = "default_include_source")]
    pub include_source: bool,
}

fn default_include_source() -> bool {
    true
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            include_source: default_include_source(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_includes_source() {
        assert!(SerializerConfig::default().include_source);
        let config: SerializerConfig = serde_json::from_str("{}").unwrap();
        assert!(config.include_source);
        let config: SerializerConfig =
            serde_json::from_str(r#"{"include_source": false}"#).unwrap();
        assert!(!config.include_source);
    }
}
