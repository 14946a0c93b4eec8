use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::encoder::FallbackPolicy;
use crate::wire::JsonMode;

/// Encoder settings that can be loaded from a JSON file
///
/// Example:
/// ```json
/// {
///   "fallback": "reject",
///   "jsonMode": "canonical"
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EncoderConfig {
    /// Handling of foreign values without a registered codec
    pub fallback: FallbackPolicy,

    /// Extended JSON flavour for rendered output
    pub json_mode: JsonMode,
}

impl EncoderConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| ConfigError::read(path, err))?;
        Self::from_json_str(&text)
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_json_mode(mut self, json_mode: JsonMode) -> Self {
        self.json_mode = json_mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = EncoderConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EncoderConfig::default());
        assert_eq!(config.fallback, FallbackPolicy::Stringify);
        assert_eq!(config.json_mode, JsonMode::Relaxed);
    }

    #[test]
    fn test_parse_all_fields() {
        let config =
            EncoderConfig::from_json_str(r#"{"fallback": "reject", "jsonMode": "canonical"}"#).unwrap();
        assert_eq!(
            config,
            EncoderConfig::default()
                .with_fallback(FallbackPolicy::Reject)
                .with_json_mode(JsonMode::Canonical)
        );
    }

    #[test]
    fn test_serialize_camel_case() {
        let value = serde_json::to_value(EncoderConfig::default()).unwrap();
        assert_eq!(value, json!({"fallback": "stringify", "jsonMode": "relaxed"}));
    }

    #[test]
    fn test_unknown_policy_is_an_error() {
        let err = EncoderConfig::from_json_str(r#"{"fallback": "ignore"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid encoder configuration"));
    }

    #[test]
    fn test_missing_file() {
        let err = EncoderConfig::from_file("/nonexistent/encoder.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/encoder.json"));
    }
}
